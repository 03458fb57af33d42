//! Summary of a finished conversion run.

use serde::Serialize;
use std::fmt;

/// Counts gathered while converting a directory of VOC files.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    /// Number of XML files read.
    pub xml_files: usize,
    /// Number of image records emitted.
    pub images: usize,
    /// Number of annotation records emitted.
    pub annotations: usize,
    /// Number of category records emitted.
    pub categories: usize,
    /// Categories that were not in the registry when extraction started
    /// and were appended on the fly.
    pub categories_added: Vec<String>,
    /// Whether the registry came from a predefined table.
    pub predefined_categories: bool,
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} xml files: {} images, {} categories, {} annotations",
            self.xml_files, self.images, self.categories, self.annotations
        )?;

        if !self.categories_added.is_empty() {
            let origin = if self.predefined_categories {
                "predefined table"
            } else {
                "discovery scan"
            };
            writeln!(
                f,
                "  {} category(ies) missing from the {}: {}",
                self.categories_added.len(),
                origin,
                self.categories_added.join(", ")
            )?;
        }

        Ok(())
    }
}
