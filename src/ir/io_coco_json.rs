//! COCO instances JSON assembly and writing.
//!
//! The document layout is `{images, type, annotations, categories}` with
//! `type` fixed to `"instances"`. Categories are written in registry order.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::model::{Annotation, Category, Image};
use super::{CategoryId, CategoryRegistry};
use crate::error::Voc2CocoError;

const INSTANCES: &str = "instances";

/// Top-level COCO document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoDocument {
    pub images: Vec<Image>,

    #[serde(rename = "type")]
    pub kind: String,

    pub annotations: Vec<Annotation>,

    pub categories: Vec<Category>,
}

impl CocoDocument {
    /// Combines extracted records with one category entry per registry
    /// entry.
    ///
    /// # Errors
    /// Fails if any category name has no `_` to split a supercategory from.
    pub fn assemble(
        images: Vec<Image>,
        annotations: Vec<Annotation>,
        registry: &CategoryRegistry,
    ) -> Result<Self, Voc2CocoError> {
        let categories = registry
            .iter()
            .map(|(name, id)| Category::from_name(CategoryId::from_registry(id), name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            images,
            kind: INSTANCES.to_string(),
            annotations,
            categories,
        })
    }
}

/// Serializes a document to a JSON string.
pub fn to_coco_string(document: &CocoDocument, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    }
}

/// Reads a document back from a JSON string.
pub fn from_coco_str(json: &str) -> Result<CocoDocument, serde_json::Error> {
    serde_json::from_str(json)
}

/// Writes a document to `path`, creating missing parent directories and
/// replacing any existing file.
pub fn write_coco_json(
    path: &Path,
    document: &CocoDocument,
    pretty: bool,
) -> Result<(), Voc2CocoError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(Voc2CocoError::Io)?;
    }

    let file = File::create(path).map_err(Voc2CocoError::Io)?;
    let mut writer = BufWriter::new(file);

    let result = if pretty {
        serde_json::to_writer_pretty(&mut writer, document)
    } else {
        serde_json::to_writer(&mut writer, document)
    };
    result.map_err(|source| Voc2CocoError::CocoJsonWrite {
        path: path.to_path_buf(),
        source,
    })?;

    writer.flush().map_err(Voc2CocoError::Io)
}
