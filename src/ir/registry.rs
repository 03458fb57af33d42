//! Category name to id assignment.
//!
//! Registry ids are zero-based; [`CategoryId::from_registry`](super::CategoryId::from_registry)
//! shifts them into COCO's 1-based space at emission time. Entries iterate in
//! insertion order, which is the order categories are written out.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Voc2CocoError;

/// Largest zero-based id a predefined table may assign. Keeps the 1-based
/// COCO id and every id appended later well inside `u64`.
pub const MAX_TABLE_ID: u64 = u32::MAX as u64;

/// Maps category names to stable zero-based ids.
#[derive(Clone, Debug, Default)]
pub struct CategoryRegistry {
    entries: Vec<(String, u64)>,
    by_name: BTreeMap<String, u64>,
    next_id: u64,
    predefined: bool,
}

/// On-disk shape of a predefined category table.
#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryTable {
    Names(Vec<String>),
    Ids(serde_yaml::Mapping),
}

impl CategoryRegistry {
    /// Builds a registry from every name seen during a discovery scan.
    ///
    /// Names are deduplicated, sorted ascending and enumerated from 0.
    pub fn discover<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let unique: BTreeSet<&str> = names.into_iter().collect();
        let mut registry = Self::default();
        for name in unique {
            registry.insert(name.to_string(), registry.next_id);
        }
        registry
    }

    /// Builds a predefined registry where each name's id is its position.
    pub fn from_names(names: Vec<String>) -> Result<Self, Voc2CocoError> {
        let table = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| (name, idx as u64))
            .collect();
        Self::from_table(table)
    }

    /// Builds a predefined registry from explicit `(name, id)` pairs.
    ///
    /// Pair order becomes the iteration order. Names and ids must be unique.
    pub fn from_table(table: Vec<(String, u64)>) -> Result<Self, Voc2CocoError> {
        let mut registry = Self {
            predefined: true,
            ..Self::default()
        };
        let mut seen_ids = BTreeSet::new();

        for (name, id) in table {
            if name.trim().is_empty() {
                return Err(Voc2CocoError::InvalidCategoryTable {
                    message: "category names must not be empty".to_string(),
                });
            }
            if registry.by_name.contains_key(&name) {
                return Err(Voc2CocoError::InvalidCategoryTable {
                    message: format!("category '{name}' is listed more than once"),
                });
            }
            if id > MAX_TABLE_ID {
                return Err(Voc2CocoError::InvalidCategoryTable {
                    message: format!(
                        "id {id} for category '{name}' exceeds the maximum of {MAX_TABLE_ID}"
                    ),
                });
            }
            if !seen_ids.insert(id) {
                return Err(Voc2CocoError::InvalidCategoryTable {
                    message: format!("id {id} is assigned to more than one category"),
                });
            }
            registry.insert(name, id);
        }

        Ok(registry)
    }

    /// Loads a predefined table from a YAML (or JSON) file.
    ///
    /// The document is either a sequence of names or a `name: id` mapping.
    pub fn load_table(path: &Path) -> Result<Self, Voc2CocoError> {
        let raw = fs::read_to_string(path).map_err(Voc2CocoError::Io)?;
        Self::parse_table(&raw, path)
    }

    fn parse_table(raw: &str, path: &Path) -> Result<Self, Voc2CocoError> {
        let table: CategoryTable =
            serde_yaml::from_str(raw).map_err(|source| Voc2CocoError::CategoryTableParse {
                path: path.to_path_buf(),
                source,
            })?;

        match table {
            CategoryTable::Names(names) => Self::from_names(names),
            CategoryTable::Ids(mapping) => {
                let mut pairs = Vec::with_capacity(mapping.len());
                for (key, value) in &mapping {
                    let name = key.as_str().ok_or_else(|| Voc2CocoError::InvalidCategoryTable {
                        message: format!("category key {key:?} is not a string"),
                    })?;
                    let id = value
                        .as_u64()
                        .ok_or_else(|| Voc2CocoError::InvalidCategoryTable {
                            message: format!(
                                "id for category '{name}' must be a non-negative integer, got {value:?}"
                            ),
                        })?;
                    pairs.push((name.to_string(), id));
                }
                Self::from_table(pairs)
            }
        }
    }

    /// Returns the id for `name`, appending it with the next unused id if
    /// it has not been seen before. Existing ids never change.
    pub fn resolve(&mut self, name: &str) -> u64 {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = self.next_id;
        if self.predefined {
            log::info!("category '{name}' is not in the predefined table; assigning id {id}");
        } else {
            log::debug!("category '{name}' was not discovered up front; assigning id {id}");
        }
        self.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.by_name.get(name).copied()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the registry was seeded from a fixed table.
    pub fn is_predefined(&self) -> bool {
        self.predefined
    }

    fn insert(&mut self, name: String, id: u64) {
        self.next_id = self.next_id.max(id + 1);
        self.by_name.insert(name.clone(), id);
        self.entries.push((name, id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_sorts_and_deduplicates() {
        let registry = CategoryRegistry::discover(["dog_small", "cat_big", "dog_small", "bird_x"]);
        let entries: Vec<_> = registry.iter().collect();
        assert_eq!(entries, vec![("bird_x", 0), ("cat_big", 1), ("dog_small", 2)]);
        assert!(!registry.is_predefined());
    }

    #[test]
    fn resolve_appends_unknown_names_without_reassigning() {
        let mut registry =
            CategoryRegistry::from_names(vec!["a_x".to_string(), "b_y".to_string()])
                .expect("build table");
        assert_eq!(registry.resolve("b_y"), 1);
        assert_eq!(registry.resolve("c_z"), 2);
        assert_eq!(registry.resolve("a_x"), 0);
        assert_eq!(registry.resolve("c_z"), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn resolve_skips_ids_already_taken_by_sparse_table() {
        let mut registry = CategoryRegistry::from_table(vec![
            ("a_x".to_string(), 5),
            ("b_y".to_string(), 0),
        ])
        .expect("build table");
        assert_eq!(registry.resolve("c_z"), 6);
        let names: Vec<_> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a_x", "b_y", "c_z"]);
    }

    #[test]
    fn from_table_rejects_duplicate_ids_and_names() {
        let dup_id =
            CategoryRegistry::from_table(vec![("a_x".to_string(), 1), ("b_y".to_string(), 1)]);
        assert!(matches!(dup_id, Err(Voc2CocoError::InvalidCategoryTable { .. })));

        let dup_name = CategoryRegistry::from_names(vec!["a_x".to_string(), "a_x".to_string()]);
        assert!(matches!(dup_name, Err(Voc2CocoError::InvalidCategoryTable { .. })));
    }

    #[test]
    fn from_table_rejects_ids_too_large_to_shift() {
        let err = CategoryRegistry::from_table(vec![("dog_small".to_string(), u64::MAX)])
            .expect_err("u64::MAX id");
        assert!(matches!(err, Voc2CocoError::InvalidCategoryTable { .. }));

        let mut registry =
            CategoryRegistry::from_table(vec![("dog_small".to_string(), MAX_TABLE_ID)])
                .expect("largest allowed id");
        assert_eq!(registry.resolve("cat_big"), MAX_TABLE_ID + 1);
    }

    #[test]
    fn parse_table_rejects_id_beyond_u32_range() {
        let err = CategoryRegistry::parse_table(
            "dog_small: 18446744073709551615\n",
            Path::new("t.yaml"),
        )
        .expect_err("huge id");
        assert!(err.to_string().contains("exceeds the maximum"));
    }

    #[test]
    fn parse_table_accepts_sequence_and_mapping() {
        let seq = CategoryRegistry::parse_table("- dog_small\n- cat_big\n", Path::new("t.yaml"))
            .expect("parse sequence");
        assert_eq!(seq.get("cat_big"), Some(1));
        assert!(seq.is_predefined());

        let map = CategoryRegistry::parse_table("zebra_a: 3\napple_b: 0\n", Path::new("t.yaml"))
            .expect("parse mapping");
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("zebra_a", 3), ("apple_b", 0)]);

        let json = CategoryRegistry::parse_table(
            r#"{"dog_small": 0, "cat_big": 1}"#,
            Path::new("t.json"),
        )
        .expect("parse json mapping");
        assert_eq!(json.get("dog_small"), Some(0));
    }

    #[test]
    fn parse_table_rejects_negative_ids() {
        let err = CategoryRegistry::parse_table("dog_small: -1\n", Path::new("t.yaml"))
            .expect_err("negative id should fail");
        assert!(matches!(err, Voc2CocoError::InvalidCategoryTable { .. }));
    }
}
