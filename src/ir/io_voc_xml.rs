//! Pascal VOC XML reader.
//!
//! Each XML file describes one image: an optional `<path>`, a `<filename>`,
//! a `<size>` block, and zero or more `<object>` entries with a `<bndbox>`.
//! Parsing only checks structure; box ordering is checked by the converter.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;
use walkdir::WalkDir;

use super::BBoxXYXY;
use crate::error::Voc2CocoError;

const VOC_XML_EXTENSION: &str = "xml";

/// How many children with a given tag a container must hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    /// Zero or more.
    Any,
    /// Exactly one.
    One,
    /// Exactly `n`.
    Exactly(usize),
}

impl Cardinality {
    /// Maps the numeric convention (0 = any, N = exactly N) onto a variant.
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Cardinality::Any,
            1 => Cardinality::One,
            n => Cardinality::Exactly(n),
        }
    }

    fn accepts(&self, found: usize) -> bool {
        match self {
            Cardinality::Any => true,
            Cardinality::One => found == 1,
            Cardinality::Exactly(n) => found == *n,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Any => write!(f, "any number"),
            Cardinality::One => write!(f, "exactly 1"),
            Cardinality::Exactly(n) => write!(f, "exactly {n}"),
        }
    }
}

/// One parsed annotation file.
#[derive(Clone, Debug, PartialEq)]
pub struct VocAnnotation {
    /// The XML file this was read from.
    pub source: PathBuf,
    /// Image file name resolved from `<path>` or `<filename>`.
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub objects: Vec<VocObject>,
}

/// One `<object>` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct VocObject {
    /// Text of the `<name>` child.
    pub name: String,
    /// Text of the first child element, which is what the discovery scan
    /// keys on. Usually identical to `name`.
    pub leading_text: Option<String>,
    pub bbox: BBoxXYXY,
}

/// Lists the `.xml` files directly inside `dir`, sorted by file name.
///
/// Nested `.xml` files are not converted; a warning reports how many were
/// skipped. Subdirectories that cannot be traversed are skipped as well.
pub fn collect_xml_files(dir: &Path) -> Result<Vec<PathBuf>, Voc2CocoError> {
    if !dir.is_dir() {
        return Err(Voc2CocoError::InputDirInvalid {
            path: dir.to_path_buf(),
            message: "input must be an existing directory".to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(Voc2CocoError::Io)? {
        let entry = entry.map_err(Voc2CocoError::Io)?;
        let path = entry.path();
        if path.is_file() && has_xml_extension(&path) {
            files.push(path);
        }
    }

    files.sort_by_cached_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    });

    let mut nested = 0usize;
    let mut sample = None;
    for entry in WalkDir::new(dir).follow_links(false).min_depth(2) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("skipping unreadable entry below {}: {err}", dir.display());
                continue;
            }
        };
        if entry.file_type().is_file() && has_xml_extension(entry.path()) {
            nested += 1;
            sample.get_or_insert_with(|| entry.path().display().to_string());
        }
    }

    if let Some(sample) = sample {
        log::warn!(
            "only top-level .xml files are converted; skipping {nested} nested file(s), e.g. {sample}"
        );
    }

    Ok(files)
}

/// Reads and parses one VOC XML file.
pub fn parse_voc_xml(path: &Path) -> Result<VocAnnotation, Voc2CocoError> {
    let xml = fs::read_to_string(path).map_err(Voc2CocoError::Io)?;
    parse_voc_xml_str(&xml, path)
}

/// Parses VOC XML held in memory; `path` is only used in error messages.
pub fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<VocAnnotation, Voc2CocoError> {
    let document =
        roxmltree::Document::parse(xml).map_err(|source| Voc2CocoError::VocXmlParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;
    let root = document.root_element();

    let file_name = resolve_file_name(root, path)?;

    let size = find_child(root, "size", path)?;
    let width = parse_u32(find_child(size, "width", path)?, path)?;
    let height = parse_u32(find_child(size, "height", path)?, path)?;

    let mut objects = Vec::new();
    for object in find_children(root, "object", Cardinality::Any, path)? {
        let name = element_text(find_child(object, "name", path)?, path)?;
        let leading_text = object
            .children()
            .find(Node::is_element)
            .and_then(|node| node.text())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToOwned::to_owned);

        let bndbox = find_child(object, "bndbox", path)?;
        let xmin = parse_f64(find_child(bndbox, "xmin", path)?, path)?;
        let ymin = parse_f64(find_child(bndbox, "ymin", path)?, path)?;
        let xmax = parse_f64(find_child(bndbox, "xmax", path)?, path)?;
        let ymax = parse_f64(find_child(bndbox, "ymax", path)?, path)?;

        objects.push(VocObject {
            name,
            leading_text,
            bbox: BBoxXYXY::from_xyxy(xmin, ymin, xmax, ymax),
        });
    }

    Ok(VocAnnotation {
        source: path.to_path_buf(),
        file_name,
        width,
        height,
        objects,
    })
}

/// Parse VOC XML from a UTF-8 string, discarding the result.
///
/// Useful for testing and fuzzing parse behavior without touching disk.
pub fn from_voc_xml_str(xml: &str) -> Result<(), Voc2CocoError> {
    parse_voc_xml_str(xml, Path::new("<memory>"))?;
    Ok(())
}

/// Parse VOC XML from bytes. The input must be valid UTF-8.
pub fn from_voc_xml_slice(bytes: &[u8]) -> Result<(), Voc2CocoError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| Voc2CocoError::VocXmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_voc_xml_str(xml)
}

/// Returns the direct children of `node` named `tag`, failing if their
/// number does not satisfy `expected`.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    expected: Cardinality,
    path: &Path,
) -> Result<Vec<Node<'a, 'input>>, Voc2CocoError> {
    let found: Vec<Node<'a, 'input>> = node
        .children()
        .filter(|child| child.is_element() && child.tag_name().name() == tag)
        .collect();

    if !expected.accepts(found.len()) {
        return Err(Voc2CocoError::ElementCount {
            path: path.to_path_buf(),
            element: tag.to_string(),
            context: format!("<{}>", node.tag_name().name()),
            expected: expected.to_string(),
            found: found.len(),
        });
    }

    Ok(found)
}

/// Returns the single child of `node` named `tag`.
pub fn find_child<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
) -> Result<Node<'a, 'input>, Voc2CocoError> {
    let mut found = find_children(node, tag, Cardinality::One, path)?;
    // Cardinality::One guarantees a single element.
    Ok(found.swap_remove(0))
}

fn resolve_file_name(root: Node<'_, '_>, path: &Path) -> Result<String, Voc2CocoError> {
    let paths = find_children(root, "path", Cardinality::Any, path)?;
    match paths.as_slice() {
        [] => element_text(find_child(root, "filename", path)?, path),
        [single] => {
            let raw = element_text(*single, path)?;
            basename(&raw)
                .map(ToOwned::to_owned)
                .ok_or_else(|| Voc2CocoError::VocXmlParse {
                    path: path.to_path_buf(),
                    message: format!("<path> '{raw}' does not end in a file name"),
                })
        }
        many => Err(Voc2CocoError::VocXmlParse {
            path: path.to_path_buf(),
            message: format!(
                "{} <path> elements found; expected at most one",
                many.len()
            ),
        }),
    }
}

/// Last component of a `/` or `\` separated path.
pub(crate) fn basename(raw: &str) -> Option<&str> {
    raw.rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
}

fn element_text(node: Node<'_, '_>, path: &Path) -> Result<String, Voc2CocoError> {
    node.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| Voc2CocoError::VocXmlParse {
            path: path.to_path_buf(),
            message: format!("empty <{}> element", node.tag_name().name()),
        })
}

fn parse_u32(node: Node<'_, '_>, path: &Path) -> Result<u32, Voc2CocoError> {
    let raw = element_text(node, path)?;
    raw.parse::<u32>().map_err(|_| Voc2CocoError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!(
            "invalid <{}> value '{raw}'; expected a non-negative integer",
            node.tag_name().name()
        ),
    })
}

fn parse_f64(node: Node<'_, '_>, path: &Path) -> Result<f64, Voc2CocoError> {
    let raw = element_text(node, path)?;
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Voc2CocoError::VocXmlParse {
            path: path.to_path_buf(),
            message: format!(
                "invalid <{}> value '{raw}'; expected a finite floating-point number",
                node.tag_name().name()
            ),
        })
}

fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(VOC_XML_EXTENSION))
        .unwrap_or(false)
}
