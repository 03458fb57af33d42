use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of every failure the converter can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// An XML element is missing, duplicated, or malformed.
    Structural,
    /// A bounding box has non-positive width or height.
    Geometry,
    /// A category name lacks the `supercategory_subtype` delimiter.
    NamingConvention,
    /// Reading input or writing output failed.
    Io,
}

/// The main error type for voc2coco operations.
#[derive(Debug, Error)]
pub enum Voc2CocoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input directory {path}: {message}")]
    InputDirInvalid { path: PathBuf, message: String },

    #[error("Failed to parse VOC XML {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Wrong number of <{element}> in {context} of {path}: expected {expected}, found {found}")]
    ElementCount {
        path: PathBuf,
        element: String,
        context: String,
        expected: String,
        found: usize,
    },

    #[error(
        "Degenerate bounding box in object #{object_index} of {path}: \
         [{xmin}, {ymin}, {xmax}, {ymax}] (xmax must exceed xmin and ymax must exceed ymin)"
    )]
    InvalidBBox {
        path: PathBuf,
        object_index: usize,
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
    },

    #[error("Category '{name}' has no supercategory: expected a name of the form 'supercategory_subtype'")]
    MissingSupercategory { name: String },

    #[error("Image file name '{file_name}' in {path} is supposed to be an integer")]
    InvalidFilenameId { path: PathBuf, file_name: String },

    #[error("Failed to parse category table {path}: {source}")]
    CategoryTableParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid category table: {message}")]
    InvalidCategoryTable { message: String },

    #[error("Failed to write COCO JSON to {path}: {source}")]
    CocoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Voc2CocoError {
    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Voc2CocoError::Io(_)
            | Voc2CocoError::InputDirInvalid { .. }
            | Voc2CocoError::CocoJsonWrite { .. } => ErrorKind::Io,
            Voc2CocoError::InvalidBBox { .. } => ErrorKind::Geometry,
            Voc2CocoError::MissingSupercategory { .. } => ErrorKind::NamingConvention,
            Voc2CocoError::VocXmlParse { .. }
            | Voc2CocoError::ElementCount { .. }
            | Voc2CocoError::InvalidFilenameId { .. }
            | Voc2CocoError::CategoryTableParse { .. }
            | Voc2CocoError::InvalidCategoryTable { .. } => ErrorKind::Structural,
        }
    }
}
