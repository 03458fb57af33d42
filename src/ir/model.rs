//! Records that make up a COCO instances document.
//!
//! Field declaration order is the key order of the emitted JSON.

use serde::{Deserialize, Serialize};

use super::bbox::BBoxXYXY;
use super::ids::{AnnotationId, CategoryId, ImageId};
use crate::error::Voc2CocoError;

/// One entry of the `images` list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub file_name: String,
    pub height: u32,
    pub width: u32,
    pub id: ImageId,
}

impl Image {
    pub fn new(
        id: impl Into<ImageId>,
        file_name: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            height,
            width,
            id: id.into(),
        }
    }
}

/// One entry of the `annotations` list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub area: f64,
    pub iscrowd: u8,
    pub image_id: ImageId,

    /// `[x, y, width, height]` with `(x, y)` the top-left corner.
    pub bbox: [f64; 4],
    pub category_id: CategoryId,
    pub id: AnnotationId,
    pub ignore: u8,

    /// Polygon list synthesized from the box outline.
    pub segmentation: Vec<Vec<f64>>,
}

impl Annotation {
    /// Builds a non-crowd annotation whose geometry is derived from `bbox`.
    pub fn from_bbox(
        id: AnnotationId,
        image_id: ImageId,
        category_id: CategoryId,
        bbox: &BBoxXYXY,
    ) -> Self {
        Self {
            area: bbox.area(),
            iscrowd: 0,
            image_id,
            bbox: bbox.to_xywh(),
            category_id,
            id,
            ignore: 0,
            segmentation: bbox.segmentation(),
        }
    }
}

/// One entry of the `categories` list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub supercategory: String,
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Builds a category, taking the supercategory from the text before the
    /// first underscore of `name`.
    pub fn from_name(id: CategoryId, name: &str) -> Result<Self, Voc2CocoError> {
        let (supercategory, _) = name
            .split_once('_')
            .ok_or_else(|| Voc2CocoError::MissingSupercategory {
                name: name.to_string(),
            })?;

        Ok(Self {
            supercategory: supercategory.to_string(),
            id,
            name: name.to_string(),
        })
    }
}
