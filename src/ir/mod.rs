//! In-memory records for a VOC to COCO conversion.
//!
//! VOC files are parsed into [`io_voc_xml::VocAnnotation`] values, category
//! names are mapped through a [`CategoryRegistry`], and the resulting
//! [`Image`], [`Annotation`] and [`Category`] records are assembled into a
//! [`io_coco_json::CocoDocument`].
//!
//! # Example
//!
//! ```
//! use voc2coco::ir::{Annotation, AnnotationId, BBoxXYXY, CategoryId, ImageId};
//!
//! let bbox = BBoxXYXY::from_xyxy(0.0, 0.0, 10.0, 4.0);
//! let ann = Annotation::from_bbox(AnnotationId(0), ImageId(0), CategoryId(1), &bbox);
//! assert_eq!(ann.bbox, [0.0, 0.0, 10.0, 4.0]);
//! assert_eq!(ann.segmentation[0][2..4], [0.0, 2.0]);
//! ```

mod bbox;
mod ids;
pub mod io_coco_json;
pub mod io_voc_xml;
mod model;
mod registry;

pub use bbox::BBoxXYXY;
pub use ids::{AnnotationId, CategoryId, IdCounter, ImageId};
pub use model::{Annotation, Category, Image};
pub use registry::CategoryRegistry;
