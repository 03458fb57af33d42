//! Bounding boxes and the pseudo-segmentation derived from them.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in XYXY pixel format, as found in `<bndbox>`.
///
/// Construction does not check ordering; [`BBoxXYXY::is_positive`] is the
/// gate the extractor applies before emitting an annotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BBoxXYXY {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BBoxXYXY {
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Absolute horizontal extent.
    #[inline]
    pub fn width(&self) -> f64 {
        (self.xmax - self.xmin).abs()
    }

    /// Absolute vertical extent.
    #[inline]
    pub fn height(&self) -> f64 {
        (self.ymax - self.ymin).abs()
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// True when `xmax > xmin` and `ymax > ymin`. NaN coordinates fail.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.xmax > self.xmin && self.ymax > self.ymin
    }

    /// COCO `[x, y, width, height]` with `(x, y)` the top-left corner.
    #[inline]
    pub fn to_xywh(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.width(), self.height()]
    }

    /// Eight-vertex outline of the box: the four corners plus the four edge
    /// midpoints, flattened to 16 coordinates.
    ///
    /// Vertex order is top-left, left-mid, bottom-left, bottom-mid,
    /// bottom-right, right-mid, top-right, top-mid.
    pub fn outline_polygon(&self) -> [f64; 16] {
        let Self {
            xmin,
            ymin,
            xmax,
            ymax,
        } = *self;
        let h = ymax - ymin;
        let w = xmax - xmin;
        [
            xmin,
            ymin,
            xmin,
            ymin + 0.5 * h,
            xmin,
            ymax,
            xmin + 0.5 * w,
            ymax,
            xmax,
            ymax,
            xmax,
            ymax - 0.5 * h,
            xmax,
            ymin,
            xmax - 0.5 * w,
            ymin,
        ]
    }

    /// The outline wrapped as a COCO polygon list (always one polygon).
    pub fn segmentation(&self) -> Vec<Vec<f64>> {
        vec![self.outline_polygon().to_vec()]
    }
}
