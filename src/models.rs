use image::DynamicImage;
use imageproc::point::Point;

use crate::pipeline::BoundingBox;

/// Outer boundary of one connected foreground region
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<u32>>,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Contour {
    /// Build a contour from its boundary points. Returns `None` for an empty
    /// point list.
    pub fn from_points(points: Vec<Point<u32>>) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            points,
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            x: self.min_x,
            y: self.min_y,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Crop the bounding box out of the source image, without padding
    pub fn extract_roi(&self, img: &DynamicImage) -> DynamicImage {
        let bbox = self.bounding_box();
        img.crop_imm(bbox.x, bbox.y, bbox.width, bbox.height)
    }
}

/// Inferred position of a piece in the sheet's grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCell {
    // Field order gives row-major ordering from the derived Ord.
    pub row: u32,
    pub col: u32,
}

/// A detected piece with its inferred grid position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceRecord {
    pub bbox: BoundingBox,
    pub cell: GridCell,
}
