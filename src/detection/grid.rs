//! Grid mapping: turn loose bounding boxes into (row, column) cells.
//!
//! Pieces on a scanned sheet are only roughly aligned, so cells are found by
//! interpolating each box's top-left corner across the extent spanned by all
//! accepted boxes and rounding to the nearest integer.

use log::debug;

use crate::config::RowDivisor;
use crate::error::{Axis, ExtractError, Result};
use crate::models::GridCell;
use crate::pipeline::BoundingBox;

/// Extent of the top-left corners of a set of bounding boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridExtent {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl GridExtent {
    /// Fails with `EmptyDetection` when `boxes` is empty
    pub fn from_boxes(boxes: &[BoundingBox]) -> Result<Self> {
        let first = boxes.first().ok_or(ExtractError::EmptyDetection)?;
        let mut extent = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        for b in &boxes[1..] {
            extent.min_x = extent.min_x.min(b.x);
            extent.max_x = extent.max_x.max(b.x);
            extent.min_y = extent.min_y.min(b.y);
            extent.max_y = extent.max_y.max(b.y);
        }
        Ok(extent)
    }

    pub fn span_x(&self) -> u32 {
        self.max_x - self.min_x
    }

    pub fn span_y(&self) -> u32 {
        self.max_y - self.min_y
    }
}

/// Linear position of `value` in `[min, min + span]`, scaled to `divisor`
/// and rounded half to even.
fn interpolate(value: u32, min: u32, span: u32, divisor: f64) -> u32 {
    let scaled = f64::from(value - min) * divisor / f64::from(span);
    scaled.round_ties_even() as u32
}

/// Compute a grid cell for every box, in input order.
///
/// Both spans must be non-zero: a single piece, or pieces sharing one row or
/// one column, leave nothing to interpolate against.
pub fn assign_cells(boxes: &[BoundingBox], columns: u32, rows: RowDivisor) -> Result<Vec<GridCell>> {
    let extent = GridExtent::from_boxes(boxes)?;
    if extent.span_x() == 0 {
        return Err(ExtractError::DegenerateGrid {
            axis: Axis::Horizontal,
        });
    }
    if extent.span_y() == 0 {
        return Err(ExtractError::DegenerateGrid {
            axis: Axis::Vertical,
        });
    }

    let col_divisor = f64::from(columns);
    let row_divisor = rows.resolve(boxes.len(), columns);
    debug!(
        "Grid extent x {}..{} y {}..{}, divisors col={} row={}",
        extent.min_x, extent.max_x, extent.min_y, extent.max_y, col_divisor, row_divisor
    );

    Ok(boxes
        .iter()
        .map(|b| GridCell {
            row: interpolate(b.y, extent.min_y, extent.span_y(), row_divisor),
            col: interpolate(b.x, extent.min_x, extent.span_x(), col_divisor),
        })
        .collect())
}

/// Indices of `cells` in reading order. Stable: equal cells keep their
/// original relative order.
pub fn reading_order(cells: &[GridCell]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..cells.len()).collect();
    order.sort_by_key(|&i| cells[i]);
    order
}
