use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};

use crate::models::Contour;

/// Find the outer boundary of every top-level foreground region.
///
/// Holes are skipped, and so is anything nested inside a hole: a piece's
/// printed pattern never shows up as a separate contour.
pub fn find_external_contours(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<u32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .filter_map(|c| Contour::from_points(c.points))
        .collect()
}
