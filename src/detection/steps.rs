use crate::config::{ExtractionConfig, RowDivisor, SizeWindow};
use crate::detection::{contours, grid, preprocessing};
use crate::error::Result;
use crate::models::GridCell;
use crate::pipeline::{BoundingBox, GRID_COL, GRID_ROW, MetadataValue, PipelineContext, PipelineData, PipelineStep};
use image::DynamicImage;
use log::debug;

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let gray = preprocessing::to_grayscale(&item.image);
                item.with_image(DynamicImage::ImageLuma8(gray))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Inverse binary threshold: dark pixels become foreground
pub struct ThresholdStep {
    pub level: u8,
}

impl PipelineStep for ThresholdStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let gray = item.image.to_luma8();
                let mask = preprocessing::binarize_inverse(&gray, self.level);
                item.with_image(DynamicImage::ImageLuma8(mask))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Inverse Threshold"
    }
}

/// Find external contours in the mask - splits one image into many regions,
/// each cropped from the original image
pub struct ContourDetectionStep;

impl PipelineStep for ContourDetectionStep {
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let mask = item.image.to_luma8();
            let detected = contours::find_external_contours(&mask);
            debug!("Found {} external contours", detected.len());

            for contour in detected {
                let bbox = contour.bounding_box();
                if context.verbose {
                    debug!(
                        "  Contour at ({}, {}) size {}x{}, {} boundary points",
                        bbox.x,
                        bbox.y,
                        bbox.width,
                        bbox.height,
                        contour.points.len()
                    );
                }

                let cropped = contour.extract_roi(&item.original);
                result.push(PipelineData::from_region(cropped, item.original.clone(), bbox));
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Contour Detection"
    }
}

/// Keep only regions whose bounding box fits the size window
pub struct SizeFilterStep {
    pub window: SizeWindow,
}

impl PipelineStep for SizeFilterStep {
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let total = data.len();
        let kept: Vec<PipelineData> = data
            .into_iter()
            .filter(|item| match item.bbox {
                Some(b) => {
                    let accepted = self.window.accepts(b.width, b.height);
                    if context.verbose && !accepted {
                        debug!("  Rejected {}x{} region at ({}, {})", b.width, b.height, b.x, b.y);
                    }
                    accepted
                }
                None => false,
            })
            .collect();

        debug!(
            "Accepted {} of {} regions within {}..={} px",
            kept.len(),
            total,
            self.window.min,
            self.window.max
        );
        Ok(kept)
    }

    fn name(&self) -> &str {
        "Size Filter"
    }
}

/// Assign every region a grid cell, stored as `grid_row`/`grid_col` metadata
pub struct GridMappingStep {
    pub columns: u32,
    pub rows: RowDivisor,
}

impl PipelineStep for GridMappingStep {
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let boxes: Vec<BoundingBox> = data.iter().filter_map(|item| item.bbox).collect();
        let cells = grid::assign_cells(&boxes, self.columns, self.rows)?;

        Ok(data
            .into_iter()
            .filter(|item| item.bbox.is_some())
            .zip(cells)
            .map(|(item, cell)| {
                if context.verbose {
                    debug!("  Region at {:?} -> row {} col {}", item.bbox, cell.row, cell.col);
                }
                item.with_metadata(GRID_ROW, MetadataValue::Int(i64::from(cell.row)))
                    .with_metadata(GRID_COL, MetadataValue::Int(i64::from(cell.col)))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Grid Mapping"
    }
}

/// Stable sort of grid-mapped regions into reading order
pub struct ReadingOrderStep;

impl PipelineStep for ReadingOrderStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        // Regions without a cell go last; the grid mapping step never leaves any.
        let (mapped, unmapped): (Vec<_>, Vec<_>) =
            data.into_iter().partition(|item| item.grid_cell().is_some());
        let cells: Vec<GridCell> = mapped.iter().filter_map(PipelineData::grid_cell).collect();

        let mut slots: Vec<Option<PipelineData>> = mapped.into_iter().map(Some).collect();
        let mut ordered: Vec<PipelineData> = grid::reading_order(&cells)
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();
        ordered.extend(unmapped);
        Ok(ordered)
    }

    fn name(&self) -> &str {
        "Reading Order"
    }
}

/// All steps for a configuration, in execution order
pub fn standard_steps(config: &ExtractionConfig) -> Vec<Box<dyn PipelineStep>> {
    vec![
        Box::new(GrayscaleStep),
        Box::new(ThresholdStep {
            level: config.threshold,
        }),
        Box::new(ContourDetectionStep),
        Box::new(SizeFilterStep {
            window: config.size_window,
        }),
        Box::new(GridMappingStep {
            columns: config.columns,
            rows: config.rows,
        }),
        Box::new(ReadingOrderStep),
    ]
}
