//! Cut individual piece thumbnails out of scanned sheets.
//!
//! A sheet is a light background with dark, roughly square pieces laid out in
//! a grid. Each piece is found as an external contour of the thresholded scan,
//! kept if its bounding box fits the size window, given a (row, column) cell
//! and written as `piece{n}.png` in reading order.
//!
//! ```no_run
//! # use piece_thumbs::{ExtractionConfig, PieceExtractor, extract_batch};
//! # use std::path::Path;
//! let extractor = PieceExtractor::new(ExtractionConfig::default())?;
//! let report = extract_batch(&extractor, &["sheet1.png", "sheet2.png"], Path::new("."), 0)?;
//! println!("{} pieces", report.count());
//! # Ok::<(), piece_thumbs::ExtractError>(())
//! ```

pub mod batch;
pub mod config;
pub mod detection;
pub mod emit;
pub mod error;
pub mod models;
pub mod pipeline;

pub use batch::{BatchReport, extract_batch};
pub use config::{ExtractionConfig, RowDivisor, SizeWindow};
pub use detection::PieceExtractor;
pub use emit::{EmitReport, piece_filename, write_pieces};
pub use error::{Axis, ExtractError};
pub use models::{Contour, GridCell, PieceRecord};
pub use pipeline::{
    BoundingBox, DebugConfig, MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep,
};
