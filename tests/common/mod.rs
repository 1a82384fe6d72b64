mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from piece_thumbs for tests
pub use piece_thumbs::{
    Axis, BoundingBox, ExtractError, ExtractionConfig, PieceExtractor, RowDivisor, extract_batch,
};
