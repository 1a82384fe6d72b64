use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Grid axis, used to report which extent collapsed during grid mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Source image missing or undecodable
    #[error("Image {path} could not be loaded")]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },

    /// No contour survived the size filter
    #[error("No pieces found within the accepted size window")]
    EmptyDetection,

    /// All accepted pieces share the same coordinate on one axis, so the
    /// grid position cannot be interpolated (always true for a single piece)
    #[error("Cannot map pieces onto a grid: {axis} extent is zero")]
    DegenerateGrid { axis: Axis },

    /// Output file could not be written
    #[error("Piece {path} could not be written")]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },

    /// Numbering `start + 1..=start + count` does not fit in a `u32`
    #[error("Piece numbers after {start} overflow with {count} more pieces")]
    CounterOverflow { start: u32, count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Debug directory is not empty: {0}")]
    DebugDirNotEmpty(PathBuf),

    #[error("Debug output failed")]
    DebugOutput(#[from] io::Error),

    #[error("Debug image {path} could not be saved")]
    DebugImage {
        path: PathBuf,
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
