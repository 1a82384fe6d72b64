//! Calibration values for a scan.
//!
//! Every number here depends on the scan resolution and the physical size of
//! the pieces. The defaults match a flatbed scan of 4-column piece sheets where
//! one piece is roughly 220 pixels wide.

use std::fmt;
use std::str::FromStr;

use crate::error::{ExtractError, Result};

/// Intensity level for the inverse binarization. Pixels strictly darker than
/// this become foreground.
pub const DEFAULT_THRESHOLD: u8 = 240;
pub const DEFAULT_MIN_SIZE: u32 = 200;
pub const DEFAULT_MAX_SIZE: u32 = 250;
pub const DEFAULT_COLUMNS: u32 = 4;

/// Inclusive size window for a piece's bounding box, applied to both width
/// and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeWindow {
    pub min: u32,
    pub max: u32,
}

impl SizeWindow {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }

    /// True when both dimensions fall inside the window
    pub fn accepts(&self, width: u32, height: u32) -> bool {
        self.contains(width) && self.contains(height)
    }
}

impl Default for SizeWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SIZE, DEFAULT_MAX_SIZE)
    }
}

/// How the vertical grid coordinate is normalized.
///
/// Columns are always interpolated against the configured column count. The
/// row coordinate needs a divisor too, and a sheet does not say how many rows
/// it has.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RowDivisor {
    /// `accepted / columns` as a real number, e.g. 2.5 for 10 pieces in
    /// 4 columns. This is what the original scanning script did.
    #[default]
    PieceRatio,
    /// `ceil(accepted / columns)`, the number of rows actually occupied
    Ceil,
    /// A fixed row count supplied by the caller
    Explicit(u32),
}

impl RowDivisor {
    pub fn resolve(&self, accepted: usize, columns: u32) -> f64 {
        let ratio = accepted as f64 / columns as f64;
        match *self {
            RowDivisor::PieceRatio => ratio,
            RowDivisor::Ceil => ratio.ceil(),
            RowDivisor::Explicit(rows) => rows as f64,
        }
    }
}

/// Parses `ratio`, `ceil`, or a positive row count
impl FromStr for RowDivisor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ratio" => Ok(RowDivisor::PieceRatio),
            "ceil" => Ok(RowDivisor::Ceil),
            other => match other.parse::<u32>() {
                Ok(0) => Err("row count must be at least 1".to_string()),
                Ok(rows) => Ok(RowDivisor::Explicit(rows)),
                Err(_) => Err(format!("expected `ratio`, `ceil` or a row count, got `{s}`")),
            },
        }
    }
}

impl fmt::Display for RowDivisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowDivisor::PieceRatio => write!(f, "ratio"),
            RowDivisor::Ceil => write!(f, "ceil"),
            RowDivisor::Explicit(rows) => write!(f, "{rows}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    pub threshold: u8,
    pub size_window: SizeWindow,
    pub columns: u32,
    pub rows: RowDivisor,
}

impl ExtractionConfig {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            size_window: SizeWindow::default(),
            columns: DEFAULT_COLUMNS,
            rows: RowDivisor::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_size_window(mut self, min: u32, max: u32) -> Self {
        self.size_window = SizeWindow::new(min, max);
        self
    }

    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_rows(mut self, rows: RowDivisor) -> Self {
        self.rows = rows;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.size_window.min > self.size_window.max {
            return Err(ExtractError::InvalidConfig(format!(
                "size window minimum {} exceeds maximum {}",
                self.size_window.min, self.size_window.max
            )));
        }
        if self.size_window.min == 0 {
            return Err(ExtractError::InvalidConfig(
                "size window minimum must be at least 1".to_string(),
            ));
        }
        if self.columns == 0 {
            return Err(ExtractError::InvalidConfig(
                "column count must be at least 1".to_string(),
            ));
        }
        if self.rows == RowDivisor::Explicit(0) {
            return Err(ExtractError::InvalidConfig(
                "row count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}
