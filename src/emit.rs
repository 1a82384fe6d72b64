use image::ImageFormat;
use log::{debug, info};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::error::{ExtractError, Result};
use crate::pipeline::PipelineData;

/// File name of the `n`-th piece, e.g. "piece17.png"
pub fn piece_filename(n: u32) -> String {
    format!("piece{n}.png")
}

/// Files written for one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Counter value before this scan; the first piece is `start + 1`
    pub start: u32,
    /// Paths in numbering order
    pub written: Vec<PathBuf>,
}

impl EmitReport {
    pub fn count(&self) -> u32 {
        self.written.len() as u32
    }

    /// Counter value after this scan, i.e. the `start` for the next one
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.count())
    }

    /// Numbers of the pieces written, in order
    pub fn numbers(&self) -> RangeInclusive<u32> {
        if self.written.is_empty() {
            return RangeInclusive::new(1, 0);
        }
        self.start.saturating_add(1)..=self.end()
    }
}

/// Save every piece image as `piece{n}.png` in `out_dir`, with `n` running
/// from `start + 1` in the order given. Existing files are overwritten.
///
/// Fails with `CounterOverflow` before writing anything if the last number
/// would not fit in a `u32`.
pub fn write_pieces(pieces: &[PipelineData], out_dir: &Path, start: u32) -> Result<EmitReport> {
    check_counter(start, pieces.len())?;
    let mut report = EmitReport {
        start,
        written: Vec::with_capacity(pieces.len()),
    };

    for (idx, piece) in pieces.iter().enumerate() {
        let path = out_dir.join(piece_filename(start + idx as u32 + 1));
        piece
            .image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| ExtractError::Write {
                path: path.clone(),
                source,
            })?;
        debug!("Wrote {} ({}x{})", path.display(), piece.image.width(), piece.image.height());
        report.written.push(path);
    }

    info!(
        "Wrote {} pieces to {}",
        report.count(),
        out_dir.display()
    );
    Ok(report)
}

/// Counter value after `count` more pieces
fn check_counter(start: u32, count: usize) -> Result<u32> {
    u32::try_from(count)
        .ok()
        .and_then(|n| start.checked_add(n))
        .ok_or(ExtractError::CounterOverflow { start, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma};

    fn piece(shade: u8) -> PipelineData {
        PipelineData::from_image(DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 2, Luma([shade]))))
    }

    #[test]
    fn numbering_starts_after_offset() {
        let dir = tempfile::TempDir::new().unwrap();
        let report = write_pieces(&[piece(10), piece(20), piece(30)], dir.path(), 16).unwrap();

        let names: Vec<String> = report
            .written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["piece17.png", "piece18.png", "piece19.png"]);
        assert_eq!(report.end(), 19);
        assert_eq!(report.numbers(), 17..=19);

        let second = image::open(dir.path().join("piece18.png")).unwrap().to_luma8();
        assert_eq!(second.get_pixel(0, 0)[0], 20);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let report = write_pieces(&[], dir.path(), 5).unwrap();
        assert_eq!(report.count(), 0);
        assert_eq!(report.end(), 5);
        assert!(report.numbers().is_empty());

        let report = write_pieces(&[], dir.path(), u32::MAX).unwrap();
        assert_eq!(report.end(), u32::MAX);
    }

    #[test]
    fn numbering_may_end_at_u32_max() {
        let dir = tempfile::TempDir::new().unwrap();
        let report = write_pieces(&[piece(0)], dir.path(), u32::MAX - 1).unwrap();
        assert_eq!(report.numbers(), u32::MAX..=u32::MAX);
        assert!(dir.path().join(format!("piece{}.png", u32::MAX)).exists());
    }

    #[test]
    fn counter_overflow_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = write_pieces(&[piece(0), piece(1)], dir.path(), u32::MAX - 1);
        assert!(matches!(
            result,
            Err(ExtractError::CounterOverflow { start, count: 2 }) if start == u32::MAX - 1
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        assert!(write_pieces(&[piece(0)], dir.path(), u32::MAX).is_err());
        assert!(!dir.path().join("piece0.png").exists());
    }

    #[test]
    fn empty_report_at_u32_max_has_no_numbers() {
        let report = EmitReport {
            start: u32::MAX,
            written: Vec::new(),
        };
        assert_eq!(report.end(), u32::MAX);
        assert!(report.numbers().is_empty());
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("does/not/exist");
        let result = write_pieces(&[piece(0)], &missing, 0);
        assert!(matches!(result, Err(ExtractError::Write { .. })));
    }
}
