//! Several scans into one contiguous set of numbered pieces.

use log::info;
use std::path::{Path, PathBuf};

use crate::detection::PieceExtractor;
use crate::emit::EmitReport;
use crate::error::Result;

/// Per-scan results of a batch, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub start: u32,
    pub images: Vec<(PathBuf, EmitReport)>,
}

impl BatchReport {
    pub fn count(&self) -> u32 {
        self.images
            .iter()
            .fold(0u32, |total, (_, r)| total.saturating_add(r.count()))
    }

    /// Counter value after the whole batch
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.count())
    }

    pub fn written(&self) -> impl Iterator<Item = &PathBuf> {
        self.images.iter().flat_map(|(_, r)| r.written.iter())
    }
}

/// Process `paths` in order, each scan continuing the numbering where the
/// previous one stopped. The first error aborts the batch; files already
/// written stay on disk.
pub fn extract_batch<P: AsRef<Path>>(
    extractor: &PieceExtractor,
    paths: &[P],
    out_dir: &Path,
    start: u32,
) -> Result<BatchReport> {
    let mut report = BatchReport {
        start,
        images: Vec::with_capacity(paths.len()),
    };
    let mut counter = start;

    for (idx, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let debug_subdir = format!("{:02}_{}", idx + 1, file_stem(path));
        let emitted = extractor.extract_file_with_debug(path, out_dir, counter, Some(&debug_subdir))?;
        info!("{}: pieces {:?}", path.display(), emitted.numbers());
        counter = emitted.end();
        report.images.push((path.to_path_buf(), emitted));
    }

    Ok(report)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}
