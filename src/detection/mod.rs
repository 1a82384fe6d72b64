pub mod contours;
pub mod grid;
pub mod preprocessing;
pub mod steps;

use image::DynamicImage;
use log::info;
use std::path::{Path, PathBuf};

use crate::config::ExtractionConfig;
use crate::emit::{EmitReport, write_pieces};
use crate::error::Result;
use crate::models::PieceRecord;
use crate::pipeline::{DebugConfig, Pipeline, PipelineData};

/// Main piece extraction orchestrator: load, segment, filter, order, crop
pub struct PieceExtractor {
    config: ExtractionConfig,
    debug: Option<DebugConfig>,
    verbose: bool,
}

impl PieceExtractor {
    /// Fails with `InvalidConfig` if the configuration cannot work
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            debug: None,
            verbose: false,
        })
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Save intermediate images of every step under `output_dir`
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        self.debug = Some(DebugConfig::prepare(output_dir)?);
        Ok(self)
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Build the composable pipeline for this configuration. Debug output for
    /// a batch goes to one subdirectory per image.
    pub fn build_pipeline(&self, debug_subdir: Option<&str>) -> Result<Pipeline> {
        let debug = match (&self.debug, debug_subdir) {
            (Some(debug), Some(subdir)) => Some(DebugConfig::prepare(debug.output_dir.join(subdir))?),
            (debug, None) => debug.clone(),
            (None, Some(_)) => None,
        };

        let pipeline = steps::standard_steps(&self.config)
            .into_iter()
            .fold(Pipeline::new(), |pipeline, step| pipeline.add_step_boxed(step))
            .with_verbose(self.verbose)
            .with_debug_config(debug);
        Ok(pipeline)
    }

    /// Detect pieces in an image, returning cropped regions in reading order
    pub fn detect(&self, img: &DynamicImage) -> Result<Vec<PipelineData>> {
        self.detect_with(&self.build_pipeline(None)?, img)
    }

    fn detect_with(&self, pipeline: &Pipeline, img: &DynamicImage) -> Result<Vec<PipelineData>> {
        pipeline.run(img.clone())
    }

    /// Bounding boxes and grid cells in reading order
    pub fn detect_records(&self, img: &DynamicImage) -> Result<Vec<PieceRecord>> {
        Ok(self
            .detect(img)?
            .iter()
            .filter_map(PipelineData::piece_record)
            .collect())
    }

    /// Extract every piece of one scan into `out_dir`, numbering from
    /// `start + 1`
    pub fn extract_file(&self, path: &Path, out_dir: &Path, start: u32) -> Result<EmitReport> {
        self.extract_file_with_debug(path, out_dir, start, None)
    }

    pub(crate) fn extract_file_with_debug(
        &self,
        path: &Path,
        out_dir: &Path,
        start: u32,
        debug_subdir: Option<&str>,
    ) -> Result<EmitReport> {
        info!("Loading image: {}", path.display());
        let img = preprocessing::load_image(path)?;
        info!("Image loaded: {}x{}", img.width(), img.height());

        let pipeline = self.build_pipeline(debug_subdir)?;
        let pieces = self.detect_with(&pipeline, &img)?;
        write_pieces(&pieces, out_dir, start)
    }
}
