use image::DynamicImage;
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ExtractError, Result};
use crate::models::{GridCell, PieceRecord};

/// Metadata key for the inferred grid row
pub const GRID_ROW: &str = "grid_row";
/// Metadata key for the inferred grid column
pub const GRID_COL: &str = "grid_col";

/// Bounding box in the original image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Data that flows through the pipeline
/// Each PipelineData represents a single image region with associated metadata
#[derive(Clone)]
pub struct PipelineData {
    /// The image data (full image, intensity, mask, or a cropped piece)
    pub image: DynamicImage,

    /// Reference to the original image (shared efficiently via Arc)
    pub original: Arc<DynamicImage>,

    /// Bounding box in the original image (None means full image)
    pub bbox: Option<BoundingBox>,

    /// Metadata for tracking properties (e.g., "grid_row", "grid_col")
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Int(i64),
}

impl PipelineData {
    /// Create PipelineData for a full image
    pub fn from_image(image: DynamicImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            bbox: None,
            metadata: HashMap::new(),
        }
    }

    /// Create PipelineData for a region of an image
    pub fn from_region(image: DynamicImage, original: Arc<DynamicImage>, bbox: BoundingBox) -> Self {
        Self {
            image,
            original,
            bbox: Some(bbox),
            metadata: HashMap::new(),
        }
    }

    /// Same region and metadata, different image
    pub fn with_image(&self, image: DynamicImage) -> Self {
        Self {
            image,
            original: self.original.clone(),
            bbox: self.bbox,
            metadata: self.metadata.clone(),
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get metadata as integer
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Int(v)) => Some(*v),
            None => None,
        }
    }

    /// Grid position assigned by the grid mapping step
    pub fn grid_cell(&self) -> Option<GridCell> {
        let row = u32::try_from(self.get_int(GRID_ROW)?).ok()?;
        let col = u32::try_from(self.get_int(GRID_COL)?).ok()?;
        Some(GridCell { row, col })
    }

    pub fn piece_record(&self) -> Option<PieceRecord> {
        Some(PieceRecord {
            bbox: self.bbox?,
            cell: self.grid_cell()?,
        })
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// Prepare a debug directory. The directory must be empty or non-existent.
    pub fn prepare(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(ExtractError::DebugDirNotEmpty(output_dir));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        Ok(Self { output_dir })
    }

    fn save(&self, dir_name: &str, items: &[PipelineData]) -> Result<()> {
        let step_dir = self.output_dir.join(dir_name);
        std::fs::create_dir_all(&step_dir)?;

        for (idx, item) in items.iter().enumerate() {
            let output_path = step_dir.join(format!("{:02}.png", idx + 1));
            save_debug_image(&item.image, &output_path)?;
        }

        debug!("Debug: saved {} images to {}/", items.len(), dir_name);
        Ok(())
    }
}

fn save_debug_image(image: &DynamicImage, path: &Path) -> Result<()> {
    image.save(path).map_err(|source| ExtractError::DebugImage {
        path: path.to_path_buf(),
        source,
    })
}

/// Directory name for a step's debug output, e.g. "02_inverse_threshold"
fn step_dir_name(step_idx: usize, step_name: &str) -> String {
    format!(
        "{:02}_{}",
        step_idx + 1,
        step_name.to_lowercase().replace(' ', "_")
    )
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Process data and return transformed data
    /// Steps can split data (1 → many), filter (many → fewer), or transform (many → many)
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>>;

    /// Human-readable name for this step (used in log output)
    fn name(&self) -> &str;
}

/// Composable pipeline builder
pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
        }
    }

    /// Enable per-item log output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        self.context.debug = Some(DebugConfig::prepare(output_dir)?);
        Ok(self)
    }

    /// Attach an already prepared debug configuration
    pub fn with_debug_config(mut self, debug: Option<DebugConfig>) -> Self {
        self.context.debug = debug;
        self
    }

    /// Add a processing step to the pipeline
    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Run the pipeline sequentially on an input image
    pub fn run(&self, input: DynamicImage) -> Result<Vec<PipelineData>> {
        self.run_partial(input, self.steps.len())
    }

    /// Run the pipeline but stop after `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: DynamicImage, num_steps: usize) -> Result<Vec<PipelineData>> {
        if let Some(debug_config) = self.context.debug.as_ref() {
            let input_dir = debug_config.output_dir.join("00_input");
            std::fs::create_dir_all(&input_dir)?;
            save_debug_image(&input, &input_dir.join("01.png"))?;
            debug!("Debug: saved 00_input/01.png");
        }

        // Start with a single PipelineData containing the full image
        let mut data = vec![PipelineData::from_image(input)];

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            debug!(
                "Running step {}: {} (processing {} items)",
                step_idx + 1,
                step.name(),
                data.len()
            );

            data = step.process(data, &self.context)?;

            if let Some(debug_config) = self.context.debug.as_ref() {
                debug_config.save(&step_dir_name(step_idx, step.name()), &data)?;
            }

            info!("{}: {} items", step.name(), data.len());
        }

        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
