use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use piece_thumbs::config::{DEFAULT_COLUMNS, DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE, DEFAULT_THRESHOLD};
use piece_thumbs::{ExtractionConfig, PieceExtractor, RowDivisor, extract_batch};

#[derive(Parser)]
#[command(name = "piece-thumbs")]
#[command(about = "Cut numbered piece thumbnails out of scanned piece sheets")]
struct Cli {
    /// Scanned sheets, processed in order
    #[arg(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// Number of the piece before the first one written
    #[arg(long, default_value_t = 0)]
    start: u32,

    /// Directory for piece{n}.png files
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Grid columns on the sheet
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    columns: u32,

    /// Row divisor for grid mapping: `ratio` (pieces / columns), `ceil`
    /// (pieces / columns rounded up) or an explicit row count
    #[arg(long, value_name = "ratio|ceil|N", default_value_t = RowDivisor::PieceRatio)]
    rows: RowDivisor,

    /// Pixels darker than this are foreground
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Smallest accepted piece width/height in pixels
    #[arg(long, default_value_t = DEFAULT_MIN_SIZE)]
    min_size: u32,

    /// Largest accepted piece width/height in pixels
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    max_size: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> ExtractionConfig {
        ExtractionConfig::new()
            .with_threshold(self.threshold)
            .with_size_window(self.min_size, self.max_size)
            .with_columns(self.columns)
            .with_rows(self.rows)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut extractor = PieceExtractor::new(args.config())?.with_verbose(args.verbose);
    if let Some(debug_dir) = &args.debug_out {
        extractor = extractor
            .with_debug(debug_dir.clone())
            .with_context(|| format!("Failed to prepare debug directory {}", debug_dir.display()))?;
    }

    let report = extract_batch(&extractor, args.images.as_slice(), &args.out_dir, args.start)
        .context("Piece extraction failed")?;

    for (path, emitted) in &report.images {
        let numbers = emitted.numbers();
        println!(
            "{}: {} pieces (piece{}..piece{})",
            path.display(),
            emitted.count(),
            numbers.start(),
            numbers.end()
        );
    }
    println!(
        "Total: {} pieces written to {} (next start: {})",
        report.count(),
        args.out_dir.display(),
        report.end()
    );

    Ok(())
}
