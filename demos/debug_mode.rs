use piece_thumbs::{ExtractionConfig, PieceExtractor};
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let debug_dir = PathBuf::from("debug_output");

    // Remove directory if it exists (for testing)
    if debug_dir.exists() {
        std::fs::remove_dir_all(&debug_dir)?;
    }

    let extractor = PieceExtractor::new(ExtractionConfig::default())?
        .with_verbose(true)
        .with_debug(debug_dir.clone())?;

    println!("Running extraction with debug mode...");
    let report = extractor.extract_file(Path::new("test_sheet.png"), Path::new("."), 0)?;

    println!("\nExtraction completed: {} pieces", report.count());
    println!("\nDebug outputs saved to: {}/", debug_dir.display());
    println!("  00_input/                - Original scan");
    println!("  01_grayscale_conversion/ - Intensity image");
    println!("  02_inverse_threshold/    - Foreground mask");
    println!("  03_contour_detection/    - Every external contour, cropped");
    println!("  04_size_filter/          - Pieces inside the size window");
    println!("  05_grid_mapping/         - Same pieces, grid cells assigned");
    println!("  06_reading_order/        - Pieces in output order");

    for entry in std::fs::read_dir(&debug_dir)?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let count = std::fs::read_dir(&path)?.count();
            println!("  {}/ - {} files", entry.file_name().to_string_lossy(), count);
        }
    }

    Ok(())
}
