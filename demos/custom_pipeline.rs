use image::ImageReader;
use piece_thumbs::detection::steps::*;
use piece_thumbs::{Pipeline, SizeWindow};
use std::env;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image_path>", args[0]);
        std::process::exit(1);
    }

    let image_path = &args[1];
    let img = ImageReader::open(image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    println!("Loaded image: {}x{}", img.width(), img.height());

    // Example 1: Everything the segmenter finds, before any size filter
    println!("\n=== All External Contours ===");
    let segment_only = Pipeline::new()
        .add_step_boxed(Box::new(GrayscaleStep))
        .add_step_boxed(Box::new(ThresholdStep { level: 240 }))
        .add_step_boxed(Box::new(ContourDetectionStep));

    let regions = segment_only.run(img.clone())?;
    println!("Total regions: {}", regions.len());
    for (i, region) in regions.iter().take(10).enumerate() {
        if let Some(bbox) = &region.bbox {
            println!("  {}: {}x{} at ({}, {})", i + 1, bbox.width, bbox.height, bbox.x, bbox.y);
        }
    }

    // Example 2: Tuned for a higher resolution scan with a darker background
    println!("\n\n=== Custom Pipeline (300 dpi, grey paper) ===");
    let custom = Pipeline::new()
        .add_step_boxed(Box::new(GrayscaleStep))
        .add_step_boxed(Box::new(ThresholdStep { level: 200 }))
        .add_step_boxed(Box::new(ContourDetectionStep))
        .add_step_boxed(Box::new(SizeFilterStep {
            window: SizeWindow::new(280, 340),
        }))
        .add_step_boxed(Box::new(GridMappingStep {
            columns: 5,
            rows: piece_thumbs::RowDivisor::Ceil,
        }))
        .add_step_boxed(Box::new(ReadingOrderStep));

    match custom.run(img.clone()) {
        Ok(pieces) => {
            for piece in &pieces {
                if let Some(record) = piece.piece_record() {
                    println!(
                        "  row {} col {}: {}x{} at ({}, {})",
                        record.cell.row,
                        record.cell.col,
                        record.bbox.width,
                        record.bbox.height,
                        record.bbox.x,
                        record.bbox.y
                    );
                }
            }
        }
        Err(e) => println!("Custom pipeline failed: {e}"),
    }

    // Example 3: Stop after thresholding to inspect the mask
    println!("\n\n=== Partial Pipeline (Stop After Threshold) ===");
    let default_steps = standard_steps(&piece_thumbs::ExtractionConfig::default());
    let partial = default_steps
        .into_iter()
        .fold(Pipeline::new(), |p, step| p.add_step_boxed(step));

    let masks = partial.run_partial(img, 2)?;
    if let Some(mask) = masks.first() {
        println!("  Mask: {}x{} image", mask.image.width(), mask.image.height());
        // Could save this for debugging:
        // mask.image.save("debug_mask.png")?;
    }

    Ok(())
}
