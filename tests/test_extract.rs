//! End-to-end tests: synthetic scans in, numbered piece files out.

mod common;

use common::*;
use image::Rgb;

fn extractor() -> PieceExtractor {
    PieceExtractor::new(ExtractionConfig::default()).expect("default config is valid")
}

#[test]
fn test_two_by_four_sheet_in_reading_order() -> anyhow::Result<()> {
    let input = tempfile::TempDir::new()?;
    let output = tempfile::TempDir::new()?;
    let sheet = grid_sheet(2, 4, false);
    let path = save_sheet(input.path(), "sheet.png", &sheet.image);

    let report = extractor().extract_file(&path, output.path(), 0)?;

    assert_eq!(report.count(), 8);
    let expected: Vec<String> = (1..=8).map(|n| format!("piece{n}.png")).collect();
    let mut sorted_expected = expected.clone();
    sorted_expected.sort();
    assert_eq!(file_names(output.path()), sorted_expected);

    for (n, bbox) in (1..=8).zip(&sheet.pieces) {
        assert_piece_matches(&output.path().join(format!("piece{n}.png")), &sheet.image, *bbox);
    }

    Ok(())
}

#[test]
fn test_start_offsets_numbering() -> anyhow::Result<()> {
    let input = tempfile::TempDir::new()?;
    let output = tempfile::TempDir::new()?;
    let sheet = grid_sheet(2, 4, false);
    let path = save_sheet(input.path(), "sheet.png", &sheet.image);

    let report = extractor().extract_file(&path, output.path(), 16)?;

    assert_eq!(report.numbers(), 17..=24);
    assert!(!output.path().join("piece16.png").exists());
    assert!(!output.path().join("piece25.png").exists());
    assert_piece_matches(&output.path().join("piece17.png"), &sheet.image, sheet.pieces[0]);
    assert_piece_matches(&output.path().join("piece24.png"), &sheet.image, sheet.pieces[7]);

    Ok(())
}

#[test]
fn test_hand_placed_pieces_keep_row_major_order() -> anyhow::Result<()> {
    let sheet = grid_sheet(2, 4, true);
    let img = image::DynamicImage::ImageRgb8(sheet.image.clone());

    let records = extractor().detect_records(&img)?;

    let boxes: Vec<BoundingBox> = records.iter().map(|r| r.bbox).collect();
    assert_eq!(boxes, sheet.pieces);
    let cells: Vec<(u32, u32)> = records.iter().map(|r| (r.cell.row, r.cell.col)).collect();
    assert_eq!(
        cells,
        vec![(0, 0), (0, 1), (0, 3), (0, 4), (2, 0), (2, 1), (2, 3), (2, 4)]
    );

    Ok(())
}

#[test]
fn test_noise_and_wrong_sizes_are_ignored() -> anyhow::Result<()> {
    let mut sheet = grid_sheet(2, 4, false);
    // Specks in the margin and a thin strip along the right edge
    let dark = Rgb([0, 0, 0]);
    fill(&mut sheet.image, BoundingBox { x: 5, y: 5, width: 6, height: 6 }, dark);
    fill(&mut sheet.image, BoundingBox { x: 1285, y: 20, width: 3, height: 600 }, dark);
    fill(&mut sheet.image, BoundingBox { x: 20, y: 280, width: 25, height: 30 }, dark);
    // A light pattern with a dark mark inside one piece
    fill(&mut sheet.image, BoundingBox { x: 400, y: 100, width: 100, height: 100 }, Rgb([250, 250, 250]));
    fill(&mut sheet.image, BoundingBox { x: 430, y: 130, width: 20, height: 20 }, dark);

    let img = image::DynamicImage::ImageRgb8(sheet.image.clone());
    let records = extractor().detect_records(&img)?;

    let boxes: Vec<BoundingBox> = records.iter().map(|r| r.bbox).collect();
    assert_eq!(boxes, sheet.pieces);

    Ok(())
}

#[test]
fn test_light_tint_beside_a_piece_is_background() -> anyhow::Result<()> {
    let mut sheet = grid_sheet(2, 4, false);
    // Intensity 240 under BT.601, so it must not widen the first piece
    let first = sheet.pieces[0];
    let tint = BoundingBox { x: first.x + first.width, y: first.y, width: 40, height: first.height };
    fill(&mut sheet.image, tint, Rgb([255, 230, 255]));

    let img = image::DynamicImage::ImageRgb8(sheet.image.clone());
    let records = extractor().detect_records(&img)?;

    let boxes: Vec<BoundingBox> = records.iter().map(|r| r.bbox).collect();
    assert_eq!(boxes, sheet.pieces);

    Ok(())
}

#[test]
fn test_size_window_boundaries_are_inclusive() -> anyhow::Result<()> {
    let mut image = image::RgbImage::from_pixel(1400, 700, WHITE);
    let sizes = [(199, 220), (200, 200), (250, 250), (251, 220)];
    for (i, &(w, h)) in sizes.iter().enumerate() {
        let bbox = BoundingBox { x: 50 + i as u32 * 320, y: 50, width: w, height: h };
        fill(&mut image, bbox, piece_color(i as u32));
    }
    // Second row so the grid has a vertical extent
    for i in 0..2u32 {
        let bbox = BoundingBox { x: 50 + i * 320, y: 400, width: 220, height: 220 };
        fill(&mut image, bbox, piece_color(4 + i));
    }

    let img = image::DynamicImage::ImageRgb8(image);
    let records = extractor().detect_records(&img)?;

    let sizes: Vec<(u32, u32)> = records.iter().map(|r| (r.bbox.width, r.bbox.height)).collect();
    assert_eq!(sizes, vec![(200, 200), (250, 250), (220, 220), (220, 220)]);

    Ok(())
}

#[test]
fn test_single_piece_fails_with_degenerate_grid() -> anyhow::Result<()> {
    let input = tempfile::TempDir::new()?;
    let output = tempfile::TempDir::new()?;
    let sheet = single_piece_sheet();
    let path = save_sheet(input.path(), "single.png", &sheet.image);

    let result = extractor().extract_file(&path, output.path(), 0);

    assert!(
        matches!(result, Err(ExtractError::DegenerateGrid { axis: Axis::Horizontal })),
        "single piece should not map onto a grid"
    );
    assert!(file_names(output.path()).is_empty());

    Ok(())
}

#[test]
fn test_blank_sheet_fails_with_empty_detection() -> anyhow::Result<()> {
    let input = tempfile::TempDir::new()?;
    let output = tempfile::TempDir::new()?;
    let blank = image::RgbImage::from_pixel(500, 500, WHITE);
    let path = save_sheet(input.path(), "blank.png", &blank);

    let result = extractor().extract_file(&path, output.path(), 0);

    assert!(matches!(result, Err(ExtractError::EmptyDetection)));
    Ok(())
}

#[test]
fn test_missing_image_is_a_load_error() -> anyhow::Result<()> {
    let output = tempfile::TempDir::new()?;

    let result = extractor().extract_file(&output.path().join("nope.png"), output.path(), 0);

    match result {
        Err(ExtractError::Load { path, .. }) => assert!(path.ends_with("nope.png")),
        other => panic!("expected load error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_explicit_rows_change_cells_not_order() -> anyhow::Result<()> {
    let sheet = grid_sheet(2, 4, false);
    let img = image::DynamicImage::ImageRgb8(sheet.image.clone());
    let config = ExtractionConfig::new().with_rows(RowDivisor::Explicit(1));
    let extractor = PieceExtractor::new(config)?;

    let records = extractor.detect_records(&img)?;

    assert_eq!(records.iter().map(|r| r.bbox).collect::<Vec<_>>(), sheet.pieces);
    assert_eq!(records[4].cell.row, 1);
    assert_eq!(records[4].cell.col, 0);

    let ceil = PieceExtractor::new(ExtractionConfig::new().with_rows(RowDivisor::Ceil))?;
    let records = ceil.detect_records(&img)?;
    assert_eq!(records[7].cell.row, 2);

    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = PieceExtractor::new(ExtractionConfig::new().with_size_window(250, 200));
    assert!(matches!(result, Err(ExtractError::InvalidConfig(_))));
}

#[test]
fn test_debug_output_saves_each_step() -> anyhow::Result<()> {
    let input = tempfile::TempDir::new()?;
    let output = tempfile::TempDir::new()?;
    let debug = tempfile::TempDir::new()?;
    let sheet = grid_sheet(2, 4, false);
    let path = save_sheet(input.path(), "sheet.png", &sheet.image);

    let extractor = extractor().with_debug(debug.path().join("steps"))?;
    extractor.extract_file(&path, output.path(), 0)?;

    let steps = debug.path().join("steps");
    assert_eq!(
        file_names(&steps),
        vec![
            "00_input",
            "01_grayscale_conversion",
            "02_inverse_threshold",
            "03_contour_detection",
            "04_size_filter",
            "05_grid_mapping",
            "06_reading_order"
        ]
    );
    assert_eq!(file_names(&steps.join("06_reading_order")).len(), 8);

    Ok(())
}
