use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use piece_thumbs::BoundingBox;
use std::path::{Path, PathBuf};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const PIECE_SIZE: u32 = 220;
pub const PITCH: u32 = 300;
pub const MARGIN: u32 = 50;

/// A synthetic scan and the bounding boxes of its pieces in reading order
pub struct Sheet {
    pub image: RgbImage,
    pub pieces: Vec<BoundingBox>,
}

/// Dark, distinct color for the `i`-th piece of a sheet
pub fn piece_color(i: u32) -> Rgb<u8> {
    Rgb([(10 + i * 9) as u8, 40, (120 - i * 3) as u8])
}

pub fn fill(img: &mut RgbImage, bbox: BoundingBox, color: Rgb<u8>) {
    draw_filled_rect_mut(
        img,
        Rect::at(bbox.x as i32, bbox.y as i32).of_size(bbox.width, bbox.height),
        color,
    );
}

/// A white sheet with `rows` x `cols` dark squares of `PIECE_SIZE` pixels.
/// `jitter` shifts pieces by a few pixels so the grid is not perfectly
/// aligned, the way hand-placed pieces are.
pub fn grid_sheet(rows: u32, cols: u32, jitter: bool) -> Sheet {
    let width = 2 * MARGIN + cols * PITCH;
    let height = 2 * MARGIN + rows * PITCH;
    let mut image = RgbImage::from_pixel(width, height, WHITE);
    let mut pieces = Vec::new();

    for r in 0..rows {
        for c in 0..cols {
            let i = r * cols + c;
            let (dx, dy) = if jitter { ((i * 7) % 13, (i * 5) % 11) } else { (0, 0) };
            let bbox = BoundingBox {
                x: MARGIN + c * PITCH + dx,
                y: MARGIN + r * PITCH + dy,
                width: PIECE_SIZE,
                height: PIECE_SIZE,
            };
            fill(&mut image, bbox, piece_color(i));
            pieces.push(bbox);
        }
    }

    Sheet { image, pieces }
}

/// A white sheet with a single piece
pub fn single_piece_sheet() -> Sheet {
    let mut image = RgbImage::from_pixel(400, 400, WHITE);
    let bbox = BoundingBox {
        x: 90,
        y: 90,
        width: PIECE_SIZE,
        height: PIECE_SIZE,
    };
    fill(&mut image, bbox, piece_color(0));
    Sheet {
        image,
        pieces: vec![bbox],
    }
}

pub fn save_sheet(dir: &Path, name: &str, image: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    image
        .save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test sheet");
    path
}

/// Names of the files in `dir`, sorted
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read output directory")
        .map(|e| e.expect("Bad directory entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Assert that a written piece equals the given region of the sheet
pub fn assert_piece_matches(path: &Path, sheet: &RgbImage, bbox: BoundingBox) {
    let written = image::open(path)
        .unwrap_or_else(|e| panic!("Failed to open {}: {e}", path.display()))
        .to_rgb8();
    let expected = image::imageops::crop_imm(sheet, bbox.x, bbox.y, bbox.width, bbox.height).to_image();
    assert_eq!(written.dimensions(), expected.dimensions(), "size of {}", path.display());
    assert!(written == expected, "pixels of {} differ from the sheet", path.display());
}
