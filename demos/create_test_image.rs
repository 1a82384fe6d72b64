use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

fn main() -> anyhow::Result<()> {
    // 2 rows x 4 columns of 220px pieces on a slightly off-white sheet
    let mut img = RgbImage::from_pixel(1300, 700, Rgb([248, 247, 245]));

    for row in 0..2u32 {
        for col in 0..4u32 {
            let i = row * 4 + col;
            let x = 50 + col * 300 + (i * 7) % 13;
            let y = 50 + row * 300 + (i * 5) % 11;
            let color = Rgb([(30 + i * 20) as u8, 60, (160 - i * 15) as u8]);
            draw_filled_rect_mut(&mut img, Rect::at(x as i32, y as i32).of_size(220, 220), color);
        }
    }

    img.save("test_sheet.png")?;
    println!("Created test_sheet.png (1300x700, 8 pieces)");
    Ok(())
}
