//! Test fixtures: images encoded in-process.

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Solid PNG of the given size.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 90, 255]));
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)
        .expect("encode png fixture");
    cursor.into_inner()
}
