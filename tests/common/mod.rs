//! Common fixtures for megapix integration tests.
//!
//! Each test file compiles its own copy of this module, so items may
//! appear unused from the perspective of a single test file even though
//! they're used elsewhere.

#![allow(dead_code)]

use tiny_skia::Pixmap;

/// Fully opaque pixmap with a deterministic per-pixel pattern, so a
/// pixel-exact comparison catches any geometry mistake.
pub fn gradient_pixmap(width: u32, height: u32) -> Pixmap {
    let mut pixmap = Pixmap::new(width, height).unwrap();
    let data = pixmap.data_mut();
    for y in 0..height as usize {
        for x in 0..width as usize {
            let i = (y * width as usize + x) * 4;
            data[i] = (x % 256) as u8;
            data[i + 1] = (y % 256) as u8;
            data[i + 2] = ((x + y) % 256) as u8;
            data[i + 3] = 255;
        }
    }
    pixmap
}

/// Opaque pixmap whose bottom `transparent_rows` rows are fully
/// transparent, mimicking content that does not reach the bottom of its
/// nominal extent.
pub fn short_content_pixmap(width: u32, height: u32, transparent_rows: u32) -> Pixmap {
    let mut pixmap = gradient_pixmap(width, height);
    let data = pixmap.data_mut();
    let first_dead = (height - transparent_rows) as usize * width as usize * 4;
    data[first_dead..].fill(0);
    pixmap
}
