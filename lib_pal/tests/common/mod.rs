#![allow(dead_code)]

use lib_bitpal::{Color, Image};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const RED: Color = Color::new(255, 0, 0);
pub const GREEN: Color = Color::new(0, 255, 0);
pub const BLUE: Color = Color::new(0, 0, 255);

/// 4x4 image using red, green and blue.
pub fn random_rgb() -> Image {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let colors = [RED, GREEN, BLUE];
    let mut pixels: Vec<Color> = (0..16).map(|_| colors[rng.gen_range(0..3)]).collect();
    // make sure all three show up
    pixels[..3].copy_from_slice(&colors);
    Image::new(4, 4, pixels).unwrap()
}

/// Image with exactly `count` distinct colors, each appearing at least once.
pub fn distinct_colors(width: u32, height: u32, count: u32) -> Image {
    assert!(count as usize <= width as usize * height as usize);
    Image::from_fn(width, height, |x, y| {
        let i = (y * width + x) % count;
        // spread keys so palette order differs from scan order
        Color::from_key(i.wrapping_mul(40_503) & 0x00FF_FFFF)
    })
    .unwrap()
}

/// Random image drawing from a palette of `colors` random colors.
pub fn random_image(seed: u64, width: u32, height: u32, colors: usize) -> Image {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let palette: Vec<Color> = (0..colors)
        .map(|_| Color::new(rng.gen(), rng.gen(), rng.gen()))
        .collect();
    Image::from_fn(width, height, |_, _| palette[rng.gen_range(0..palette.len())]).unwrap()
}

pub fn gradient() -> Image {
    Image::from_fn(16, 16, |x, y| {
        let v = (y * 16 + x) as u8;
        Color::new(v, v, v)
    })
    .unwrap()
}

pub fn solid(width: u32, height: u32, color: Color) -> Image {
    Image::new(width, height, vec![color; width as usize * height as usize]).unwrap()
}
