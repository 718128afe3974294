#![allow(dead_code)]

use std::path::Path;

use badgesmith::GlyphRenderer;
use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// Solid blocks instead of glyphs, 10 px per character.
pub struct Blocks;

impl GlyphRenderer for Blocks {
    fn text_width(&self, _size: f32, text: &str) -> f32 {
        10. * text.chars().count() as f32
    }

    fn draw(&self, canvas: &mut RgbaImage, size: f32, x: f32, top: f32, text: &str, color: Rgba<u8>) {
        let width = self.text_width(size, text) as u32;
        for dy in 0..size as u32 {
            for dx in 0..width {
                let (px, py) = (x as u32 + dx, top as u32 + dy);
                if px < canvas.width() && py < canvas.height() {
                    canvas.put_pixel(px, py, color);
                }
            }
        }
    }
}

pub fn solid_png(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    RgbImage::from_pixel(width, height, Rgb(color))
        .save(path)
        .expect("write test image");
}
