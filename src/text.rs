use std::path::Path;

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

use crate::config::Align;
use crate::error::{BadgeError, Result};

/// Something that can measure and paint a line of already shaped text.
///
/// Sizes are em sizes in pixels. `top` is the ascender line.
pub trait GlyphRenderer {
    fn text_width(&self, size: f32, text: &str) -> f32;

    fn draw(&self, canvas: &mut RgbaImage, size: f32, x: f32, top: f32, text: &str, color: Rgba<u8>);

    /// Draw `text` so that `x` is its middle (`Center`) or its end (`Right`).
    fn draw_aligned(
        &self,
        canvas: &mut RgbaImage,
        size: f32,
        (x, top): (i32, i32),
        align: Align,
        text: &str,
        color: Rgba<u8>,
    ) {
        if text.is_empty() {
            return;
        }
        let width = self.text_width(size, text);
        let left = match align {
            Align::Center => x as f32 - width / 2.,
            Align::Right => x as f32 - width,
        };
        self.draw(canvas, size, left.round(), top as f32, text, color);
    }
}

/// A TrueType/OpenType font file.
pub struct Typeface {
    font: Font<'static>,
}

impl Typeface {
    pub fn load(path: &Path) -> Result<Typeface> {
        let bytes = std::fs::read(path).map_err(|err| BadgeError::source_load("font", path, err))?;
        Typeface::from_bytes(bytes).ok_or_else(|| BadgeError::source_load("font", path, "not a TrueType or OpenType font"))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Option<Typeface> {
        Font::try_from_vec(bytes).map(|font| Typeface { font })
    }

    /// rusttype scales by pixel height (ascent to descent), we are given
    /// em sizes.
    fn scale(&self, size: f32) -> Scale {
        let metrics = self.font.v_metrics_unscaled();
        let height = metrics.ascent - metrics.descent;
        let units_per_em = self.font.units_per_em() as f32;
        if height <= 0. || units_per_em <= 0. {
            return Scale::uniform(size);
        }
        Scale::uniform(size * height / units_per_em)
    }
}

impl GlyphRenderer for Typeface {
    fn text_width(&self, size: f32, text: &str) -> f32 {
        self.font
            .layout(text, self.scale(size), point(0., 0.))
            .last()
            .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.)
    }

    fn draw(&self, canvas: &mut RgbaImage, size: f32, x: f32, top: f32, text: &str, color: Rgba<u8>) {
        let scale = self.scale(size);
        let baseline = top + self.font.v_metrics(scale).ascent;
        let (width, height) = canvas.dimensions();
        for glyph in self.font.layout(text, scale, point(x, baseline)) {
            let bounds = match glyph.pixel_bounding_box() {
                Some(bounds) => bounds,
                None => continue, // Whitespace.
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bounds.min.x;
                let py = gy as i32 + bounds.min.y;
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height || coverage <= 0. {
                    return;
                }
                blend(canvas.get_pixel_mut(px as u32, py as u32), color, coverage.min(1.));
            });
        }
    }
}

fn blend(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let inv = 1. - coverage;
    for channel in 0..3 {
        dst.0[channel] = (color.0[channel] as f32 * coverage + dst.0[channel] as f32 * inv).round() as u8;
    }
    dst.0[3] = dst.0[3].max((coverage * 255.).round() as u8);
}

/// Paints every line as a solid block, 10 px per character and `size` px
/// high, so that tests can check where text went without a font file.
#[cfg(test)]
pub(crate) struct BlockRenderer;

#[cfg(test)]
impl GlyphRenderer for BlockRenderer {
    fn text_width(&self, _size: f32, text: &str) -> f32 {
        10. * text.chars().count() as f32
    }

    fn draw(&self, canvas: &mut RgbaImage, size: f32, x: f32, top: f32, text: &str, color: Rgba<u8>) {
        let width = self.text_width(size, text) as i64;
        for dy in 0..size as i64 {
            for dx in 0..width {
                let (px, py) = (x as i64 + dx, top as i64 + dy);
                if px >= 0 && py >= 0 && (px as u32) < canvas.width() && (py as u32) < canvas.height() {
                    canvas.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}
