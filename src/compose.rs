//! Drawing one badge.
//!
//! Paint order is fixed and later layers cover earlier ones:
//! template, organization, name, birth date, passport number, supplier
//! panel, whatsapp, local contact, and the photo last.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

use crate::assets::PhotoLibrary;
use crate::config::{Align, CardLayout, PanelStyle, TextSlot};
use crate::error::Result;
use crate::record::Record;
use crate::shaping::shape;
use crate::text::GlyphRenderer;

pub struct CardComposer<R> {
    template: RgbaImage,
    renderer: R,
    layout: CardLayout,
}

impl<R: GlyphRenderer> CardComposer<R> {
    pub fn new(template: RgbaImage, renderer: R, layout: CardLayout) -> Self {
        CardComposer {
            template,
            renderer,
            layout,
        }
    }

    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// Look the photo up, then compose. Fails with `AssetMissing` if there is
    /// no photo for the passport number, `RenderFailure` if it won't decode.
    pub fn compose_record(&self, record: &Record, photos: &PhotoLibrary) -> Result<RgbaImage> {
        let photo = photos.load(&record.passport_number)?;
        Ok(self.compose(record, &photo))
    }

    pub fn compose(&self, record: &Record, photo: &DynamicImage) -> RgbaImage {
        let layout = &self.layout;
        let mut card = self.template.clone();

        if let Some(organization) = record.organization() {
            self.text(&mut card, &layout.organization, organization);
        }
        self.text(&mut card, &layout.name, &record.name);
        self.text(&mut card, &layout.birth_date, &record.birth_date);
        self.text(&mut card, &layout.identifier, &record.passport_number);

        if let Some(supplier) = record.supplier() {
            self.supplier_panel(&mut card, &layout.panel, supplier);
        }
        if let Some(whatsapp) = record.whatsapp() {
            self.text(&mut card, &layout.whatsapp, whatsapp);
        }
        if let Some(local_contact) = record.local_contact() {
            self.text(&mut card, &layout.local_contact, local_contact);
        }

        let slot = &layout.photo;
        let photo = imageops::resize(&photo.to_rgba8(), slot.width, slot.height, FilterType::CatmullRom);
        imageops::replace(&mut card, &photo, slot.x as i64, slot.y as i64);
        card
    }

    fn text(&self, card: &mut RgbaImage, slot: &TextSlot, value: &str) {
        let x = slot.x.unwrap_or(card.width() as i32 / 2);
        let size = self.layout.fonts.size(slot.font);
        self.renderer.draw_aligned(
            card,
            size,
            (x, slot.y),
            slot.align,
            &shape(value),
            self.layout.text_color.rgba(),
        );
    }

    fn supplier_panel(&self, card: &mut RgbaImage, panel: &PanelStyle, supplier: &str) {
        rounded_rectangle(card, panel, panel.outline.rgba(), panel.fill.rgba());

        let size = self.layout.fonts.size(panel.font);
        let top = panel.text_top(size);
        let color = self.layout.text_color.rgba();
        for (inset, value) in [(panel.label_inset, panel.label.as_str()), (panel.value_inset, supplier)] {
            self.renderer
                .draw_aligned(card, size, (panel.right - inset, top), Align::Right, &shape(value), color);
        }
    }
}

/// A one pixel `outline` around a `fill`ed rounded rectangle. Both corners of
/// the panel box are inside.
fn rounded_rectangle(card: &mut RgbaImage, panel: &PanelStyle, outline: Rgba<u8>, fill: Rgba<u8>) {
    let (left, top, right, bottom) = (panel.left, panel.top, panel.right, panel.bottom);
    let radius = (panel.radius as i32).min((right - left + 1) / 2).min((bottom - top + 1) / 2);
    fill_rounded(card, (left, top, right, bottom), radius, outline);
    if right - left >= 2 && bottom - top >= 2 {
        fill_rounded(card, (left + 1, top + 1, right - 1, bottom - 1), (radius - 1).max(0), fill);
    }
}

fn fill_rounded(card: &mut RgbaImage, (left, top, right, bottom): (i32, i32, i32, i32), radius: i32, color: Rgba<u8>) {
    let (width, height) = (card.width() as i32, card.height() as i32);
    for y in top.max(0)..=bottom.min(height - 1) {
        for x in left.max(0)..=right.min(width - 1) {
            if inside_rounded(x, y, (left, top, right, bottom), radius) {
                card.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

fn inside_rounded(x: i32, y: i32, (left, top, right, bottom): (i32, i32, i32, i32), radius: i32) -> bool {
    if radius <= 0 {
        return true;
    }
    let cx = if x < left + radius {
        left + radius
    } else if x > right - radius {
        right - radius
    } else {
        return true;
    };
    let cy = if y < top + radius {
        top + radius
    } else if y > bottom - radius {
        bottom - radius
    } else {
        return true;
    };
    let (dx, dy) = (x - cx, y - cy);
    dx * dx + dy * dy <= radius * radius
}
