//! Geometry and schema knobs.
//!
//! Every value here has a default matching the stock badge template
//! (`badge_template.jpg`, 945x1181 px) and A4 landscape sheets at 300 dpi.
//! Any subset can be overridden from a TOML file with `[sheet]`, `[card]`
//! and `[headers]` tables.

use std::path::Path;

use serde::Deserialize;

use crate::error::{BadgeError, Result};

/// An opaque RGB colour, written `#rrggbb` in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    pub fn parse(source: &str) -> Option<Color> {
        let hex = source.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn rgb(self) -> image::Rgb<u8> {
        image::Rgb(self.0)
    }

    pub fn rgba(self) -> image::Rgba<u8> {
        let [r, g, b] = self.0;
        image::Rgba([r, g, b, 255])
    }
}

impl TryFrom<String> for Color {
    type Error = String;
    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Color::parse(&value).ok_or_else(|| format!("invalid colour \"{}\", expected #rrggbb", value))
    }
}

// ------------------------------------------------------------------
// Sheets
// ------------------------------------------------------------------

/// A print sheet and the grid of cells drawn on it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    pub sheet_width: u32,
    pub sheet_height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    /// Uniform margin around the grid, top and left.
    pub margin: u32,
    /// Gap between two neighbouring cells, both directions.
    pub spacing: u32,
    pub columns: u32,
    /// Number of cells per sheet.
    pub capacity: u32,
    pub background: Color,
}

/// A4 landscape, 300 dpi, 3x2 badges.
pub const SHEET_A4_LANDSCAPE: SheetConfig = SheetConfig {
    sheet_width: 3508,
    sheet_height: 2480,
    cell_width: 945,
    cell_height: 1181,
    margin: 50,
    spacing: 30,
    columns: 3,
    capacity: 6,
    background: Color::WHITE,
};

impl Default for SheetConfig {
    fn default() -> Self {
        SHEET_A4_LANDSCAPE
    }
}

impl SheetConfig {
    pub fn rows(&self) -> u32 {
        if self.columns == 0 {
            return 0;
        }
        (self.capacity + self.columns - 1) / self.columns
    }

    /// Top-left corner of cell `index`, filled row-major.
    pub fn slot_origin(&self, index: u32) -> (u32, u32) {
        let row = index / self.columns;
        let col = index % self.columns;
        (
            self.margin + col * (self.cell_width + self.spacing),
            self.margin + row * (self.cell_height + self.spacing),
        )
    }

    /// Size needed by the grid, margin included.
    fn grid_extent(&self) -> (u64, u64) {
        let columns = self.columns.min(self.capacity) as u64;
        let rows = self.rows() as u64;
        let span = |count: u64, cell: u32| {
            if count == 0 {
                0
            } else {
                count * cell as u64 + (count - 1) * self.spacing as u64
            }
        };
        (
            self.margin as u64 + span(columns, self.cell_width),
            self.margin as u64 + span(rows, self.cell_height),
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(BadgeError::InvalidConfig("sheet needs at least one column".to_string()));
        }
        if self.capacity == 0 {
            return Err(BadgeError::InvalidConfig("sheet capacity must be positive".to_string()));
        }
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(BadgeError::InvalidConfig(format!(
                "empty cell size {}x{}",
                self.cell_width, self.cell_height
            )));
        }
        let (need_width, need_height) = self.grid_extent();
        if need_width > self.sheet_width as u64 {
            return Err(BadgeError::InvalidConfig(format!(
                "I need a sheet width of at least {need} pixels, got {got}",
                need = need_width,
                got = self.sheet_width
            )));
        }
        if need_height > self.sheet_height as u64 {
            return Err(BadgeError::InvalidConfig(format!(
                "I need a sheet height of at least {need} pixels, got {got}",
                need = need_height,
                got = self.sheet_height
            )));
        }
        Ok(())
    }
}

// ------------------------------------------------------------------
// Cards
// ------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// `x` is the horizontal middle of the text.
    Center,
    /// `x` is where the text ends.
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontRole {
    Body,
    Title,
    Supplier,
}

/// Point sizes. All three roles use the same font file.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontSizes {
    pub body: f32,
    pub title: f32,
    pub supplier: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        FontSizes {
            body: 50.,
            title: 57.,
            supplier: 57.,
        }
    }
}

impl FontSizes {
    pub fn size(&self, role: FontRole) -> f32 {
        match role {
            FontRole::Body => self.body,
            FontRole::Title => self.title,
            FontRole::Supplier => self.supplier,
        }
    }
}

/// Where a line of text goes. `y` is the top of the line (ascender).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextSlot {
    /// `None` means the horizontal middle of the card.
    pub x: Option<i32>,
    pub y: i32,
    pub align: Align,
    pub font: FontRole,
}

impl TextSlot {
    const fn right(x: i32, y: i32, font: FontRole) -> Self {
        TextSlot {
            x: Some(x),
            y,
            align: Align::Right,
            font,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhotoSlot {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// The keys of a `[card.<slot>]` table. Missing keys keep the value the
/// slot already had.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TextSlotFile {
    x: Option<i32>,
    y: Option<i32>,
    align: Option<Align>,
    font: Option<FontRole>,
}

impl TextSlotFile {
    fn over(self, slot: TextSlot) -> TextSlot {
        TextSlot {
            x: self.x.or(slot.x),
            y: self.y.unwrap_or(slot.y),
            align: self.align.unwrap_or(slot.align),
            font: self.font.unwrap_or(slot.font),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PhotoSlotFile {
    x: Option<i32>,
    y: Option<i32>,
    width: Option<u32>,
    height: Option<u32>,
}

impl PhotoSlotFile {
    fn over(self, slot: PhotoSlot) -> PhotoSlot {
        PhotoSlot {
            x: self.x.unwrap_or(slot.x),
            y: self.y.unwrap_or(slot.y),
            width: self.width.unwrap_or(slot.width),
            height: self.height.unwrap_or(slot.height),
        }
    }
}

/// The highlighted box carrying the supplier, drawn only when there is one.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelStyle {
    /// Bounding box, both corners inclusive.
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub radius: u32,
    pub outline: Color,
    pub fill: Color,
    pub label: String,
    /// Distance between the panel's right edge and the end of the label.
    pub label_inset: i32,
    /// Distance between the panel's right edge and the end of the value.
    pub value_inset: i32,
    /// How far above vertical centre both lines sit.
    pub raise: i32,
    pub font: FontRole,
}

impl Default for PanelStyle {
    fn default() -> Self {
        PanelStyle {
            left: 120,
            top: 700,
            right: 825,
            bottom: 825,
            radius: 30,
            outline: Color([0xff, 0xa2, 0x20]),
            fill: Color([0xfc, 0xd6, 0x72]),
            label: "المتعهد:".to_string(),
            label_inset: 20,
            value_inset: 250,
            raise: 15,
            font: FontRole::Supplier,
        }
    }
}

impl PanelStyle {
    /// Top of the label and value lines for a font of `size` points.
    pub fn text_top(&self, size: f32) -> i32 {
        let free = (self.bottom - self.top) as f32 - size;
        self.top + (free / 2.).floor() as i32 - self.raise
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "CardLayoutFile")]
pub struct CardLayout {
    pub photo: PhotoSlot,
    pub organization: TextSlot,
    pub name: TextSlot,
    pub birth_date: TextSlot,
    pub identifier: TextSlot,
    pub whatsapp: TextSlot,
    pub local_contact: TextSlot,
    pub panel: PanelStyle,
    pub fonts: FontSizes,
    pub text_color: Color,
}

impl Default for CardLayout {
    fn default() -> Self {
        CardLayout {
            photo: PhotoSlot {
                x: 60,
                y: 390,
                width: 260,
                height: 270,
            },
            organization: TextSlot {
                x: None,
                y: 50,
                align: Align::Center,
                font: FontRole::Title,
            },
            name: TextSlot::right(695, 300, FontRole::Body),
            birth_date: TextSlot::right(690, 395, FontRole::Body),
            identifier: TextSlot::right(595, 580, FontRole::Body),
            whatsapp: TextSlot::right(680, 845, FontRole::Supplier),
            local_contact: TextSlot::right(610, 940, FontRole::Supplier),
            panel: PanelStyle::default(),
            fonts: FontSizes::default(),
            text_color: Color::BLACK,
        }
    }
}

impl CardLayout {
    pub fn validate(&self) -> Result<()> {
        if self.photo.width == 0 || self.photo.height == 0 {
            return Err(BadgeError::InvalidConfig("photo size must be positive".to_string()));
        }
        if self.panel.left > self.panel.right || self.panel.top > self.panel.bottom {
            return Err(BadgeError::InvalidConfig("supplier panel box is inverted".to_string()));
        }
        for (role, size) in [
            ("body", self.fonts.body),
            ("title", self.fonts.title),
            ("supplier", self.fonts.supplier),
        ] {
            if !(size > 0.) {
                return Err(BadgeError::InvalidConfig(format!("{} font size must be positive", role)));
            }
        }
        Ok(())
    }
}

/// `[card]` as written in a configuration file: every slot is merged over
/// its own default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CardLayoutFile {
    photo: PhotoSlotFile,
    organization: TextSlotFile,
    name: TextSlotFile,
    birth_date: TextSlotFile,
    identifier: TextSlotFile,
    whatsapp: TextSlotFile,
    local_contact: TextSlotFile,
    panel: PanelStyle,
    fonts: FontSizes,
    text_color: Option<Color>,
}

impl From<CardLayoutFile> for CardLayout {
    fn from(file: CardLayoutFile) -> Self {
        let base = CardLayout::default();
        CardLayout {
            photo: file.photo.over(base.photo),
            organization: file.organization.over(base.organization),
            name: file.name.over(base.name),
            birth_date: file.birth_date.over(base.birth_date),
            identifier: file.identifier.over(base.identifier),
            whatsapp: file.whatsapp.over(base.whatsapp),
            local_contact: file.local_contact.over(base.local_contact),
            panel: file.panel,
            fonts: file.fonts,
            text_color: file.text_color.unwrap_or(base.text_color),
        }
    }
}

// ------------------------------------------------------------------
// Spreadsheet headers
// ------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Exact,
    Contains,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderMatch {
    pub label: String,
    pub mode: MatchMode,
}

impl HeaderMatch {
    pub fn exact(label: &str) -> Self {
        HeaderMatch {
            label: label.to_string(),
            mode: MatchMode::Exact,
        }
    }

    pub fn contains(label: &str) -> Self {
        HeaderMatch {
            label: label.to_string(),
            mode: MatchMode::Contains,
        }
    }

    pub fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        match self.mode {
            MatchMode::Exact => header == self.label,
            MatchMode::Contains => header.contains(self.label.as_str()),
        }
    }
}

/// Which spreadsheet column feeds which record field.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderSchema {
    pub name: HeaderMatch,
    pub birth_date: HeaderMatch,
    pub identifier: HeaderMatch,
    pub organization: Option<HeaderMatch>,
    pub supplier: Option<HeaderMatch>,
    pub whatsapp: Option<HeaderMatch>,
    pub local_contact: Option<HeaderMatch>,
}

impl Default for HeaderSchema {
    fn default() -> Self {
        HeaderSchema {
            name: HeaderMatch::exact("الاسم"),
            birth_date: HeaderMatch::contains("تاريخ الميلاد"),
            identifier: HeaderMatch::contains("رقم الجواز"),
            organization: Some(HeaderMatch::contains("اسم الشركة")),
            supplier: Some(HeaderMatch::contains("المتعهد")),
            whatsapp: Some(HeaderMatch::contains("واتساب")),
            local_contact: Some(HeaderMatch::contains("رقم السعودي")),
        }
    }
}

// ------------------------------------------------------------------
// Configuration file
// ------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sheet: SheetConfig,
    pub card: CardLayout,
    pub headers: HeaderSchema,
}

impl Config {
    pub fn parse(source: &str) -> std::result::Result<Config, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn load(path: &Path) -> Result<Config> {
        let source = std::fs::read_to_string(path)
            .map_err(|err| BadgeError::source_load("configuration", path, err))?;
        Config::parse(&source).map_err(|err| BadgeError::source_load("configuration", path, err))
    }

    /// Defaults when no file was given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Config::load(path),
            None => Ok(Config::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sheet_is_three_by_two() {
        let sheet = SheetConfig::default();
        assert_eq!(sheet.rows(), 2);
        assert_eq!(sheet.slot_origin(0), (50, 50));
        assert_eq!(sheet.slot_origin(2), (50 + 2 * 975, 50));
        assert_eq!(sheet.slot_origin(4), (50 + 975, 50 + 1211));
        sheet.validate().unwrap();
    }

    #[test]
    fn rows_round_up() {
        let sheet = SheetConfig {
            columns: 4,
            capacity: 10,
            ..SheetConfig::default()
        };
        assert_eq!(sheet.rows(), 3);
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let sheet = SheetConfig {
            columns: 4,
            capacity: 8,
            ..SheetConfig::default()
        };
        match sheet.validate() {
            Err(BadgeError::InvalidConfig(msg)) => assert!(msg.contains("width"), "{}", msg),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn zero_columns_is_rejected() {
        let sheet = SheetConfig {
            columns: 0,
            ..SheetConfig::default()
        };
        assert!(sheet.validate().is_err());
        assert_eq!(sheet.rows(), 0);
    }

    #[test]
    fn colours() {
        assert_eq!(Color::parse("#ffa220"), Some(Color([0xff, 0xa2, 0x20])));
        assert_eq!(Color::parse("FCD672"), Some(Color([0xfc, 0xd6, 0x72])));
        assert_eq!(Color::parse("#fff"), None);
        assert_eq!(Color::parse("#gggggg"), None);
    }

    #[test]
    fn panel_text_sits_above_centre() {
        let panel = PanelStyle::default();
        // (125 - 57) / 2 = 34, raised by 15.
        assert_eq!(panel.text_top(57.), 719);
    }

    #[test]
    fn headers() {
        let schema = HeaderSchema::default();
        assert!(schema.name.matches("الاسم"));
        assert!(schema.name.matches(" الاسم "));
        assert!(!schema.name.matches("الاسم الكامل"));
        assert!(schema.identifier.matches("رقم الجواز / Passport"));
    }

    #[test]
    fn partial_config_file() {
        let config = Config::parse(
            r##"
            [sheet]
            columns = 2
            capacity = 4
            background = "#000000"

            [card.panel]
            fill = "#ffffff"

            [card.name]
            x = 700
            y = 310

            [headers]
            name = { label = "Name", mode = "exact" }
            supplier = { label = "Supplier", mode = "contains" }
            "##,
        )
        .unwrap();
        assert_eq!(config.sheet.columns, 2);
        assert_eq!(config.sheet.capacity, 4);
        assert_eq!(config.sheet.cell_width, 945);
        assert_eq!(config.sheet.background, Color::BLACK);
        assert_eq!(config.card.panel.fill, Color::WHITE);
        assert_eq!(config.card.panel.radius, 30);
        assert_eq!(config.card.name, TextSlot::right(700, 310, FontRole::Body));
        assert_eq!(config.card.birth_date, CardLayout::default().birth_date);
        assert_eq!(config.headers.name, HeaderMatch::exact("Name"));
        assert_eq!(config.headers.identifier, HeaderSchema::default().identifier);
    }

    #[test]
    fn slots_keep_their_own_defaults() {
        let config = Config::parse(
            r##"
            [card.whatsapp]
            y = 850

            [card.organization]
            y = 60

            [card.photo]
            x = 70
            "##,
        )
        .unwrap();
        let defaults = CardLayout::default();
        assert_eq!(config.card.whatsapp, TextSlot::right(680, 850, FontRole::Supplier));
        assert_eq!(config.card.organization.x, None);
        assert_eq!(config.card.organization.y, 60);
        assert_eq!(config.card.organization.align, Align::Center);
        assert_eq!(config.card.organization.font, FontRole::Title);
        assert_eq!(
            config.card.photo,
            PhotoSlot {
                x: 70,
                ..defaults.photo
            }
        );
        assert_eq!(config.card.local_contact, defaults.local_contact);
        assert_eq!(config.card.text_color, Color::BLACK);
    }

    #[test]
    fn slot_fields_can_all_change() {
        let config = Config::parse(
            r##"
            [card]
            text_color = "#102030"

            [card.identifier]
            x = 500
            align = "center"
            font = "title"
            "##,
        )
        .unwrap();
        let identifier = config.card.identifier;
        assert_eq!(identifier.x, Some(500));
        assert_eq!(identifier.y, 580);
        assert_eq!(identifier.align, Align::Center);
        assert_eq!(identifier.font, FontRole::Title);
        assert_eq!(config.card.text_color, Color([0x10, 0x20, 0x30]));
    }

    #[test]
    fn unknown_slot_key() {
        assert!(Config::parse("[card.name]
size = 3
").is_err());
        assert!(Config::parse("[card.photo]
w = 3
").is_err());
    }

    #[test]
    fn bad_colour_in_file() {
        assert!(Config::parse("[sheet]\nbackground = \"white\"\n").is_err());
    }
}
