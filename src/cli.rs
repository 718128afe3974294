//! Command line options shared by the binaries.

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgMatches};

use crate::config::{Color, Config, SheetConfig};
use crate::error::Result;
use crate::pipeline::BadgeRun;
use crate::record::RunDefaults;

pub const DEFAULT_TEMPLATE: &str = "badge_template.jpg";
pub const DEFAULT_FONT: &str = "TheSans Bold.ttf";

pub fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .value_parser(value_parser!(PathBuf))
        .help("TOML file overriding [sheet], [card] and [headers] settings.")
}

/// `--config` if given, defaults otherwise.
pub fn load_config(matches: &ArgMatches) -> Result<Config> {
    Config::load_or_default(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
}

fn path_arg(id: &'static str) -> Arg {
    Arg::new(id).long(id).value_parser(value_parser!(PathBuf))
}

fn path(matches: &ArgMatches, id: &str) -> PathBuf {
    matches.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

fn text(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

pub fn badge_args() -> Vec<Arg> {
    vec![
        path_arg("spreadsheet")
            .short('i')
            .required(true)
            .help("Spreadsheet with one person per row (xlsx, xls, ods or csv)."),
        path_arg("photos")
            .short('p')
            .required(true)
            .help("Directory of photos named <passport number>.jpg|jpeg|png."),
        path_arg("template")
            .short('t')
            .default_value(DEFAULT_TEMPLATE)
            .help("Badge background image."),
        path_arg("font")
            .short('f')
            .default_value(DEFAULT_FONT)
            .help("TrueType font used for every line of text."),
        path_arg("output")
            .short('o')
            .required(true)
            .help("Destination directory for badges."),
        Arg::new("organization")
            .long("organization")
            .help("Organization name, for rows that don't have one."),
        Arg::new("supplier")
            .long("supplier")
            .help("Supplier name, for rows that don't have one. No supplier, no panel."),
        Arg::new("whatsapp")
            .long("whatsapp")
            .help("Whatsapp number, for rows that don't have one."),
        Arg::new("local-contact")
            .long("local-contact")
            .help("Local contact number, for rows that don't have one."),
    ]
}

pub fn badge_run(matches: &ArgMatches, config: &Config) -> BadgeRun {
    BadgeRun {
        spreadsheet: path(matches, "spreadsheet"),
        photos: path(matches, "photos"),
        template: path(matches, "template"),
        font: path(matches, "font"),
        output: path(matches, "output"),
        defaults: RunDefaults {
            organization_name: text(matches, "organization"),
            supplier_name: text(matches, "supplier"),
            whatsapp_number: text(matches, "whatsapp"),
            local_contact_number: text(matches, "local-contact"),
        },
        layout: config.card.clone(),
        headers: config.headers.clone(),
    }
}

const SHEET_NUMBERS: [(&str, &str); 8] = [
    ("sheet-width", "Sheet width, in pixels."),
    ("sheet-height", "Sheet height, in pixels."),
    ("cell-width", "Width each badge is stretched to."),
    ("cell-height", "Height each badge is stretched to."),
    ("margin", "Margin before the first row and column."),
    ("spacing", "Gap between badges."),
    ("columns", "Badges per row."),
    ("capacity", "Badges per sheet."),
];

pub fn sheet_args() -> Vec<Arg> {
    SHEET_NUMBERS
        .iter()
        .map(|&(id, help)| Arg::new(id).long(id).value_parser(value_parser!(u32)).help(help))
        .chain(Some(
            Arg::new("background")
                .long("background")
                .value_parser(|value: &str| Color::parse(value).ok_or_else(|| "expected #rrggbb".to_string()))
                .help("Sheet background colour, #rrggbb."),
        ))
        .collect()
}

/// The `[sheet]` table of the configuration, then command line overrides.
pub fn sheet_config(matches: &ArgMatches, config: &Config) -> SheetConfig {
    let mut sheet = config.sheet.clone();
    {
        let fields: [(&str, &mut u32); 8] = [
            ("sheet-width", &mut sheet.sheet_width),
            ("sheet-height", &mut sheet.sheet_height),
            ("cell-width", &mut sheet.cell_width),
            ("cell-height", &mut sheet.cell_height),
            ("margin", &mut sheet.margin),
            ("spacing", &mut sheet.spacing),
            ("columns", &mut sheet.columns),
            ("capacity", &mut sheet.capacity),
        ];
        for (id, field) in fields {
            if let Some(value) = matches.get_one::<u32>(id) {
                *field = *value;
            }
        }
    }
    if let Some(background) = matches.get_one::<Color>("background") {
        sheet.background = *background;
    }
    sheet
}
