//! Batch drivers.
//!
//! Errors that only concern one badge or one sheet are logged and counted,
//! the batch goes on. Anything else stops the run.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::assets::{self, PhotoLibrary};
use crate::compose::CardComposer;
use crate::config::{CardLayout, HeaderSchema, SheetConfig};
use crate::error::{BadgeError, Result};
use crate::layout;
use crate::record::{Record, RunDefaults};
use crate::schema;
use crate::text::{GlyphRenderer, Typeface};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardSummary {
    pub written: Vec<PathBuf>,
    pub skipped: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetSummary {
    /// Number of badge images found.
    pub cards: usize,
    pub written: Vec<PathBuf>,
    pub failed: usize,
}

/// Everything `run_badges` needs.
#[derive(Clone, Debug)]
pub struct BadgeRun {
    pub spreadsheet: PathBuf,
    pub photos: PathBuf,
    pub template: PathBuf,
    pub font: PathBuf,
    pub output: PathBuf,
    pub defaults: RunDefaults,
    pub layout: CardLayout,
    pub headers: HeaderSchema,
}

/// Load the template, the font and the spreadsheet, then write one badge
/// per usable row. Any of the three failing to load stops the run before
/// the first badge.
pub fn run_badges(run: &BadgeRun) -> Result<CardSummary> {
    run.layout.validate()?;
    let template = assets::load_template(&run.template)?;
    let typeface = Typeface::load(&run.font)?;
    let records = schema::load_records(&run.spreadsheet, &run.headers)?;
    info!("{} row(s) read from {}", records.len(), run.spreadsheet.display());

    let composer = CardComposer::new(template, typeface, run.layout.clone());
    make_cards(records, &run.defaults, &composer, &PhotoLibrary::new(&run.photos), &run.output)
}

pub fn make_cards<R: GlyphRenderer>(
    records: Vec<Result<Record>>,
    defaults: &RunDefaults,
    composer: &CardComposer<R>,
    photos: &PhotoLibrary,
    output: &Path,
) -> Result<CardSummary> {
    assets::ensure_dir(output)?;
    let mut summary = CardSummary::default();
    for record in records {
        let result = record
            .map(|record| record.with_defaults(defaults))
            .and_then(|record| {
                let card = composer.compose_record(&record, photos)?;
                let path = output.join(assets::card_file_name(&record.name));
                save_card(&card, &path, &record.name)?;
                Ok((record, path))
            });
        match result {
            Ok((record, path)) => {
                info!("Badge for {} written to {}", record.name, path.display());
                summary.written.push(path);
            }
            Err(err) if err.is_recoverable() => {
                warn!("Skipping badge: {}", err);
                summary.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(summary)
}

fn save_card(card: &RgbaImage, path: &Path, name: &str) -> Result<()> {
    card.save(path)
        .map_err(|err| BadgeError::render(format!("badge of {}", name), err))
}

/// Lay every badge image of `cards` out on sheets written to `output`.
pub fn make_sheets(cards: &Path, output: &Path, config: &SheetConfig) -> Result<SheetSummary> {
    config.validate()?;
    let sources = assets::list_card_images(cards)?;
    assets::ensure_dir(output)?;
    debug!(target: "sheets", "Sources: {:?}", sources);

    let mut summary = SheetSummary {
        cards: sources.len(),
        ..SheetSummary::default()
    };
    for plan in layout::paginate(sources, config) {
        let path = output.join(assets::sheet_file_name(plan.number));
        let result = layout::render(&plan, config, |source| {
            image::open(source)
                .map(|image| image.to_rgb8())
                .map_err(|err| BadgeError::render(source.display().to_string(), err))
        })
        .and_then(|sheet| {
            sheet
                .save(&path)
                .map_err(|err| BadgeError::render(format!("sheet {}", plan.number), err))
        });
        match result {
            Ok(()) => {
                info!("Sheet {} ({} badges) written to {}", plan.number, plan.placements.len(), path.display());
                summary.written.push(path);
            }
            Err(err) if err.is_recoverable() => {
                warn!("Skipping sheet {}: {}", plan.number, err);
                summary.failed += 1;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(summary)
}
