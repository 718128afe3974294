//! Laying badges out on print sheets.
//!
//! Sources are cut into consecutive groups of `capacity`, one group per
//! sheet, the last group possibly shorter. Inside a sheet, cells are filled
//! row by row, left to right. Each source is stretched to the cell size.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use itertools::Itertools;

use crate::config::SheetConfig;
use crate::error::Result;

/// A source and the top-left corner of its cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement<T> {
    pub x: u32,
    pub y: u32,
    pub source: T,
}

/// Everything that goes on one sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetPlan<T> {
    /// Starts at 1.
    pub number: usize,
    pub placements: Vec<Placement<T>>,
}

/// Group sources into sheets and compute where each one goes.
/// `config` must have been validated.
pub fn paginate<T, I>(sources: I, config: &SheetConfig) -> Vec<SheetPlan<T>>
where
    I: IntoIterator<Item = T>,
{
    let groups = sources.into_iter().chunks(config.capacity as usize);
    let plans = (&groups)
        .into_iter()
        .enumerate()
        .map(|(index, group)| SheetPlan {
            number: index + 1,
            placements: group
                .enumerate()
                .map(|(slot, source)| {
                    let (x, y) = config.slot_origin(slot as u32);
                    Placement { x, y, source }
                })
                .collect(),
        })
        .collect();
    plans
}

/// Paint one sheet. If any source fails to load, the whole sheet fails:
/// leaving a hole would be easy to miss once printed.
pub fn render<T, F>(plan: &SheetPlan<T>, config: &SheetConfig, mut load: F) -> Result<RgbImage>
where
    F: FnMut(&T) -> Result<RgbImage>,
{
    let mut sheet = RgbImage::from_pixel(config.sheet_width, config.sheet_height, config.background.rgb());
    for placement in &plan.placements {
        let source = load(&placement.source)?;
        let cell = imageops::resize(&source, config.cell_width, config.cell_height, FilterType::CatmullRom);
        imageops::replace(&mut sheet, &cell, placement.x as i64, placement.y as i64);
    }
    Ok(sheet)
}

/// In-memory version: images in, sheets out, in order.
pub fn layout(images: &[DynamicImage], config: &SheetConfig) -> Result<Vec<RgbImage>> {
    config.validate()?;
    paginate(images, config)
        .iter()
        .map(|plan| render(plan, config, |image| Ok(image.to_rgb8())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::error::BadgeError;
    use image::Rgb;

    fn small() -> SheetConfig {
        SheetConfig {
            sheet_width: 100,
            sheet_height: 60,
            cell_width: 20,
            cell_height: 25,
            margin: 5,
            spacing: 3,
            columns: 3,
            capacity: 6,
            background: Color::WHITE,
        }
    }

    #[test]
    fn fourteen_cards_make_three_sheets() {
        let plans = paginate(0..14, &SheetConfig::default());
        let sizes = plans.iter().map(|plan| plan.placements.len()).collect_vec();
        assert_eq!(sizes, vec![6, 6, 2]);
        let numbers = plans.iter().map(|plan| plan.number).collect_vec();
        assert_eq!(numbers, vec![1, 2, 3]);
        let order = plans
            .iter()
            .flat_map(|plan| plan.placements.iter().map(|placement| placement.source))
            .collect_vec();
        assert_eq!(order, (0..14).collect_vec());
    }

    #[test]
    fn sheet_count() {
        let config = SheetConfig::default();
        for count in 0..40 {
            let plans = paginate(0..count, &config);
            assert_eq!(plans.len(), (count + 5) / 6);
            if let Some(last) = plans.last() {
                let expected = if count % 6 == 0 { 6 } else { count % 6 };
                assert_eq!(last.placements.len(), expected);
            }
        }
    }

    #[test]
    fn placements_are_row_major() {
        let config = SheetConfig::default();
        let plan = paginate(0..6, &config).remove(0);
        let corners = plan.placements.iter().map(|p| (p.x, p.y)).collect_vec();
        assert_eq!(
            corners,
            vec![(50, 50), (1025, 50), (2000, 50), (50, 1261), (1025, 1261), (2000, 1261)]
        );
        // No two cells overlap.
        for (a, b) in corners.iter().tuple_combinations() {
            let apart_x = a.0 + config.cell_width <= b.0 || b.0 + config.cell_width <= a.0;
            let apart_y = a.1 + config.cell_height <= b.1 || b.1 + config.cell_height <= a.1;
            assert!(apart_x || apart_y, "{:?} {:?}", a, b);
        }
    }

    #[test]
    fn sheets_are_stretched_and_painted() {
        let config = small();
        let red = DynamicImage::ImageRgb8(RgbImage::from_pixel(7, 90, Rgb([255, 0, 0])));
        let blue = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(40, 40, image::Rgba([0, 0, 255, 128])));
        let images = vec![red.clone(), blue, red.clone(), red.clone(), red.clone(), red.clone(), red];
        let sheets = layout(&images, &config).unwrap();
        assert_eq!(sheets.len(), 2);
        let first = &sheets[0];
        assert_eq!(first.dimensions(), (100, 60));
        assert_eq!(*first.get_pixel(5, 5), Rgb([255, 0, 0]));
        assert_eq!(*first.get_pixel(24, 29), Rgb([255, 0, 0]));
        assert_eq!(*first.get_pixel(25, 5), Rgb([255, 255, 255]));
        assert_eq!(*first.get_pixel(4, 4), Rgb([255, 255, 255]));
        // Second cell, alpha dropped.
        assert_eq!(*first.get_pixel(28, 5), Rgb([0, 0, 255]));
        // Second row.
        assert_eq!(*first.get_pixel(5, 33), Rgb([255, 0, 0]));
        assert_eq!(*first.get_pixel(5, 57), Rgb([255, 0, 0]));
        assert_eq!(*first.get_pixel(5, 58), Rgb([255, 255, 255]));

        // One card on the last sheet, the rest is background.
        let last = &sheets[1];
        assert_eq!(*last.get_pixel(5, 5), Rgb([255, 0, 0]));
        assert_eq!(*last.get_pixel(28, 5), Rgb([255, 255, 255]));
    }

    #[test]
    fn background_colour() {
        let config = SheetConfig {
            background: Color([1, 2, 3]),
            ..small()
        };
        let plan = paginate(Vec::<u8>::new(), &config);
        assert!(plan.is_empty());
        let plan = SheetPlan::<u8> {
            number: 1,
            placements: vec![],
        };
        let sheet = render(&plan, &config, |_| unreachable!()).unwrap();
        assert!(sheet.pixels().all(|p| *p == Rgb([1, 2, 3])));
    }

    #[test]
    fn a_broken_source_fails_its_sheet() {
        let config = small();
        let plan = paginate(vec!["ok", "broken", "ok"], &config).remove(0);
        let result = render(&plan, &config, |name| {
            if *name == "broken" {
                Err(BadgeError::render(*name, "truncated file"))
            } else {
                Ok(RgbImage::new(2, 2))
            }
        });
        assert!(matches!(result, Err(BadgeError::RenderFailure { .. })));
    }

    #[test]
    fn invalid_grid_is_refused() {
        let config = SheetConfig {
            capacity: 0,
            ..small()
        };
        assert!(matches!(layout(&[], &config), Err(BadgeError::InvalidConfig(_))));
    }
}
