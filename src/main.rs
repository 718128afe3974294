extern crate anyhow;
extern crate badgesmith;
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;

use std::path::PathBuf;

use anyhow::Context;
use clap::{value_parser, Arg, Command};

use badgesmith::cli;
use badgesmith::pipeline::{self, BadgeRun};
use badgesmith::SheetConfig;

struct Options {
    run: BadgeRun,
    sheet: SheetConfig,
    /// Destination directory for sheets.
    sheets: PathBuf,
}

fn parse_cli() -> anyhow::Result<Options> {
    let matches = Command::new("Badge rebuilder")
        .author("David Teller")
        .about("Makes every badge, then lays all the badges of the output directory out on sheets.")
        .arg(cli::config_arg())
        .args(cli::badge_args())
        .arg(Arg::new("sheets")
            .help("Destination directory for sheets.")
            .short('s')
            .long("sheets")
            .required(true)
            .value_parser(value_parser!(PathBuf))
        )
        .args(cli::sheet_args())
        .get_matches();

    let config = cli::load_config(&matches)?;
    Ok(Options {
        run: cli::badge_run(&matches, &config),
        sheet: cli::sheet_config(&matches, &config),
        sheets: matches.get_one::<PathBuf>("sheets").cloned().unwrap_or_default(),
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let Options { run, sheet, sheets } = parse_cli()?;
    debug!(target: "badgesmith", "Options: {:?}, sheet {:?}", run, sheet);

    // Fail on a bad grid before spending time on badges.
    sheet.validate()?;

    println!("Making badges from {source}", source = run.spreadsheet.display());
    let cards = pipeline::run_badges(&run)
        .context("Badge generation aborted")?;
    println!("{written} badge(s) created, {skipped} skipped.",
        written = cards.written.len(),
        skipped = cards.skipped);

    println!("Laying out {dir} on sheets", dir = run.output.display());
    let pages = pipeline::make_sheets(&run.output, &sheets, &sheet)
        .context("Sheet layout aborted")?;
    println!("All done: {written} sheet(s), {failed} failed.",
        written = pages.written.len(),
        failed = pages.failed);
    Ok(())
}
