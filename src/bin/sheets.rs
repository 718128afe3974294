extern crate anyhow;
extern crate badgesmith;
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;

use std::path::PathBuf;

use anyhow::Context;
use clap::{value_parser, Arg, Command};

use badgesmith::{cli, pipeline, SheetConfig};

struct Options {
    /// Directory of badges.
    source: PathBuf,
    /// Destination directory.
    dest: PathBuf,
    sheet: SheetConfig,
}

fn parse_cli() -> anyhow::Result<Options> {
    let matches = Command::new("Sheet maker")
        .author("David Teller")
        .about("Lays badges out on printable sheets, in file name order.")
        .arg(Arg::new("input")
            .help("Directory of badge images (png, jpg, jpeg).")
            .short('i')
            .long("in")
            .required(true)
            .value_parser(value_parser!(PathBuf))
        )
        .arg(Arg::new("output")
            .help("Destination directory for sheets.")
            .short('o')
            .long("out")
            .required(true)
            .value_parser(value_parser!(PathBuf))
        )
        .arg(cli::config_arg())
        .args(cli::sheet_args())
        .get_matches();

    let config = cli::load_config(&matches)?;
    Ok(Options {
        source: matches.get_one::<PathBuf>("input").cloned().unwrap_or_default(),
        dest: matches.get_one::<PathBuf>("output").cloned().unwrap_or_default(),
        sheet: cli::sheet_config(&matches, &config),
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = parse_cli()?;
    debug!(target: "sheets", "Sheet: {:?}", options.sheet);

    println!("Laying out badges from {source} on {width}x{height} sheets, {capacity} per sheet",
        source = options.source.display(),
        width = options.sheet.sheet_width,
        height = options.sheet.sheet_height,
        capacity = options.sheet.capacity);

    let summary = pipeline::make_sheets(&options.source, &options.dest, &options.sheet)
        .context("Sheet layout aborted")?;

    println!("All done: {written} sheet(s) from {cards} badge(s), {failed} failed.",
        written = summary.written.len(),
        cards = summary.cards,
        failed = summary.failed);
    Ok(())
}
