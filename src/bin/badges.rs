extern crate anyhow;
extern crate badgesmith;
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;

use anyhow::Context;
use clap::Command;

use badgesmith::cli;
use badgesmith::pipeline::{self, BadgeRun};

fn parse_cli() -> anyhow::Result<BadgeRun> {
    let matches = Command::new("Badge maker")
        .author("David Teller")
        .about("One badge per spreadsheet row, photo looked up by passport number.")
        .arg(cli::config_arg())
        .args(cli::badge_args())
        .get_matches();
    let config = cli::load_config(&matches)?;
    Ok(cli::badge_run(&matches, &config))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let run = parse_cli()?;
    debug!(target: "badges", "Options: {:?}", run);

    println!("Making badges from {source} into {dest}",
        source = run.spreadsheet.display(),
        dest = run.output.display());

    let summary = pipeline::run_badges(&run)
        .context("Badge generation aborted")?;

    println!("All done: {written} badge(s) created, {skipped} skipped.",
        written = summary.written.len(),
        skipped = summary.skipped);
    Ok(())
}
