use std::path::PathBuf;

use anyhow::{Context, Result};

use scoresheet::export::export_partitions;
use scoresheet::{ScrapeConfig, SeasonRange};

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let country = arg_value(&args, "--country")
        .context("missing --country")?
        .to_lowercase();
    let championship = arg_value(&args, "--championship")
        .context("missing --championship")?
        .to_lowercase();
    let last_year = arg_value(&args, "--last-year")
        .context("missing --last-year")?
        .parse::<u16>()
        .context("--last-year must be a year")?;
    let first_year = match arg_value(&args, "--first-year") {
        Some(raw) => Some(raw.parse::<u16>().context("--first-year must be a year")?),
        None => None,
    };
    let out = arg_value(&args, "--out")
        .map(PathBuf::from)
        .context("missing --out <file.xlsx>")?;

    let mut config = ScrapeConfig::from_env();
    if let Some(dir) = arg_value(&args, "--data-dir") {
        config.data_dir = PathBuf::from(dir);
    }

    let range = SeasonRange::new(last_year, first_year);
    let report = export_partitions(&config.layout(), &country, &championship, range, &out)?;

    println!("Export complete: {}", out.display());
    println!("Matches: {}", report.matches);
    println!("Teams: {}", report.teams);
    println!("Statistics: {}", report.statistics);
    if !report.missing_seasons.is_empty() {
        println!("Missing seasons: {:?}", report.missing_seasons);
    }
    Ok(())
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
