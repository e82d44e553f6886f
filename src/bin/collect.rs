use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use scoresheet::html_driver::HtmlDriver;
use scoresheet::images::HttpDownloader;
use scoresheet::session::RunSession;
use scoresheet::{ScrapeConfig, SeasonRange, ingest};

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    init_logging(&args);

    let country = arg_value(&args, "--country").context("missing --country")?;
    let championship = arg_value(&args, "--championship").context("missing --championship")?;
    let last_year = arg_value(&args, "--last-year")
        .context("missing --last-year")?
        .parse::<u16>()
        .context("--last-year must be a year")?;
    let first_year = match arg_value(&args, "--first-year") {
        Some(raw) => Some(raw.parse::<u16>().context("--first-year must be a year")?),
        None => None,
    };
    let range = SeasonRange::new(last_year, first_year);
    if range.is_empty() {
        return Err(anyhow!(
            "first year {} is after last year {}",
            range.first(),
            range.last()
        ));
    }

    let mut config = ScrapeConfig::from_env();
    if let Some(dir) = arg_value(&args, "--data-dir") {
        config.data_dir = PathBuf::from(dir);
    }

    let mut session = RunSession::start(config.layout()).context("prepare data directories")?;
    let mut driver = HtmlDriver::http(&config)?;
    let mut downloader = HttpDownloader::new(&config)?;

    let summary = ingest::collect(
        &mut session,
        &config,
        &mut driver,
        &mut downloader,
        &country,
        &championship,
        range,
    );

    println!("Collection complete");
    println!("Data: {}", config.data_dir.display());
    println!("Run: {}", session.stamp());
    println!(
        "Seasons: {}/{}",
        summary.seasons_succeeded(),
        summary.seasons_total()
    );
    println!("Matches inserted: {}", summary.matches_inserted());
    for season in &summary.seasons {
        if season.not_found {
            println!("season {}: not found", season.year);
            continue;
        }
        let images = season
            .images
            .as_ref()
            .map(|r| format!("{}/{}", r.downloaded, r.attempted))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "season {}: ids={} inserted={} failed={} images={} took={:?}",
            season.year,
            season.ids_found,
            season.matches_inserted,
            season.match_failures.len(),
            images,
            season.duration
        );
        if let Some(err) = &season.error {
            println!("  error: {err}");
        }
    }
    if summary.match_failures() > 0 {
        println!("Failed matches logged to {}", session.error_log_path().display());
    }

    Ok(())
}

fn init_logging(args: &[String]) {
    let level = arg_value(args, "--log-level").unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
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
