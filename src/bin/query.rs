use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use scoresheet::images::HttpDownloader;
use scoresheet::stats_query::StatsQuery;
use scoresheet::{MatchRecord, ScrapeConfig, SeasonRange};

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let level = arg_value(&args, "--log-level").unwrap_or_else(|| "warn".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

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
    let range = SeasonRange::new(last_year, first_year);

    let mut config = ScrapeConfig::from_env();
    if let Some(dir) = arg_value(&args, "--data-dir") {
        config.data_dir = PathBuf::from(dir);
    }
    let query = StatsQuery::new(config.layout());

    if has_flag(&args, "--teams") {
        for team in query.teams(&country, &championship, range) {
            println!("{team}");
        }
        return Ok(());
    }

    let team = arg_value(&args, "--team").context("missing --team")?;
    if let Some(statistic) = arg_value(&args, "--stat") {
        let values = query.statistic_by_team(&country, &championship, &team, &statistic, range);
        println!("{}", values.join(","));
        return Ok(());
    }
    if has_flag(&args, "--image") {
        let mut downloader = HttpDownloader::new(&config)?;
        match query.team_image_url(&mut downloader, &country, &championship, &team, range)? {
            Some(url) => println!("{url}"),
            None => println!("no home match found for {team}"),
        }
        return Ok(());
    }

    let matches = if has_flag(&args, "--wins") {
        query.win_matches(&country, &championship, &team, range)
    } else if has_flag(&args, "--losses") {
        query.lose_matches(&country, &championship, &team, range)
    } else if has_flag(&args, "--draws") {
        query.draw_matches(&country, &championship, &team, range)
    } else {
        return Err(anyhow!(
            "pick one of --wins, --losses, --draws, --teams, --stat <key>, --image"
        ));
    };
    print_matches(&matches);
    Ok(())
}

fn print_matches(matches: &[MatchRecord]) {
    for record in matches {
        println!(
            "{}  {} {} - {} {}",
            record.date,
            record.teams.home.name,
            record.teams.home.score,
            record.teams.away.score,
            record.teams.away.name
        );
    }
    println!("{} matches", matches.len());
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
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
