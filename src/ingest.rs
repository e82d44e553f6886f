use std::time::{Duration, Instant};

use chrono::Local;

use crate::collector::collect_ids;
use crate::config::{ScrapeConfig, SeasonRange};
use crate::driver::PageDriver;
use crate::error::{Result, ScrapeError};
use crate::extractor::extract;
use crate::images::{self, Downloader, ImageSyncReport};
use crate::progress::Progress;
use crate::session::RunSession;
use crate::store::{PartitionKey, PartitionStore};

#[derive(Debug, Default)]
pub struct SeasonSummary {
    pub year: u16,
    pub not_found: bool,
    pub ids_found: usize,
    pub matches_inserted: usize,
    pub match_failures: Vec<String>,
    pub images: Option<ImageSyncReport>,
    /// Set when the season stopped early on a storage or log error.
    pub error: Option<String>,
    pub duration: Duration,
}

#[derive(Debug)]
pub struct IngestSummary {
    pub country: String,
    pub championship: String,
    pub range: SeasonRange,
    pub seasons: Vec<SeasonSummary>,
}

impl IngestSummary {
    pub fn seasons_total(&self) -> usize {
        self.seasons.len()
    }

    pub fn seasons_succeeded(&self) -> usize {
        self.seasons
            .iter()
            .filter(|s| !s.not_found && s.error.is_none())
            .count()
    }

    pub fn matches_inserted(&self) -> usize {
        self.seasons.iter().map(|s| s.matches_inserted).sum()
    }

    pub fn match_failures(&self) -> usize {
        self.seasons.iter().map(|s| s.match_failures.len()).sum()
    }
}

/// Collects every season of `range` in ascending order. A season that is
/// not found, or fails part way, never stops the seasons after it.
pub fn collect(
    session: &mut RunSession,
    config: &ScrapeConfig,
    driver: &mut dyn PageDriver,
    downloader: &mut dyn Downloader,
    country: &str,
    championship: &str,
    range: SeasonRange,
) -> IngestSummary {
    let country = country.trim().to_lowercase();
    let championship = championship.trim().to_lowercase();
    let store = PartitionStore::new(session.layout().clone());

    let mut seasons = Vec::new();
    for year in range.years() {
        let started = Instant::now();
        log::info!(
            "{} {} {} ({})",
            country.to_uppercase(),
            championship.to_uppercase(),
            year,
            Local::now().format("%m/%d/%Y %H:%M:%S")
        );

        let mut summary = SeasonSummary {
            year,
            ..SeasonSummary::default()
        };
        if let Err(err) = collect_season(
            session,
            config,
            &store,
            driver,
            downloader,
            &country,
            &championship,
            &mut summary,
        ) {
            match err {
                ScrapeError::SeasonNotFound { .. } => {
                    log::error!("{err}");
                    summary.not_found = true;
                }
                other => {
                    log::error!("{} {} {year} aborted: {other}", country, championship);
                    summary.error = Some(other.to_string());
                }
            }
        }

        summary.duration = started.elapsed();
        if !summary.not_found {
            log::info!(
                "{} {} {} finished in {:?}",
                country.to_uppercase(),
                championship.to_uppercase(),
                year,
                summary.duration
            );
        }
        seasons.push(summary);
    }

    IngestSummary {
        country,
        championship,
        range,
        seasons,
    }
}

#[allow(clippy::too_many_arguments)]
fn collect_season(
    session: &mut RunSession,
    config: &ScrapeConfig,
    store: &PartitionStore,
    driver: &mut dyn PageDriver,
    downloader: &mut dyn Downloader,
    country: &str,
    championship: &str,
    summary: &mut SeasonSummary,
) -> Result<()> {
    let year = summary.year;
    let ids = collect_ids(driver, session, config, country, championship, year)?;
    summary.ids_found = ids.len();

    let key = PartitionKey::new(country, championship, year);
    let mut partition = store.open_partition(session, &key)?;

    let mut progress = Progress::new(ids.len());
    for match_id in &ids {
        let inserted = extract(driver, config, match_id).and_then(|record| partition.insert(record));
        match inserted {
            Ok(()) => summary.matches_inserted += 1,
            Err(err) => {
                log::warn!("error while collecting match {match_id}: {err}");
                if let Err(log_err) = session.log_match_failure(&key, match_id) {
                    log::warn!("could not write error log: {log_err}");
                }
                summary.match_failures.push(match_id.clone());
            }
        }
        progress.tick();
    }
    progress.finish();

    match images::sync(
        store,
        downloader,
        country,
        championship,
        SeasonRange::single(year),
    ) {
        Ok(report) => summary.images = Some(report),
        Err(err) => log::warn!("team images were not downloaded: {err}"),
    }
    Ok(())
}
