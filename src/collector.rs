use std::collections::HashSet;

use crate::config::ScrapeConfig;
use crate::driver::PageDriver;
use crate::error::{Result, ScrapeError};
use crate::session::RunSession;
use crate::store::PartitionKey;

pub const LOAD_MORE_SELECTOR: &str = "a.event__more.event__more--static";
pub const FIXTURE_SELECTOR: &str = "div.event__match.event__match--static.event__match--oneLine";
pub const FIXTURE_ID_PREFIX: &str = "g_1_";

// Clicks in a row that did not grow the listing before we give up on it.
const MAX_STALLED_CLICKS: usize = 4;

/// The two ways a season shows up in results URLs: the plain year, then the
/// split-calendar span.
pub fn season_names(year: u16) -> [String; 2] {
    [
        year.to_string(),
        format!("{year}-{}", year.saturating_add(1)),
    ]
}

/// Discovers the match ids of one season, retrying once with the span
/// naming. Found ids are appended to the run's discovery log under the
/// requested year. Nothing found under either naming is `SeasonNotFound`.
pub fn collect_ids(
    driver: &mut dyn PageDriver,
    session: &RunSession,
    config: &ScrapeConfig,
    country: &str,
    championship: &str,
    year: u16,
) -> Result<Vec<String>> {
    for season in season_names(year) {
        let ids = match collect_ids_for_season(driver, config, country, championship, &season) {
            Ok(ids) => ids,
            Err(err) => {
                log::warn!("listing {country} {championship} {season} failed: {err}");
                Vec::new()
            }
        };
        if ids.is_empty() {
            log::debug!("no fixtures under {country} {championship} {season}");
            continue;
        }

        let key = PartitionKey::new(country, championship, year);
        if let Err(err) = session.log_discovery(&key, &ids) {
            log::warn!("could not write ids log: {err}");
        }
        log::info!("matches id collected: {}", ids.len());
        return Ok(ids);
    }

    Err(ScrapeError::SeasonNotFound {
        country: country.to_string(),
        championship: championship.to_string(),
        year,
    })
}

/// One pass over the results listing for an explicit season name.
pub fn collect_ids_for_season(
    driver: &mut dyn PageDriver,
    config: &ScrapeConfig,
    country: &str,
    championship: &str,
    season: &str,
) -> Result<Vec<String>> {
    driver.navigate(&config.results_url(country, championship, season))?;
    load_all_results(driver, config);

    let fixtures = driver.find_all(FIXTURE_SELECTOR)?;
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for fixture in &fixtures {
        let Some(raw) = driver.attribute(fixture, "id") else {
            continue;
        };
        let id = strip_fixture_prefix(raw.trim());
        if !id.is_empty() && seen.insert(id.to_string()) {
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}

pub fn strip_fixture_prefix(raw: &str) -> &str {
    raw.strip_prefix(FIXTURE_ID_PREFIX).unwrap_or(raw)
}

/// Keeps pressing "load more" until it is gone or stops doing anything.
/// Failing to find or click the control is the normal end of the listing.
fn load_all_results(driver: &mut dyn PageDriver, config: &ScrapeConfig) {
    let mut clicks = 0usize;
    let mut stalled = 0usize;
    let mut shown = fixture_count(driver);

    loop {
        driver.wait(config.settle_wait);
        if let Err(err) = driver.scroll_to_bottom() {
            log::debug!("scroll failed: {err}");
            break;
        }
        driver.wait(config.settle_wait);

        let button = match driver.find(LOAD_MORE_SELECTOR) {
            Ok(Some(button)) => button,
            Ok(None) => break,
            Err(err) => {
                log::debug!("load more lookup failed: {err}");
                break;
            }
        };
        if clicks >= config.max_load_more {
            log::warn!("stopped paging after {clicks} load-more clicks");
            break;
        }
        if let Err(err) = driver.click(&button) {
            log::debug!("load more click failed: {err}");
            break;
        }
        clicks += 1;

        let now = fixture_count(driver);
        if now > shown {
            stalled = 0;
            shown = now;
        } else {
            stalled += 1;
            if stalled >= MAX_STALLED_CLICKS {
                log::warn!("listing stopped growing at {shown} fixtures");
                break;
            }
        }
    }
}

fn fixture_count(driver: &mut dyn PageDriver) -> usize {
    driver
        .find_all(FIXTURE_SELECTOR)
        .map(|fixtures| fixtures.len())
        .unwrap_or(0)
}
