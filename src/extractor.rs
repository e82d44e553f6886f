use std::collections::BTreeMap;

use crate::config::ScrapeConfig;
use crate::driver::{PageDriver, non_empty_attributes, non_empty_texts};
use crate::error::{Result, ScrapeError};
use crate::record::{MatchRecord, StatPair, TeamSide, Teams, normalize_stat_key};

pub const DATE_SELECTOR: &str = "#utime";
pub const PARTICIPANT_SELECTOR: &str = "a.participant-imglink";
pub const SCORE_SELECTOR: &str = "span.scoreboard";
pub const PARTICIPANT_IMAGE_SELECTOR: &str = "a.participant-imglink img";
pub const STAT_TITLE_SELECTOR: &str = "div.statText--titleValue";
pub const STAT_HOME_SELECTOR: &str = "div.statText--homeValue";
pub const STAT_AWAY_SELECTOR: &str = "div.statText--awayValue";

/// Reads one match page into a record. Missing date, team names or scores
/// fail the whole record; missing statistics only shrink `statistics`.
pub fn extract(
    driver: &mut dyn PageDriver,
    config: &ScrapeConfig,
    match_id: &str,
) -> Result<MatchRecord> {
    driver
        .navigate(&config.match_url(match_id))
        .map_err(|err| ScrapeError::extraction(match_id, format!("page not loaded: {err}")))?;
    driver.wait(config.match_wait);

    let date = driver
        .find(DATE_SELECTOR)?
        .map(|el| driver.text(&el))
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ScrapeError::extraction(match_id, "missing match date"))?;

    let names = non_empty_texts(driver, PARTICIPANT_SELECTOR)?;
    let [home_name, away_name] = first_two(names)
        .ok_or_else(|| ScrapeError::extraction(match_id, "missing team names"))?;

    let scores = non_empty_texts(driver, SCORE_SELECTOR)?;
    let [home_score, away_score] =
        first_two(scores).ok_or_else(|| ScrapeError::extraction(match_id, "missing scores"))?;

    let mut images = non_empty_attributes(driver, PARTICIPANT_IMAGE_SELECTOR, "src")?.into_iter();
    let home_image = images.next().unwrap_or_default();
    let away_image = images.next().unwrap_or_default();
    if away_image.is_empty() {
        log::debug!("match {match_id}: team logos incomplete");
    }

    let titles = non_empty_texts(driver, STAT_TITLE_SELECTOR)?;
    let home_values = non_empty_texts(driver, STAT_HOME_SELECTOR)?;
    let away_values = non_empty_texts(driver, STAT_AWAY_SELECTOR)?;
    if titles.len() != home_values.len() || titles.len() != away_values.len() {
        log::warn!(
            "match {match_id}: statistic panels misaligned ({} titles, {} home, {} away)",
            titles.len(),
            home_values.len(),
            away_values.len()
        );
    }
    let statistics = pair_statistics(&titles, home_values, away_values);

    Ok(MatchRecord {
        date,
        teams: Teams {
            home: TeamSide {
                name: home_name,
                score: home_score,
                image: home_image,
            },
            away: TeamSide {
                name: away_name,
                score: away_score,
                image: away_image,
            },
        },
        statistics,
    })
}

/// Zips titles with home/away values by position, stopping at the shortest
/// list. Titles become normalized keys.
pub fn pair_statistics(
    titles: &[String],
    home_values: Vec<String>,
    away_values: Vec<String>,
) -> BTreeMap<String, StatPair> {
    titles
        .iter()
        .zip(home_values)
        .zip(away_values)
        .map(|((title, home), away)| (normalize_stat_key(title), StatPair { home, away }))
        .collect()
}

fn first_two(values: Vec<String>) -> Option<[String; 2]> {
    let mut iter = values.into_iter();
    let first = iter.next()?;
    let second = iter.next()?;
    Some([first, second])
}
