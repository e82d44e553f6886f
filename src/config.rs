use std::fmt;
use std::fs;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;

const DEFAULT_DATA_DIR: &str = "./data/";
const DEFAULT_BASE_URL: &str = "https://www.flashscore.com";
const DEFAULT_SPORT: &str = "football";
const DEFAULT_SETTLE_SECS: u64 = 5;
const DEFAULT_MATCH_WAIT_SECS: u64 = 2;
const DEFAULT_MAX_LOAD_MORE: usize = 200;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) scoresheet/0.1";

/// Inclusive range of season years. A zero or missing first year collapses
/// the range to the last year alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonRange {
    first: u16,
    last: u16,
}

impl SeasonRange {
    pub fn new(last_year: u16, first_year: Option<u16>) -> Self {
        let first = match first_year {
            Some(year) if year != 0 => year,
            _ => last_year,
        };
        Self {
            first,
            last: last_year,
        }
    }

    pub fn single(year: u16) -> Self {
        Self::new(year, None)
    }

    pub fn first(&self) -> u16 {
        self.first
    }

    pub fn last(&self) -> u16 {
        self.last
    }

    /// Years in ascending order. Empty when first > last.
    pub fn years(&self) -> RangeInclusive<u16> {
        self.first..=self.last
    }

    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }
}

impl fmt::Display for SeasonRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.last)
        } else {
            write!(f, "{}..{}", self.first, self.last)
        }
    }
}

/// Directory layout under the configurable data root.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn db_dir(&self) -> PathBuf {
        self.root.join("db")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.root.join("backup")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("log")
    }

    pub fn img_dir(&self) -> PathBuf {
        self.root.join("img")
    }

    /// Logo cache filled by the collection path (`.png`).
    pub fn collection_img_dir(&self, country: &str, championship: &str) -> PathBuf {
        self.img_dir().join(format!("{country}-{championship}"))
    }

    /// Logo cache filled by the query path (`.jpg`), kept apart from the
    /// collection cache.
    pub fn query_img_dir(&self, country: &str, championship: &str) -> PathBuf {
        self.img_dir()
            .join("query")
            .join(format!("{country}-{championship}"))
    }

    /// Creates every directory of the layout. Existing directories are fine.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [
            self.root.clone(),
            self.db_dir(),
            self.backup_dir(),
            self.log_dir(),
            self.img_dir(),
        ] {
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub data_dir: PathBuf,
    pub base_url: String,
    pub sport: String,
    /// Pause before and after each scroll on the results listing.
    pub settle_wait: Duration,
    /// Pause after opening a match page.
    pub match_wait: Duration,
    pub max_load_more: usize,
    pub http_timeout: Duration,
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            base_url: DEFAULT_BASE_URL.to_string(),
            sport: DEFAULT_SPORT.to_string(),
            settle_wait: Duration::from_secs(DEFAULT_SETTLE_SECS),
            match_wait: Duration::from_secs(DEFAULT_MATCH_WAIT_SECS),
            max_load_more: DEFAULT_MAX_LOAD_MORE,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Loads `.env.local` then `.env` (neither is required) and reads the
    /// `SCORESHEET_*` variables on top of the defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        let defaults = Self::default();
        Self {
            data_dir: env_string("SCORESHEET_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            base_url: env_string("SCORESHEET_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            sport: env_string("SCORESHEET_SPORT").unwrap_or(defaults.sport),
            settle_wait: env_parse::<u64>("SCORESHEET_SETTLE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.settle_wait),
            match_wait: env_parse::<u64>("SCORESHEET_MATCH_WAIT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.match_wait),
            max_load_more: env_parse::<usize>("SCORESHEET_MAX_LOAD_MORE")
                .unwrap_or(defaults.max_load_more),
            http_timeout: env_parse::<u64>("SCORESHEET_HTTP_TIMEOUT_SECS")
                .map(|secs| Duration::from_secs(secs.max(1)))
                .unwrap_or(defaults.http_timeout),
            user_agent: env_string("SCORESHEET_USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }

    pub fn layout(&self) -> DataLayout {
        DataLayout::new(self.data_dir.clone())
    }

    pub fn results_url(&self, country: &str, championship: &str, season: &str) -> String {
        format!(
            "{}/{}/{country}/{championship}-{season}/results/",
            self.base_url, self.sport
        )
    }

    pub fn match_url(&self, match_id: &str) -> String {
        format!("{}/match/{match_id}/#match-statistics;0", self.base_url)
    }
}

fn env_string(key: &str) -> Option<String> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|raw| raw.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_first_year_collapses_range() {
        let range = SeasonRange::new(2019, None);
        assert_eq!(range.years().collect::<Vec<_>>(), vec![2019]);
        let range = SeasonRange::new(2019, Some(0));
        assert_eq!(range.years().collect::<Vec<_>>(), vec![2019]);
    }

    #[test]
    fn range_is_inclusive_and_ascending() {
        let range = SeasonRange::new(2019, Some(2016));
        assert_eq!(
            range.years().collect::<Vec<_>>(),
            vec![2016, 2017, 2018, 2019]
        );
        assert!(SeasonRange::new(2015, Some(2016)).is_empty());
    }

    #[test]
    fn urls_follow_site_layout() {
        let cfg = ScrapeConfig::default();
        assert_eq!(
            cfg.results_url("england", "premier-league", "2018-2019"),
            "https://www.flashscore.com/football/england/premier-league-2018-2019/results/"
        );
        assert_eq!(
            cfg.match_url("abc123"),
            "https://www.flashscore.com/match/abc123/#match-statistics;0"
        );
    }
}
