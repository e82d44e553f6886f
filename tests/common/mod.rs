#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scoresheet::collector::{FIXTURE_SELECTOR, LOAD_MORE_SELECTOR};
use scoresheet::driver::{Element, PageDriver};
use scoresheet::extractor::{
    DATE_SELECTOR, PARTICIPANT_IMAGE_SELECTOR, PARTICIPANT_SELECTOR, SCORE_SELECTOR,
    STAT_AWAY_SELECTOR, STAT_HOME_SELECTOR, STAT_TITLE_SELECTOR,
};
use scoresheet::images::Downloader;
use scoresheet::record::{MatchRecord, StatPair, TeamSide, Teams};
use scoresheet::session::RunSession;
use scoresheet::store::{PartitionKey, PartitionStore};
use scoresheet::{DataLayout, ScrapeConfig, ScrapeError};

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn fast_config(data_dir: &Path) -> ScrapeConfig {
    ScrapeConfig {
        data_dir: data_dir.to_path_buf(),
        settle_wait: Duration::ZERO,
        match_wait: Duration::ZERO,
        ..ScrapeConfig::default()
    }
}

pub fn record(home: &str, home_score: &str, away: &str, away_score: &str) -> MatchRecord {
    MatchRecord {
        date: "01.01.2019 15:00".to_string(),
        teams: Teams {
            home: TeamSide {
                name: home.to_string(),
                score: home_score.to_string(),
                image: format!("https://img.example/{home}.png"),
            },
            away: TeamSide {
                name: away.to_string(),
                score: away_score.to_string(),
                image: format!("https://img.example/{away}.png"),
            },
        },
        statistics: BTreeMap::new(),
    }
}

pub fn with_stat(mut record: MatchRecord, key: &str, home: &str, away: &str) -> MatchRecord {
    record.statistics.insert(
        key.to_string(),
        StatPair {
            home: home.to_string(),
            away: away.to_string(),
        },
    );
    record
}

/// Writes `records` as the partition of one season.
pub fn seed(layout: &DataLayout, year: u16, records: Vec<MatchRecord>) {
    let mut session = RunSession::with_stamp(layout.clone(), "19990101000000").unwrap();
    let store = PartitionStore::new(layout.clone());
    let key = PartitionKey::new("england", "premier-league", year);
    let mut partition = store.open_partition(&mut session, &key).unwrap();
    for record in records {
        partition.insert(record).unwrap();
    }
}

fn element(selector: &str, text: &str, attrs: &[(&str, &str)]) -> Element {
    Element {
        selector: selector.to_string(),
        text: text.to_string(),
        attributes: attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// One scripted page: fixed elements per selector, plus optional batches of
/// fixture ids revealed one "load more" click at a time.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPage {
    elements: HashMap<String, Vec<Element>>,
    batches: Vec<Vec<String>>,
    /// Keep offering "load more" even when no batch is left.
    sticky_load_more: bool,
}

impl ScriptedPage {
    pub fn listing(batches: Vec<Vec<&str>>) -> Self {
        Self {
            batches: batches
                .into_iter()
                .map(|batch| batch.into_iter().map(str::to_string).collect())
                .collect(),
            ..Self::default()
        }
    }

    pub fn sticky_load_more(mut self) -> Self {
        self.sticky_load_more = true;
        self
    }

    pub fn texts(mut self, selector: &str, texts: &[&str]) -> Self {
        let elements = texts
            .iter()
            .map(|text| element(selector, text, &[]))
            .collect();
        self.elements.insert(selector.to_string(), elements);
        self
    }

    pub fn attrs(mut self, selector: &str, name: &str, values: &[&str]) -> Self {
        let elements = values
            .iter()
            .map(|value| element(selector, "", &[(name, *value)]))
            .collect();
        self.elements.insert(selector.to_string(), elements);
        self
    }

    /// A match statistics page with the layout artifacts the real site has:
    /// empty participant labels next to the named ones.
    pub fn match_page(home: &str, home_score: &str, away: &str, away_score: &str) -> Self {
        let home_img = format!("https://img.example/{home}.png");
        let away_img = format!("https://img.example/{away}.png");
        Self::default()
            .texts(DATE_SELECTOR, &["12.05.2019 16:00"])
            .texts(PARTICIPANT_SELECTOR, &["", home, "", away])
            .texts(SCORE_SELECTOR, &[home_score, away_score])
            .attrs(
                PARTICIPANT_IMAGE_SELECTOR,
                "src",
                &[home_img.as_str(), away_img.as_str()],
            )
            .texts(STAT_TITLE_SELECTOR, &["Ball Possession", "Corner Kicks"])
            .texts(STAT_HOME_SELECTOR, &["55%", "7"])
            .texts(STAT_AWAY_SELECTOR, &["45%", "3"])
    }
}

#[derive(Debug, Default)]
pub struct ScriptedDriver {
    pages: HashMap<String, ScriptedPage>,
    current: Option<String>,
    revealed: usize,
    pub visited: Vec<String>,
    pub clicks: usize,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, page: ScriptedPage) -> Self {
        self.pages.insert(url.into(), page);
        self
    }

    fn current_page(&self) -> Result<&ScriptedPage, ScrapeError> {
        self.current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .ok_or_else(|| ScrapeError::driver("no page loaded"))
    }
}

impl PageDriver for ScriptedDriver {
    fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.visited.push(url.to_string());
        self.revealed = 0;
        if self.pages.contains_key(url) {
            self.current = Some(url.to_string());
            Ok(())
        } else {
            self.current = None;
            Err(ScrapeError::driver(format!("404 {url}")))
        }
    }

    fn find_all(&mut self, selector: &str) -> Result<Vec<Element>, ScrapeError> {
        let revealed = self.revealed;
        let page = self.current_page()?;
        if selector == FIXTURE_SELECTOR && !page.batches.is_empty() {
            let ids = page.batches.iter().take(revealed + 1).flatten();
            return Ok(ids
                .map(|id| {
                    let raw = format!("g_1_{id}");
                    element(selector, "", &[("id", raw.as_str())])
                })
                .collect());
        }
        if selector == LOAD_MORE_SELECTOR {
            let more = revealed + 1 < page.batches.len() || page.sticky_load_more;
            return Ok(if more {
                vec![element(selector, "Show more matches", &[])]
            } else {
                Vec::new()
            });
        }
        Ok(page.elements.get(selector).cloned().unwrap_or_default())
    }

    fn click(&mut self, element: &Element) -> Result<(), ScrapeError> {
        if element.selector != LOAD_MORE_SELECTOR {
            return Err(ScrapeError::driver("not clickable"));
        }
        self.clicks += 1;
        let batches = self.current_page()?.batches.len();
        if self.revealed + 1 < batches {
            self.revealed += 1;
        }
        Ok(())
    }

    fn scroll_to_bottom(&mut self) -> Result<(), ScrapeError> {
        Ok(())
    }
}

/// Writes the url into the destination file; urls containing "broken" fail.
#[derive(Debug, Default)]
pub struct FakeDownloader {
    pub downloads: Vec<(String, PathBuf)>,
}

impl Downloader for FakeDownloader {
    fn download(&mut self, url: &str, dest: &Path) -> Result<(), ScrapeError> {
        if url.contains("broken") {
            return Err(ScrapeError::Download {
                url: url.to_string(),
                name: dest.display().to_string(),
                reason: "connection refused".to_string(),
            });
        }
        fs::write(dest, url.as_bytes())?;
        self.downloads.push((url.to_string(), dest.to_path_buf()));
        Ok(())
    }
}
