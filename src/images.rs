use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;
use reqwest::blocking::Client;

use crate::config::{ScrapeConfig, SeasonRange};
use crate::error::{Result, ScrapeError};
use crate::http_client::{fetch_bytes, http_client};
use crate::progress::Progress;
use crate::store::{PartitionKey, PartitionStore};

/// A team logo to fetch, taken from the home side of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    pub url_image: String,
    pub name: String,
}

/// Fetches one remote file to a local path.
pub trait Downloader {
    fn download(&mut self, url: &str, dest: &Path) -> Result<()>;
}

pub struct HttpDownloader {
    client: &'static Client,
}

impl HttpDownloader {
    pub fn new(config: &ScrapeConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client(config)?,
        })
    }
}

impl Downloader for HttpDownloader {
    fn download(&mut self, url: &str, dest: &Path) -> Result<()> {
        let failure = |reason: String| ScrapeError::Download {
            url: url.to_string(),
            name: dest.display().to_string(),
            reason,
        };
        Url::parse(url).map_err(|err| failure(format!("invalid url: {err}")))?;
        let bytes = fetch_bytes(self.client, url).map_err(|err| failure(format!("{err:#}")))?;
        fs::write(dest, bytes)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ImageSyncReport {
    pub attempted: usize,
    pub downloaded: usize,
    pub failures: Vec<String>,
    pub missing_seasons: Vec<u16>,
}

/// Home-side logo pairs of every stored season in range. Seasons without a
/// partition file are reported in the second element.
pub fn harvest_image_refs(
    store: &PartitionStore,
    country: &str,
    championship: &str,
    range: SeasonRange,
) -> (Vec<ImageRef>, Vec<u16>) {
    let mut refs = Vec::new();
    let mut missing = Vec::new();
    for year in range.years() {
        let key = PartitionKey::new(country, championship, year);
        let partition = match store.load(&key) {
            Ok(partition) => partition,
            Err(err) => {
                log::warn!("{key}: {err}");
                missing.push(year);
                continue;
            }
        };
        for record in partition.records() {
            let home = &record.teams.home;
            if home.image.trim().is_empty() {
                log::debug!("{key}: no logo url for {}", home.name);
                continue;
            }
            refs.push(ImageRef {
                url_image: home.image.clone(),
                name: home.name.clone(),
            });
        }
    }
    (refs, missing)
}

/// Drops every repeat of an earlier `(url, name)` pair, wherever it appears.
pub fn dedup_image_refs(refs: Vec<ImageRef>) -> Vec<ImageRef> {
    let mut seen = HashSet::new();
    refs.into_iter()
        .filter(|image| seen.insert(image.clone()))
        .collect()
}

/// `<team>.<ext>` with path separators replaced so the file stays inside its
/// cache directory.
pub fn logo_file_name(team: &str, ext: &str) -> String {
    let safe: String = team
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}.{ext}")
}

/// Downloads the distinct home-team logos of `range` into
/// `img/<country>-<championship>/<team>.png`. Each download stands alone;
/// failures are reported and skipped.
pub fn sync(
    store: &PartitionStore,
    downloader: &mut dyn Downloader,
    country: &str,
    championship: &str,
    range: SeasonRange,
) -> Result<ImageSyncReport> {
    let (refs, missing_seasons) = harvest_image_refs(store, country, championship, range);
    if refs.is_empty() {
        return Err(ScrapeError::NoImages {
            country: country.to_string(),
            championship: championship.to_string(),
        });
    }
    let refs = dedup_image_refs(refs);

    let dir = store.layout().collection_img_dir(country, championship);
    fs::create_dir_all(&dir)?;

    log::info!("starting images download ({} teams)", refs.len());
    let mut report = ImageSyncReport {
        missing_seasons,
        ..ImageSyncReport::default()
    };
    let mut progress = Progress::new(refs.len());
    for image in &refs {
        report.attempted += 1;
        let dest: PathBuf = dir.join(logo_file_name(&image.name, "png"));
        match downloader.download(&image.url_image, &dest) {
            Ok(()) => {
                report.downloaded += 1;
                log::info!("{} image has been downloaded", image.name.to_uppercase());
            }
            Err(err) => {
                log::warn!("{} image was not downloaded: {err}", image.name.to_uppercase());
                report.failures.push(format!("{}: {err}", image.name));
            }
        }
        progress.tick();
    }
    progress.finish();
    Ok(report)
}
