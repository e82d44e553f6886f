use std::path::PathBuf;

use thiserror::Error;

/// Failures the pipeline distinguishes. None of them abort a whole run; each
/// is handled at the match, season or image that produced it.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("{country} {championship} {year} not found")]
    SeasonNotFound {
        country: String,
        championship: String,
        year: u16,
    },

    #[error("match {match_id}: {reason}")]
    Extraction { match_id: String, reason: String },

    #[error("partition file not found: {}", path.display())]
    PartitionNotFound { path: PathBuf },

    #[error("download of {url} for {name} failed: {reason}")]
    Download {
        url: String,
        name: String,
        reason: String,
    },

    #[error("no team images found for {country} {championship}")]
    NoImages {
        country: String,
        championship: String,
    },

    #[error("page driver: {0}")]
    Driver(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    pub fn extraction(match_id: &str, reason: impl Into<String>) -> Self {
        ScrapeError::Extraction {
            match_id: match_id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn driver(reason: impl Into<String>) -> Self {
        ScrapeError::Driver(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
