//! Scrape match results from a paginated results site into per-season JSON
//! partitions, then slice the stored data by team and outcome.

pub mod collector;
pub mod config;
pub mod driver;
pub mod error;
pub mod export;
pub mod extractor;
pub mod html_driver;
pub mod http_client;
pub mod images;
pub mod ingest;
pub mod progress;
pub mod record;
pub mod session;
pub mod stats_query;
pub mod store;

pub use config::{DataLayout, ScrapeConfig, SeasonRange};
pub use error::{Result, ScrapeError};
pub use record::MatchRecord;
