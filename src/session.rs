use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::config::DataLayout;
use crate::error::Result;
use crate::store::PartitionKey;

const RUN_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const LOG_LINE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// State scoped to one collection run: the stamp naming its backups and log
/// files, and the partitions it already reset.
#[derive(Debug)]
pub struct RunSession {
    stamp: String,
    layout: DataLayout,
    reset_partitions: HashSet<PartitionKey>,
}

impl RunSession {
    /// Starts a run stamped with the current local time and creates the data
    /// directories.
    pub fn start(layout: DataLayout) -> Result<Self> {
        let stamp = Local::now().format(RUN_STAMP_FORMAT).to_string();
        Self::with_stamp(layout, stamp)
    }

    pub fn with_stamp(layout: DataLayout, stamp: impl Into<String>) -> Result<Self> {
        layout.ensure_dirs()?;
        Ok(Self {
            stamp: stamp.into(),
            layout,
            reset_partitions: HashSet::new(),
        })
    }

    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    pub fn ids_log_path(&self) -> PathBuf {
        self.layout.log_dir().join(format!("ids-{}.txt", self.stamp))
    }

    pub fn error_log_path(&self) -> PathBuf {
        self.layout.log_dir().join(format!("error-{}.txt", self.stamp))
    }

    /// Records that `key` was reset in this run. Returns false when it
    /// already was.
    pub(crate) fn mark_reset(&mut self, key: &PartitionKey) -> bool {
        self.reset_partitions.insert(key.clone())
    }

    pub fn log_discovery(&self, key: &PartitionKey, ids: &[String]) -> Result<()> {
        let entry = format!(
            "{} {} {} {}\n{:?}\n\n",
            Local::now().format(LOG_LINE_FORMAT),
            key.country,
            key.championship,
            key.year,
            ids
        );
        append(self.ids_log_path(), &entry)
    }

    pub fn log_match_failure(&self, key: &PartitionKey, match_id: &str) -> Result<()> {
        let entry = format!(
            "{} {} {} {} - {}\n",
            Local::now().format(LOG_LINE_FORMAT),
            key.country,
            key.championship,
            key.year,
            match_id
        );
        append(self.error_log_path(), &entry)
    }
}

fn append(path: PathBuf, entry: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(entry.as_bytes())?;
    Ok(())
}
