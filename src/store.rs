use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::DataLayout;
use crate::error::{Result, ScrapeError};
use crate::record::MatchRecord;
use crate::session::RunSession;

/// Table name TinyDB uses when none is given; partition files keep that
/// layout so both tools can read each other's data.
const DEFAULT_TABLE: &str = "_default";

/// The (country, championship, season) triple identifying a partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionKey {
    pub country: String,
    pub championship: String,
    pub year: u16,
}

impl PartitionKey {
    pub fn new(country: &str, championship: &str, year: u16) -> Self {
        Self {
            country: country.to_string(),
            championship: championship.to_string(),
            year,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}-{}-{}.json", self.country, self.championship, self.year)
    }

    pub fn backup_file_name(&self, stamp: &str) -> String {
        format!(
            "{}-{}-{}-{stamp}.json",
            self.country, self.championship, self.year
        )
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.country.to_uppercase(),
            self.championship.to_uppercase(),
            self.year
        )
    }
}

/// All stored records of one triple, in insertion order.
#[derive(Debug)]
pub struct Partition {
    key: PartitionKey,
    path: PathBuf,
    records: Vec<MatchRecord>,
}

impl Partition {
    pub fn key(&self) -> &PartitionKey {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends one record and rewrites the file. No uniqueness check. A
    /// record whose write fails is not kept.
    pub fn insert(&mut self, record: MatchRecord) -> Result<()> {
        self.records.push(record);
        if let Err(err) = self.persist() {
            self.records.pop();
            return Err(err);
        }
        Ok(())
    }

    pub fn search<'a>(
        &'a self,
        predicate: impl Fn(&MatchRecord) -> bool + 'a,
    ) -> impl Iterator<Item = &'a MatchRecord> + 'a {
        self.records.iter().filter(move |record| predicate(*record))
    }

    pub fn home_matches<'a>(
        &'a self,
        team: &'a str,
    ) -> impl Iterator<Item = &'a MatchRecord> + 'a {
        self.search(move |record| record.teams.home.name == team)
    }

    pub fn away_matches<'a>(
        &'a self,
        team: &'a str,
    ) -> impl Iterator<Item = &'a MatchRecord> + 'a {
        self.search(move |record| record.teams.away.name == team)
    }

    fn persist(&self) -> Result<()> {
        let mut table = Map::new();
        for (idx, record) in self.records.iter().enumerate() {
            table.insert((idx + 1).to_string(), serde_json::to_value(record)?);
        }
        let mut root = Map::new();
        root.insert(DEFAULT_TABLE.to_string(), Value::Object(table));
        let json = serde_json::to_string(&Value::Object(root))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PartitionStore {
    layout: DataLayout,
}

impl PartitionStore {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    pub fn partition_path(&self, key: &PartitionKey) -> PathBuf {
        self.layout.db_dir().join(key.file_name())
    }

    pub fn backup_path(&self, key: &PartitionKey, stamp: &str) -> PathBuf {
        self.layout.backup_dir().join(key.backup_file_name(stamp))
    }

    pub fn exists(&self, key: &PartitionKey) -> bool {
        self.partition_path(key).is_file()
    }

    /// Opens `key` for a fresh collection. The first open in a run moves any
    /// existing file aside under the run stamp; later opens in the same run
    /// drop the in-run file instead, so pre-run content is backed up once.
    pub fn open_partition(
        &self,
        session: &mut RunSession,
        key: &PartitionKey,
    ) -> Result<Partition> {
        let path = self.partition_path(key);
        fs::create_dir_all(self.layout.db_dir())?;

        if session.mark_reset(key) {
            if path.is_file() {
                let backup = self.backup_path(key, session.stamp());
                fs::create_dir_all(self.layout.backup_dir())?;
                move_file(&path, &backup)?;
                log::info!("backed up {} to {}", path.display(), backup.display());
            }
        } else if path.is_file() {
            log::debug!("discarding in-run content of {}", path.display());
            fs::remove_file(&path)?;
        }

        let partition = Partition {
            key: key.clone(),
            path,
            records: Vec::new(),
        };
        partition.persist()?;
        Ok(partition)
    }

    /// Read-only open for the query and image paths.
    pub fn load(&self, key: &PartitionKey) -> Result<Partition> {
        let path = self.partition_path(key);
        if !path.is_file() {
            return Err(ScrapeError::PartitionNotFound { path });
        }
        let raw = fs::read_to_string(&path)?;
        let records = parse_partition_json(&raw, &path)?;
        Ok(Partition {
            key: key.clone(),
            path,
            records,
        })
    }
}

fn parse_partition_json(raw: &str, path: &Path) -> Result<Vec<MatchRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed)?;
    let Some(table) = root.get(DEFAULT_TABLE).and_then(|t| t.as_object()) else {
        return Ok(Vec::new());
    };

    let mut docs: Vec<(u64, &Value)> = table
        .iter()
        .map(|(id, doc)| (id.parse::<u64>().unwrap_or(u64::MAX), doc))
        .collect();
    docs.sort_by_key(|(id, _)| *id);

    let mut records = Vec::with_capacity(docs.len());
    for (id, doc) in docs {
        match serde_json::from_value::<MatchRecord>(doc.clone()) {
            Ok(record) => records.push(record),
            Err(err) => log::warn!("skipping document {id} in {}: {err}", path.display()),
        }
    }
    Ok(records)
}

// rename fails across filesystems; fall back to copy + remove.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)?;
    Ok(())
}
