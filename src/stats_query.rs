//! Read-only queries over stored partitions.
//!
//! Country and championship match case-insensitively, the way collection
//! stores them. Every query reads one partition per season of the range,
//! skips (and reports) seasons with no partition file, and concatenates
//! per-season results in ascending season order. Within a season, matches where the
//! team played at home come before matches where it played away.

use std::collections::BTreeSet;
use std::fs;

use crate::config::{DataLayout, SeasonRange};
use crate::error::Result;
use crate::images::{Downloader, logo_file_name};
use crate::record::{MatchRecord, Outcome, Side};
use crate::store::{Partition, PartitionKey, PartitionStore};

#[derive(Debug, Clone)]
pub struct StatsQuery {
    store: PartitionStore,
}

impl StatsQuery {
    pub fn new(layout: DataLayout) -> Self {
        Self {
            store: PartitionStore::new(layout),
        }
    }

    pub fn win_matches(
        &self,
        country: &str,
        championship: &str,
        team: &str,
        range: SeasonRange,
    ) -> Vec<MatchRecord> {
        self.matches_with_outcome(country, championship, team, range, Outcome::Win)
    }

    pub fn lose_matches(
        &self,
        country: &str,
        championship: &str,
        team: &str,
        range: SeasonRange,
    ) -> Vec<MatchRecord> {
        self.matches_with_outcome(country, championship, team, range, Outcome::Lose)
    }

    pub fn draw_matches(
        &self,
        country: &str,
        championship: &str,
        team: &str,
        range: SeasonRange,
    ) -> Vec<MatchRecord> {
        self.matches_with_outcome(country, championship, team, range, Outcome::Draw)
    }

    /// Values of `statistic` from the team's own side of each match, with a
    /// trailing `%` removed. Matches without the statistic are skipped.
    pub fn statistic_by_team(
        &self,
        country: &str,
        championship: &str,
        team: &str,
        statistic: &str,
        range: SeasonRange,
    ) -> Vec<String> {
        let mut values = Vec::new();
        for partition in self.partitions(country, championship, range) {
            for (record, side) in team_appearances(&partition, team) {
                if let Some(value) = record.statistic(statistic, side) {
                    values.push(value.trim_end_matches('%').to_string());
                }
            }
        }
        values
    }

    /// Distinct home-team names across the range, sorted.
    pub fn teams(&self, country: &str, championship: &str, range: SeasonRange) -> Vec<String> {
        let mut teams = BTreeSet::new();
        for partition in self.partitions(country, championship, range) {
            for record in partition.records() {
                teams.insert(record.teams.home.name.clone());
            }
        }
        teams.into_iter().collect()
    }

    /// Logo URL from the first home match of `team` in the range, also saved
    /// as `img/query/<country>-<championship>/<team>.jpg`.
    pub fn team_image_url(
        &self,
        downloader: &mut dyn Downloader,
        country: &str,
        championship: &str,
        team: &str,
        range: SeasonRange,
    ) -> Result<Option<String>> {
        for partition in self.partitions(country, championship, range) {
            let Some(record) = partition.home_matches(team).next() else {
                continue;
            };
            let url = record.teams.home.image.clone();
            if url.trim().is_empty() {
                continue;
            }
            let key = partition.key();
            let dir = self
                .store
                .layout()
                .query_img_dir(&key.country, &key.championship);
            fs::create_dir_all(&dir)?;
            downloader.download(&url, &dir.join(logo_file_name(team, "jpg")))?;
            return Ok(Some(url));
        }
        Ok(None)
    }

    fn matches_with_outcome(
        &self,
        country: &str,
        championship: &str,
        team: &str,
        range: SeasonRange,
        wanted: Outcome,
    ) -> Vec<MatchRecord> {
        let mut out = Vec::new();
        for partition in self.partitions(country, championship, range) {
            out.extend(
                team_appearances(&partition, team)
                    .filter(|(record, _)| record.outcome_for(team) == Some(wanted))
                    .map(|(record, _)| record.clone()),
            );
        }
        out
    }

    fn partitions(&self, country: &str, championship: &str, range: SeasonRange) -> Vec<Partition> {
        let country = country.trim().to_lowercase();
        let championship = championship.trim().to_lowercase();
        let mut partitions = Vec::new();
        for year in range.years() {
            let key = PartitionKey::new(&country, &championship, year);
            match self.store.load(&key) {
                Ok(partition) => partitions.push(partition),
                Err(err) => log::warn!("file not found for {year} data: {err}"),
            }
        }
        partitions
    }
}

/// Home appearances of `team`, then away appearances, each match once.
fn team_appearances<'a>(
    partition: &'a Partition,
    team: &'a str,
) -> impl Iterator<Item = (&'a MatchRecord, Side)> + 'a {
    let home = partition.home_matches(team).map(|record| (record, Side::Home));
    let away = partition
        .away_matches(team)
        .filter(move |record| record.teams.home.name != team)
        .map(|record| (record, Side::Away));
    home.chain(away)
}
