use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::config::{DataLayout, SeasonRange};
use crate::record::{KNOWN_STATISTICS, MatchRecord};
use crate::store::{PartitionKey, PartitionStore};

#[derive(Debug)]
pub struct ExportReport {
    pub matches: usize,
    pub teams: usize,
    pub statistics: usize,
    pub missing_seasons: Vec<u16>,
}

/// Writes every stored match of the range to an `.xlsx` workbook: a
/// `Matches` sheet with one home/away column pair per statistic seen, and a
/// `Teams` sheet.
pub fn export_partitions(
    layout: &DataLayout,
    country: &str,
    championship: &str,
    range: SeasonRange,
    path: &Path,
) -> Result<ExportReport> {
    let store = PartitionStore::new(layout.clone());
    let mut rows: Vec<(u16, MatchRecord)> = Vec::new();
    let mut missing_seasons = Vec::new();
    for year in range.years() {
        let key = PartitionKey::new(country, championship, year);
        match store.load(&key) {
            Ok(partition) => rows.extend(partition.records().iter().cloned().map(|r| (year, r))),
            Err(err) => {
                log::warn!("{key}: {err}");
                missing_seasons.push(year);
            }
        }
    }

    let stat_keys = order_stat_keys(
        rows.iter()
            .flat_map(|(_, record)| record.statistics.keys().cloned())
            .collect(),
    );
    let teams: BTreeSet<String> = rows
        .iter()
        .map(|(_, record)| record.teams.home.name.clone())
        .collect();

    let mut header = vec![
        "Season".to_string(),
        "Date".to_string(),
        "Home".to_string(),
        "Away".to_string(),
        "Home Score".to_string(),
        "Away Score".to_string(),
    ];
    for key in &stat_keys {
        header.push(format!("{key}_home"));
        header.push(format!("{key}_away"));
    }
    let mut match_rows = vec![header];
    for (year, record) in &rows {
        match_rows.push(match_row(*year, record, &stat_keys));
    }

    let mut team_rows = vec![vec!["Team".to_string()]];
    team_rows.extend(teams.iter().map(|team| vec![team.clone()]));

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Matches")?;
        write_rows(sheet, &match_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Teams")?;
        write_rows(sheet, &team_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        matches: rows.len(),
        teams: teams.len(),
        statistics: stat_keys.len(),
        missing_seasons,
    })
}

/// Known statistics in page order, then anything else alphabetically.
fn order_stat_keys(mut seen: BTreeSet<String>) -> Vec<String> {
    let mut ordered = Vec::with_capacity(seen.len());
    for known in KNOWN_STATISTICS {
        if seen.remove(*known) {
            ordered.push(known.to_string());
        }
    }
    ordered.extend(seen);
    ordered
}

fn match_row(year: u16, record: &MatchRecord, stat_keys: &[String]) -> Vec<String> {
    let mut row = vec![
        year.to_string(),
        record.date.clone(),
        record.teams.home.name.clone(),
        record.teams.away.name.clone(),
        record.teams.home.score.clone(),
        record.teams.away.score.clone(),
    ];
    for key in stat_keys {
        match record.statistics.get(key) {
            Some(pair) => {
                row.push(pair.home.clone());
                row.push(pair.away.clone());
            }
            None => {
                row.push(String::new());
                row.push(String::new());
            }
        }
    }
    row
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
