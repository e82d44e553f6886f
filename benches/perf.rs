use std::collections::BTreeMap;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use scoresheet::record::{MatchRecord, StatPair, TeamSide, Teams, compare_scores};
use scoresheet::session::RunSession;
use scoresheet::stats_query::StatsQuery;
use scoresheet::store::{PartitionKey, PartitionStore};
use scoresheet::{DataLayout, SeasonRange};

const TEAMS: [&str; 20] = [
    "Arsenal",
    "Aston Villa",
    "Bournemouth",
    "Brighton",
    "Burnley",
    "Chelsea",
    "Crystal Palace",
    "Everton",
    "Leicester",
    "Liverpool",
    "Manchester City",
    "Manchester Utd",
    "Newcastle",
    "Norwich",
    "Sheffield Utd",
    "Southampton",
    "Tottenham",
    "Watford",
    "West Ham",
    "Wolves",
];

fn season_records(year: u16) -> Vec<MatchRecord> {
    let mut records = Vec::new();
    for (h, home) in TEAMS.iter().enumerate() {
        for (a, away) in TEAMS.iter().enumerate() {
            if h == a {
                continue;
            }
            let seed = h * 31 + a * 17 + year as usize;
            let possession = 35 + seed % 31;
            let mut statistics = BTreeMap::new();
            statistics.insert(
                "ball_possession".to_string(),
                StatPair {
                    home: format!("{possession}%"),
                    away: format!("{}%", 100 - possession),
                },
            );
            statistics.insert(
                "corner_kicks".to_string(),
                StatPair {
                    home: (seed % 11).to_string(),
                    away: (seed % 7).to_string(),
                },
            );
            records.push(MatchRecord {
                date: format!("01.01.{year} 15:00"),
                teams: Teams {
                    home: TeamSide {
                        name: home.to_string(),
                        score: (seed % 5).to_string(),
                        image: format!("https://img.example/{h}.png"),
                    },
                    away: TeamSide {
                        name: away.to_string(),
                        score: (seed % 4).to_string(),
                        image: format!("https://img.example/{a}.png"),
                    },
                },
                statistics,
            });
        }
    }
    records
}

fn seeded_store(dir: &std::path::Path) -> DataLayout {
    let layout = DataLayout::new(dir);
    let mut session = RunSession::with_stamp(layout.clone(), "20200101000000").unwrap();
    let store = PartitionStore::new(layout.clone());
    for year in 2015..=2019 {
        let key = PartitionKey::new("england", "premier-league", year);
        let mut partition = store.open_partition(&mut session, &key).unwrap();
        for record in season_records(year) {
            partition.insert(record).unwrap();
        }
    }
    layout
}

fn bench_compare_scores(c: &mut Criterion) {
    let pairs = [("2", "1"), ("10", "2"), ("0", "0"), ("3", "-"), ("", "1")];
    c.bench_function("compare_scores", |b| {
        b.iter(|| {
            for (home, away) in pairs {
                black_box(compare_scores(black_box(home), black_box(away)));
            }
        })
    });
}

fn bench_queries(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let query = StatsQuery::new(seeded_store(dir.path()));
    let range = SeasonRange::new(2019, Some(2015));

    c.bench_function("win_matches_five_seasons", |b| {
        b.iter(|| {
            let wins = query.win_matches("england", "premier-league", black_box("Liverpool"), range);
            black_box(wins.len());
        })
    });

    c.bench_function("statistic_by_team_five_seasons", |b| {
        b.iter(|| {
            let values = query.statistic_by_team(
                "england",
                "premier-league",
                black_box("Chelsea"),
                "ball_possession",
                range,
            );
            black_box(values.len());
        })
    });

    c.bench_function("teams_five_seasons", |b| {
        b.iter(|| black_box(query.teams("england", "premier-league", range).len()))
    });
}

criterion_group!(benches, bench_compare_scores, bench_queries);
criterion_main!(benches);
