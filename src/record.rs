use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Statistic keys the match pages are known to carry, already normalized.
pub const KNOWN_STATISTICS: &[&str] = &[
    "ball_possession",
    "goal_attempts",
    "shots_on_goal",
    "shots_off_goal",
    "blocked_shots",
    "free_kicks",
    "corner_kicks",
    "offsides",
    "total_passes",
    "fouls",
    "yellow_cards",
    "goalkeeper_saves",
    "completed_passes",
    "tackles",
    "attacks",
    "dangerous_attacks",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: String,
    pub teams: Teams,
    #[serde(default)]
    pub statistics: BTreeMap<String, StatPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teams {
    pub home: TeamSide,
    pub away: TeamSide,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSide {
    pub name: String,
    pub score: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatPair {
    pub home: String,
    pub away: String,
}

/// Which side of a fixture a team played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl MatchRecord {
    pub fn side_of(&self, team: &str) -> Option<Side> {
        if self.teams.home.name == team {
            Some(Side::Home)
        } else if self.teams.away.name == team {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// Result from the home side's point of view.
    pub fn home_ordering(&self) -> Ordering {
        compare_scores(&self.teams.home.score, &self.teams.away.score)
    }

    pub fn outcome_for(&self, team: &str) -> Option<Outcome> {
        let side = self.side_of(team)?;
        let ordering = match side {
            Side::Home => self.home_ordering(),
            Side::Away => self.home_ordering().reverse(),
        };
        Some(match ordering {
            Ordering::Greater => Outcome::Win,
            Ordering::Less => Outcome::Lose,
            Ordering::Equal => Outcome::Draw,
        })
    }

    pub fn statistic(&self, key: &str, side: Side) -> Option<&str> {
        let pair = self.statistics.get(key)?;
        Some(match side {
            Side::Home => pair.home.as_str(),
            Side::Away => pair.away.as_str(),
        })
    }
}

/// Scores are stored as display strings. Both sides parsing as integers are
/// compared numerically so "10" beats "2"; anything else falls back to a
/// plain string comparison.
pub fn compare_scores(home: &str, away: &str) -> Ordering {
    match (home.trim().parse::<u32>(), away.trim().parse::<u32>()) {
        (Ok(h), Ok(a)) => h.cmp(&a),
        _ => home.trim().cmp(away.trim()),
    }
}

/// "Ball Possession" -> "ball_possession"
pub fn normalize_stat_key(title: &str) -> String {
    title.trim().replace(' ', "_").to_lowercase()
}
