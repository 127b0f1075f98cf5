use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::{season_report, teams_and_years};
use crate::error::ScoreError;
use crate::scoring::round3;
use crate::store::Store;

/// Seasons finished in one championship position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Podium {
    pub years: Vec<i32>,
}

impl Podium {
    pub fn count(&self) -> usize {
        self.years.len()
    }
}

impl fmt::Display for Podium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years: Vec<String> = self.years.iter().map(|y| y.to_string()).collect();
        write!(f, "{} ({})", self.count(), years.join(", "))
    }
}

/// One participant's record across every season they contested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestSeasons {
    pub name: String,
    /// Teams and years, drivers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams_years: Option<String>,
    pub seasons: usize,
    /// Mean events contested per season, 2 decimals
    pub events_per_season: f64,
    pub first: Podium,
    pub second: Podium,
    pub third: Podium,
    /// Mean of the season-final rescaled values
    pub mean_scaled: f64,
}

#[derive(Default)]
struct Tally {
    seasons: usize,
    events: u32,
    scaled_sum: f64,
    podiums: [Podium; 3],
}

impl Tally {
    fn record(&mut self, season: i32, rank: usize, events: u32, scaled: f64) {
        self.seasons += 1;
        self.events += events;
        self.scaled_sum += scaled;
        if let Some(p) = self.podiums.get_mut(rank) {
            p.years.push(season);
        }
    }

    fn finish(self, name: String, teams_years: Option<String>) -> BestSeasons {
        let n = self.seasons.max(1) as f64;
        let [first, second, third] = self.podiums;
        BestSeasons {
            name,
            teams_years,
            seasons: self.seasons,
            events_per_season: (self.events as f64 / n * 100.0).round() / 100.0,
            first,
            second,
            third,
            mean_scaled: round3(self.scaled_sum / n),
        }
    }
}

fn ranked(mut rows: Vec<BestSeasons>) -> Vec<BestSeasons> {
    rows.sort_by(|a, b| {
        b.mean_scaled
            .total_cmp(&a.mean_scaled)
            .then_with(|| b.seasons.cmp(&a.seasons))
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

/// Drivers ranked by their mean season-final rescaled value.
///
/// Season positions follow each season's standings order.
pub fn best_seasons_drivers(store: &Store) -> Result<Vec<BestSeasons>, ScoreError> {
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
    let mut seasons = store.seasons();
    seasons.sort_unstable();

    for season in seasons {
        let report = season_report(store, season)?;
        for (rank, s) in report.drivers.iter().enumerate() {
            tallies
                .entry(s.driver.clone())
                .or_default()
                .record(season, rank, s.events, s.scaled);
        }
    }

    let rows = tallies
        .into_iter()
        .map(|(name, tally)| {
            let teams = teams_and_years(
                store
                    .drivers
                    .iter()
                    .filter(|r| r.driver == name)
                    .map(|r| (r.team.as_str(), r.event.season)),
            );
            tally.finish(name, Some(teams))
        })
        .collect();

    Ok(ranked(rows))
}

/// Constructors ranked by their mean season-final rescaled value.
pub fn best_seasons_teams(store: &Store) -> Result<Vec<BestSeasons>, ScoreError> {
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
    let mut seasons = store.seasons();
    seasons.sort_unstable();

    for season in seasons {
        let report = season_report(store, season)?;
        for (rank, s) in report.teams.iter().enumerate() {
            tallies
                .entry(s.team.clone())
                .or_default()
                .record(season, rank, s.events, s.scaled);
        }
    }

    let rows = tallies
        .into_iter()
        .map(|(name, tally)| tally.finish(name, None))
        .collect();

    Ok(ranked(rows))
}
