use serde::Serialize;
use std::collections::BTreeMap;

use super::{ComponentMeans, Mean};
use crate::error::ScoreError;
use crate::scoring::ComponentSet;
use crate::season::{SeasonAccumulator, SeasonTimeline};
use crate::store::{DriverResult, Store, TeamResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverStanding {
    pub driver: String,
    /// Teams driven for this season, in order of first appearance
    pub teams: Vec<String>,
    pub events: u32,
    pub grid_mean: Option<f64>,
    pub finish_mean: Option<f64>,
    pub csi_mean: Option<f64>,
    /// Mean of each component over the events where it was present
    pub components: ComponentSet,
    pub pf_mean: Option<f64>,
    pub total: f64,
    /// Rescaled cumulative over the rounds this driver ran
    pub scaled: f64,
    /// Rescaled cumulative over the whole season
    pub season_cap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStanding {
    pub team: String,
    pub events: u32,
    pub grid_mean: Option<f64>,
    pub finish_mean: Option<f64>,
    pub csi_mean: Option<f64>,
    pub ops: Option<f64>,
    pub reliability: Option<f64>,
    pub development: Option<f64>,
    pub total: f64,
    pub scaled: f64,
    pub season_cap: f64,
}

/// Standings and per-round curves of one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonReport {
    pub season: i32,
    /// Highest round with results; denominator of `season_cap`
    pub season_rounds: u32,
    pub drivers: Vec<DriverStanding>,
    pub teams: Vec<TeamStanding>,
    pub driver_timelines: Vec<SeasonTimeline<String>>,
    pub team_timelines: Vec<SeasonTimeline<String>>,
}

impl SeasonReport {
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty() && self.teams.is_empty()
    }
}

fn timelines_by_name(
    timelines: &[SeasonTimeline<String>],
) -> BTreeMap<&str, &SeasonTimeline<String>> {
    timelines
        .iter()
        .map(|t| (t.participant.as_str(), t))
        .collect()
}

fn driver_standings(
    rows: &[&DriverResult],
    timelines: &[SeasonTimeline<String>],
    season_rounds: u32,
) -> Vec<DriverStanding> {
    let curves = timelines_by_name(timelines);
    let mut grouped: BTreeMap<&str, Vec<&DriverResult>> = BTreeMap::new();
    for r in rows {
        grouped.entry(r.driver.as_str()).or_default().push(r);
    }

    let mut out: Vec<DriverStanding> = grouped
        .into_iter()
        .filter_map(|(driver, mut rows)| {
            let curve = curves.get(driver)?;
            rows.sort_by_key(|r| r.event.round);

            let mut teams: Vec<String> = Vec::new();
            let mut grid = Mean::default();
            let mut finish = Mean::default();
            let mut csi = Mean::default();
            let mut pf = Mean::default();
            let mut components = ComponentMeans::default();
            for r in &rows {
                if !teams.contains(&r.team) {
                    teams.push(r.team.clone());
                }
                grid.push(r.grid.map(f64::from));
                finish.push(r.finish.map(f64::from));
                csi.push(Some(r.csi));
                pf.push(Some(r.pf));
                components.push(&r.components);
            }

            Some(DriverStanding {
                driver: driver.to_string(),
                teams,
                events: curve.rounds_counted(),
                grid_mean: grid.get(),
                finish_mean: finish.get(),
                csi_mean: csi.get(),
                components: components.get(),
                pf_mean: pf.get(),
                total: curve.total(),
                scaled: curve.scaled(),
                season_cap: curve.season_cap(season_rounds),
            })
        })
        .collect();

    out.sort_by(|a, b| {
        b.scaled
            .total_cmp(&a.scaled)
            .then_with(|| b.total.total_cmp(&a.total))
            .then_with(|| a.driver.cmp(&b.driver))
    });
    out
}

fn team_standings(
    rows: &[&TeamResult],
    timelines: &[SeasonTimeline<String>],
    season_rounds: u32,
) -> Vec<TeamStanding> {
    let curves = timelines_by_name(timelines);
    let mut grouped: BTreeMap<&str, Vec<&TeamResult>> = BTreeMap::new();
    for r in rows {
        grouped.entry(r.team.as_str()).or_default().push(r);
    }

    let mut out: Vec<TeamStanding> = grouped
        .into_iter()
        .filter_map(|(team, rows)| {
            let curve = curves.get(team)?;
            let mut m: [Mean; 6] = Default::default();
            for r in &rows {
                m[0].push(r.grid_mean);
                m[1].push(r.finish_mean);
                m[2].push(Some(r.csi_mean));
                m[3].push(Some(r.ops));
                m[4].push(Some(r.reliability));
                m[5].push(Some(r.development));
            }

            Some(TeamStanding {
                team: team.to_string(),
                events: curve.rounds_counted(),
                grid_mean: m[0].get(),
                finish_mean: m[1].get(),
                csi_mean: m[2].get(),
                ops: m[3].get(),
                reliability: m[4].get(),
                development: m[5].get(),
                total: curve.total(),
                scaled: curve.scaled(),
                season_cap: curve.season_cap(season_rounds),
            })
        })
        .collect();

    out.sort_by(|a, b| {
        b.scaled
            .total_cmp(&a.scaled)
            .then_with(|| b.total.total_cmp(&a.total))
            .then_with(|| a.team.cmp(&b.team))
    });
    out
}

/// Build a season's standings.
///
/// A season without results gives an empty report. A participant scored
/// twice in one round is a `RoundOrder` error.
pub fn season_report(store: &Store, season: i32) -> Result<SeasonReport, ScoreError> {
    let drivers = store.season_drivers(season);
    let teams = store.season_teams(season);

    let season_rounds = drivers
        .iter()
        .map(|r| r.event.round)
        .chain(teams.iter().map(|r| r.event.round))
        .max()
        .unwrap_or(0);

    let mut acc = SeasonAccumulator::new();
    for r in &drivers {
        acc.push(r.driver.clone(), r.event.round, r.points);
    }
    let driver_timelines = acc.finish()?;

    let mut acc = SeasonAccumulator::new();
    for r in &teams {
        acc.push(r.team.clone(), r.event.round, r.points);
    }
    let team_timelines = acc.finish()?;

    Ok(SeasonReport {
        season,
        season_rounds,
        drivers: driver_standings(&drivers, &driver_timelines, season_rounds),
        teams: team_standings(&teams, &team_timelines, season_rounds),
        driver_timelines,
        team_timelines,
    })
}
