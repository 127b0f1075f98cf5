use serde::Serialize;
use std::collections::BTreeMap;

use super::{compress_years, teams_and_years, ComponentMeans, Mean};
use crate::scoring::{round3, ComponentSet, ShrinkageConfig};
use crate::stats::{shrink_means, ShrinkagePrior};
use crate::store::{DriverResult, Store, TeamResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalDriver {
    pub driver: String,
    /// e.g. `"Team (2019-2021, 2023); Other (2022)"`
    pub teams_years: String,
    pub events: usize,
    pub grid_mean: Option<f64>,
    pub finish_mean: Option<f64>,
    pub csi_mean: Option<f64>,
    pub components: ComponentSet,
    pub total: f64,
    pub mean: f64,
    /// Empirical-Bayes mean per event
    pub shrunk_mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalTeam {
    pub team: String,
    pub years: String,
    pub events: usize,
    pub grid_mean: Option<f64>,
    pub finish_mean: Option<f64>,
    pub csi_mean: Option<f64>,
    pub ops: Option<f64>,
    pub reliability: Option<f64>,
    pub development: Option<f64>,
    pub total: f64,
    pub mean: f64,
    pub shrunk_mean: f64,
}

/// A historical table plus the prior its shrunk means were computed with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct History<T> {
    pub prior: ShrinkagePrior,
    /// Shrunk mean descending, then event count descending
    pub rows: Vec<T>,
}

impl<T> History<T> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Every driver across the whole store, ranked by shrunk mean per event.
pub fn driver_history(store: &Store, config: &ShrinkageConfig) -> History<HistoricalDriver> {
    let table = shrink_means(
        store.drivers.iter().map(|r| (r.driver.as_str(), r.points)),
        config,
    );

    let mut grouped: BTreeMap<&str, Vec<&DriverResult>> = BTreeMap::new();
    // Same rows the estimator keeps, so counts and means agree
    for r in store.drivers.iter().filter(|r| r.points.is_finite()) {
        grouped.entry(r.driver.as_str()).or_default().push(r);
    }

    let mut rows: Vec<HistoricalDriver> = table
        .groups
        .iter()
        .map(|g| {
            let results = grouped.get(g.key).map(Vec::as_slice).unwrap_or_default();
            let mut grid = Mean::default();
            let mut finish = Mean::default();
            let mut csi = Mean::default();
            let mut components = ComponentMeans::default();
            for r in results {
                grid.push(r.grid.map(f64::from));
                finish.push(r.finish.map(f64::from));
                csi.push(Some(r.csi));
                components.push(&r.components);
            }

            HistoricalDriver {
                driver: g.key.to_string(),
                teams_years: teams_and_years(
                    results.iter().map(|r| (r.team.as_str(), r.event.season)),
                ),
                events: g.n,
                grid_mean: grid.get(),
                finish_mean: finish.get(),
                csi_mean: csi.get(),
                components: components.get(),
                total: round3(g.mean * g.n as f64),
                mean: round3(g.mean),
                shrunk_mean: round3(g.shrunk_mean),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.shrunk_mean
            .total_cmp(&a.shrunk_mean)
            .then_with(|| b.events.cmp(&a.events))
            .then_with(|| a.driver.cmp(&b.driver))
    });

    History {
        prior: table.prior,
        rows,
    }
}

/// Every constructor across the whole store, ranked by shrunk mean per event.
pub fn team_history(store: &Store, config: &ShrinkageConfig) -> History<HistoricalTeam> {
    let table = shrink_means(
        store.teams.iter().map(|r| (r.team.as_str(), r.points)),
        config,
    );

    let mut grouped: BTreeMap<&str, Vec<&TeamResult>> = BTreeMap::new();
    for r in store.teams.iter().filter(|r| r.points.is_finite()) {
        grouped.entry(r.team.as_str()).or_default().push(r);
    }

    let mut rows: Vec<HistoricalTeam> = table
        .groups
        .iter()
        .map(|g| {
            let results = grouped.get(g.key).map(Vec::as_slice).unwrap_or_default();
            let mut m: [Mean; 6] = Default::default();
            for r in results {
                m[0].push(r.grid_mean);
                m[1].push(r.finish_mean);
                m[2].push(Some(r.csi_mean));
                m[3].push(Some(r.ops));
                m[4].push(Some(r.reliability));
                m[5].push(Some(r.development));
            }

            HistoricalTeam {
                team: g.key.to_string(),
                years: compress_years(results.iter().map(|r| r.event.season)),
                events: g.n,
                grid_mean: m[0].get(),
                finish_mean: m[1].get(),
                csi_mean: m[2].get(),
                ops: m[3].get(),
                reliability: m[4].get(),
                development: m[5].get(),
                total: round3(g.mean * g.n as f64),
                mean: round3(g.mean),
                shrunk_mean: round3(g.shrunk_mean),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.shrunk_mean
            .total_cmp(&a.shrunk_mean)
            .then_with(|| b.events.cmp(&a.events))
            .then_with(|| a.team.cmp(&b.team))
    });

    History {
        prior: table.prior,
        rows,
    }
}
