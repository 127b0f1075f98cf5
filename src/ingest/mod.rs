//! Event ingestion: read event files, score every row and upsert the store.

pub mod naming;

pub use naming::{clean_name, TeamNames};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ScoreError;
use crate::scoring::{
    calculate_csi, calculate_points, constructor_points, mean_csi, ComponentSet,
    ConstructorInputs,
};
use crate::store::{DriverResult, EventKey, EventRecord, Store, TeamResult};

fn default_car_strength() -> f64 {
    1.0
}

/// One driver's raw inputs at one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverInput {
    pub driver: String,
    pub team: String,
    #[serde(default)]
    pub grid: Option<u32>,
    #[serde(default)]
    pub finish: Option<u32>,
    #[serde(flatten)]
    pub components: ComponentSet,
    #[serde(default)]
    pub pf: f64,
    #[serde(default = "default_car_strength")]
    pub car_strength: f64,
}

/// Team-level metrics for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInput {
    pub team: String,
    #[serde(default)]
    pub ops: Option<f64>,
    #[serde(default)]
    pub reliability: Option<f64>,
    #[serde(default)]
    pub development: Option<f64>,
}

/// One event as it appears in an input file.
///
/// `teams` may be omitted for driver-only events; when it is present every
/// team with drivers needs a complete entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    pub season: i32,
    pub round: u32,
    pub name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub drivers: Vec<DriverInput>,
    #[serde(default)]
    pub teams: Vec<TeamInput>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EventFile {
    Many(Vec<EventInput>),
    One(Box<EventInput>),
}

/// A scored event, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEvent {
    pub record: EventRecord,
    pub drivers: Vec<DriverResult>,
    pub teams: Vec<TeamResult>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub events: usize,
    pub drivers: usize,
    pub teams: usize,
}

/// Parse an event file holding either one event object or a list of them.
pub fn read_event_file(path: &Path) -> Result<Vec<EventInput>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file at {}", path.display()))?;
    let parsed: EventFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse event file {}", path.display()))?;
    Ok(match parsed {
        EventFile::Many(events) => events,
        EventFile::One(event) => vec![*event],
    })
}

fn mean_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn ensure_finite(key: EventKey, who: &str, field: &str, value: f64) -> Result<f64, ScoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoreError::InvalidEvent(format!(
            "{key}: {field} for '{who}' is not a finite number"
        )))
    }
}

/// Score every driver and constructor of one event.
pub fn score_event(
    input: &EventInput,
    config: &Config,
    names: &TeamNames,
) -> Result<ScoredEvent, ScoreError> {
    let key = EventKey::new(input.season, input.round)?;
    let name = clean_name(&input.name);
    if name.is_empty() {
        return Err(ScoreError::InvalidEvent(format!("{key}: event name is empty")));
    }

    let mut seen = BTreeSet::new();
    let mut drivers = Vec::with_capacity(input.drivers.len());
    for d in &input.drivers {
        let driver = clean_name(&d.driver);
        let team = names.canonical(&d.team);
        if driver.is_empty() || team.is_empty() {
            return Err(ScoreError::InvalidEvent(format!(
                "{key}: driver rows need a driver and a team name"
            )));
        }
        if !seen.insert(driver.clone()) {
            return Err(ScoreError::InvalidEvent(format!(
                "{key}: driver '{driver}' listed twice"
            )));
        }

        for (component, value) in d.components.present() {
            ensure_finite(key, &driver, component.label(), value)?;
        }
        ensure_finite(key, &driver, "pf", d.pf)?;
        ensure_finite(key, &driver, "car_strength", d.car_strength)?;

        let points = calculate_points(&d.components, d.pf, &config.scoring).points;
        let csi = calculate_csi(&d.components, d.car_strength, &config.scoring);
        ensure_finite(key, &driver, "csi", csi)?;
        drivers.push(DriverResult {
            event: key,
            driver,
            team,
            grid: d.grid,
            finish: d.finish,
            components: d.components,
            pf: d.pf,
            car_strength: d.car_strength,
            csi,
            points,
        });
    }

    let mut metrics: BTreeMap<String, &TeamInput> = BTreeMap::new();
    for t in &input.teams {
        let team = names.canonical(&t.team);
        for (field, value) in [
            ("ops", t.ops),
            ("reliability", t.reliability),
            ("development", t.development),
        ] {
            if let Some(v) = value {
                ensure_finite(key, &team, field, v)?;
            }
        }
        if metrics.insert(team.clone(), t).is_some() {
            return Err(ScoreError::InvalidEvent(format!(
                "{key}: team '{team}' listed twice"
            )));
        }
    }

    let mut by_team: BTreeMap<&str, Vec<&DriverResult>> = BTreeMap::new();
    for d in &drivers {
        by_team.entry(d.team.as_str()).or_default().push(d);
    }

    for team in metrics.keys() {
        if !by_team.contains_key(team.as_str()) {
            warn!(event = %key, team = %team, "team metrics without drivers; skipping");
        }
    }

    let mut teams = Vec::new();
    if metrics.is_empty() {
        debug!(event = %key, "no team metrics; constructor scores not computed");
    } else {
        for (team, rows) in &by_team {
            let csi_values: Vec<f64> = rows.iter().map(|r| r.csi).collect();
            let merit = mean_csi(&csi_values);
            let m = metrics.get(*team);
            let inputs = ConstructorInputs {
                merit,
                ops: m.and_then(|m| m.ops),
                reliability: m.and_then(|m| m.reliability),
                development: m.and_then(|m| m.development),
            };
            let points = constructor_points(&inputs, &config.constructor).map_err(|e| {
                warn!(event = %key, team = %team, error = %e, "constructor score rejected");
                e
            })?;
            let points = ensure_finite(key, team, "constructor points", points)?;

            teams.push(TeamResult {
                event: key,
                team: team.to_string(),
                grid_mean: mean_of(rows.iter().filter_map(|r| r.grid.map(f64::from))),
                finish_mean: mean_of(rows.iter().filter_map(|r| r.finish.map(f64::from))),
                csi_mean: merit.unwrap_or_default(),
                ops: inputs.ops.unwrap_or_default(),
                reliability: inputs.reliability.unwrap_or_default(),
                development: inputs.development.unwrap_or_default(),
                points,
            });
        }
    }

    Ok(ScoredEvent {
        record: EventRecord {
            key,
            name,
            date: input.date,
        },
        drivers,
        teams,
    })
}

/// Score and upsert a batch of events.
///
/// Every event is scored before anything is written, so a rejected event
/// leaves the store untouched.
pub fn ingest_events(
    store: &mut Store,
    events: &[EventInput],
    config: &Config,
) -> Result<IngestSummary> {
    let names = TeamNames::from_config(&config.naming);

    let scored = events
        .iter()
        .map(|e| {
            score_event(e, config, &names)
                .with_context(|| format!("Failed to score event {} round {}", e.season, e.round))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut summary = IngestSummary::default();
    for event in scored {
        debug!(
            event = %event.record.key,
            drivers = event.drivers.len(),
            teams = event.teams.len(),
            "upserting event"
        );
        summary.events += 1;
        summary.drivers += event.drivers.len();
        summary.teams += event.teams.len();
        store.upsert_event(event.record);
        store.upsert_drivers(event.drivers);
        store.upsert_teams(event.teams);
    }

    info!(
        events = summary.events,
        drivers = summary.drivers,
        teams = summary.teams,
        "ingested events"
    );
    Ok(summary)
}
