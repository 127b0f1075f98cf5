use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScoreError;
use crate::scoring::ComponentSet;

pub const STORE_VERSION: u32 = 1;

/// Identifies an event: season year plus a positive round number.
/// Serialised as `"<season>_<round:02>"`, e.g. `"2025_03"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventKey {
    pub season: i32,
    pub round: u32,
}

impl EventKey {
    pub fn new(season: i32, round: u32) -> Result<Self, ScoreError> {
        if round == 0 {
            return Err(ScoreError::InvalidEvent(format!(
                "season {}: round numbers start at 1",
                season
            )));
        }
        Ok(Self { season, round })
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{:02}", self.season, self.round)
    }
}

impl FromStr for EventKey {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScoreError::InvalidEvent(format!("malformed event key '{}'", s));
        let (season, round) = s.trim().split_once('_').ok_or_else(invalid)?;
        let season: i32 = season.parse().map_err(|_| invalid())?;
        let round: u32 = round.parse().map_err(|_| invalid())?;
        EventKey::new(season, round)
    }
}

impl TryFrom<String> for EventKey {
    type Error = ScoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EventKey> for String {
    fn from(key: EventKey) -> Self {
        key.to_string()
    }
}

/// A calendar entry. An event may exist without results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub key: EventKey,
    pub name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// One driver's scored result at one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverResult {
    pub event: EventKey,
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
    pub car_strength: f64,
    pub csi: f64,
    pub points: f64,
}

/// One constructor's scored result at one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResult {
    pub event: EventKey,
    pub team: String,
    #[serde(default)]
    pub grid_mean: Option<f64>,
    #[serde(default)]
    pub finish_mean: Option<f64>,
    pub csi_mean: f64,
    pub ops: f64,
    pub reliability: f64,
    pub development: f64,
    pub points: f64,
}

/// Everything persisted: calendar plus per-event driver and team rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub version: u32,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub drivers: Vec<DriverResult>,
    #[serde(default)]
    pub teams: Vec<TeamResult>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            version: STORE_VERSION,
            events: Vec::new(),
            drivers: Vec::new(),
            teams: Vec::new(),
        }
    }

    /// Insert or replace a calendar entry. Events stay sorted by key.
    pub fn upsert_event(&mut self, event: EventRecord) {
        self.events.retain(|e| e.key != event.key);
        self.events.push(event);
        self.events.sort_by_key(|e| e.key);
    }

    /// Insert or replace driver rows, keyed by `(event, driver)`.
    pub fn upsert_drivers(&mut self, rows: Vec<DriverResult>) {
        for row in rows {
            self.drivers
                .retain(|r| !(r.event == row.event && r.driver == row.driver));
            self.drivers.push(row);
        }
    }

    /// Insert or replace team rows, keyed by `(event, team)`.
    pub fn upsert_teams(&mut self, rows: Vec<TeamResult>) {
        for row in rows {
            self.teams
                .retain(|r| !(r.event == row.event && r.team == row.team));
            self.teams.push(row);
        }
    }

    pub fn event(&self, key: EventKey) -> Option<&EventRecord> {
        self.events.iter().find(|e| e.key == key)
    }

    pub fn has_results(&self, key: EventKey) -> bool {
        self.drivers.iter().any(|r| r.event == key)
    }

    /// Seasons on the calendar, most recent first.
    pub fn seasons(&self) -> Vec<i32> {
        let mut seasons: Vec<i32> = self.events.iter().map(|e| e.key.season).collect();
        seasons.sort_unstable_by(|a, b| b.cmp(a));
        seasons.dedup();
        seasons
    }

    /// Calendar rounds of a season, ascending.
    pub fn rounds(&self, season: i32) -> Vec<u32> {
        self.events
            .iter()
            .filter(|e| e.key.season == season)
            .map(|e| e.key.round)
            .collect()
    }

    /// Latest event with driver results, by date, then season, then round.
    pub fn latest_event_with_results(&self) -> Option<&EventRecord> {
        self.events
            .iter()
            .filter(|e| self.has_results(e.key))
            .max_by(|a, b| {
                a.date
                    .cmp(&b.date)
                    .then(a.key.season.cmp(&b.key.season))
                    .then(a.key.round.cmp(&b.key.round))
            })
    }

    pub fn drivers_for(&self, key: EventKey) -> Vec<&DriverResult> {
        self.drivers.iter().filter(|r| r.event == key).collect()
    }

    pub fn teams_for(&self, key: EventKey) -> Vec<&TeamResult> {
        self.teams.iter().filter(|r| r.event == key).collect()
    }

    pub fn season_drivers(&self, season: i32) -> Vec<&DriverResult> {
        self.drivers
            .iter()
            .filter(|r| r.event.season == season)
            .collect()
    }

    pub fn season_teams(&self, season: i32) -> Vec<&TeamResult> {
        self.teams.iter().filter(|r| r.event.season == season).collect()
    }
}
