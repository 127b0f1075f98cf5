//! Store health checks: latest-event validation, summary counts and
//! calendar coverage.

use serde::Serialize;
use std::fmt;

use crate::scoring::MAX_EVENT_POINTS;
use crate::store::{EventRecord, Store};

const TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Ok,
    Fail,
    Info,
}

impl CheckStatus {
    fn from_bool(ok: bool) -> Self {
        if ok {
            CheckStatus::Ok
        } else {
            CheckStatus::Fail
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckStatus::Ok => "OK",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Info => "INFO",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Check {
    pub section: &'static str,
    pub check: String,
    pub status: CheckStatus,
}

impl Check {
    fn new(section: &'static str, check: impl Into<String>, ok: bool) -> Self {
        Self {
            section,
            check: check.into(),
            status: CheckStatus::from_bool(ok),
        }
    }
}

pub fn all_passed(checks: &[Check]) -> bool {
    checks.iter().all(|c| c.status != CheckStatus::Fail)
}

fn in_range(values: impl Iterator<Item = f64>) -> bool {
    let mut any = false;
    for v in values {
        any = true;
        if !(-TOLERANCE..=MAX_EVENT_POINTS + TOLERANCE).contains(&v) {
            return false;
        }
    }
    any
}

/// Sanity checks on the latest event with results.
pub fn validate_latest_event(store: &Store) -> Vec<Check> {
    let mut out = Vec::new();
    let latest = store.latest_event_with_results();
    out.push(Check::new("Latest event", "exists", latest.is_some()));

    let Some(event) = latest else {
        return out;
    };

    out.push(Check {
        section: "Latest event",
        check: format!(
            "{} (season={}, round={})",
            event.name, event.key.season, event.key.round
        ),
        status: CheckStatus::Info,
    });

    let drivers = store.drivers_for(event.key);
    out.push(Check::new("Drivers", "rows > 0", !drivers.is_empty()));
    out.push(Check::new(
        "Drivers",
        "0 <= points <= 10",
        in_range(drivers.iter().map(|d| d.points)),
    ));
    out.push(Check::new(
        "Drivers",
        "driver/team names present",
        drivers
            .iter()
            .all(|d| !d.driver.trim().is_empty() && !d.team.trim().is_empty()),
    ));
    out.push(Check::new(
        "Drivers",
        "CSI finite",
        drivers.iter().all(|d| d.csi.is_finite()),
    ));

    let teams = store.teams_for(event.key);
    out.push(Check::new("Constructors", "rows > 0", !teams.is_empty()));
    if !teams.is_empty() {
        out.push(Check::new(
            "Constructors",
            "0 <= points <= 10",
            in_range(teams.iter().map(|t| t.points)),
        ));
    }

    out
}

/// Counts and the two "latest" events of a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSummary {
    pub events: usize,
    pub driver_rows: usize,
    pub team_rows: usize,
    pub latest_calendar: Option<EventRecord>,
    pub latest_results: Option<EventRecord>,
}

pub fn quick_summary(store: &Store) -> StoreSummary {
    let latest_calendar = store
        .events
        .iter()
        .max_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.key.season.cmp(&b.key.season))
                .then(a.key.round.cmp(&b.key.round))
        })
        .cloned();

    StoreSummary {
        events: store.events.len(),
        driver_rows: store.drivers.len(),
        team_rows: store.teams.len(),
        latest_calendar,
        latest_results: store.latest_event_with_results().cloned(),
    }
}

fn describe(event: &Option<EventRecord>, empty: &str) -> String {
    match event {
        Some(e) => {
            let date = e
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            format!("{} (key={}, date={})", e.name, e.key, date)
        }
        None => empty.to_string(),
    }
}

impl fmt::Display for StoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Events: {} | Driver rows: {} | Constructor rows: {}",
            self.events, self.driver_rows, self.team_rows
        )?;
        writeln!(
            f,
            "Latest on calendar: {}",
            describe(&self.latest_calendar, "(empty)")
        )?;
        write!(
            f,
            "Latest with results: {}",
            describe(&self.latest_results, "(no results)")
        )
    }
}

/// Calendar rounds of one season and which of them have results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonCoverage {
    pub season: i32,
    pub total: usize,
    pub with_results: usize,
    pub missing: Vec<EventRecord>,
}

/// Coverage for every season on the calendar, oldest first.
pub fn coverage_report(store: &Store) -> Vec<SeasonCoverage> {
    let mut seasons = store.seasons();
    seasons.sort_unstable();

    seasons
        .into_iter()
        .map(|season| {
            let events: Vec<&EventRecord> = store
                .events
                .iter()
                .filter(|e| e.key.season == season)
                .collect();
            let missing: Vec<EventRecord> = events
                .iter()
                .filter(|e| !store.has_results(e.key))
                .map(|e| (*e).clone())
                .collect();
            SeasonCoverage {
                season,
                total: events.len(),
                with_results: events.len() - missing.len(),
                missing,
            }
        })
        .collect()
}

/// Plain-text coverage listing.
pub fn format_coverage(coverage: &[SeasonCoverage]) -> String {
    if coverage.is_empty() {
        return "No events recorded.".to_string();
    }

    let mut lines = Vec::new();
    for c in coverage {
        lines.push(format!(
            "{}: total={}, with_results={}, missing={}",
            c.season,
            c.total,
            c.with_results,
            c.missing.len()
        ));
        for e in &c.missing {
            lines.push(format!("  - R{:02} {}", e.key.round, e.name));
        }
    }
    lines.join("\n")
}

/// Aligned `section | check | status` listing.
pub fn format_checks(checks: &[Check]) -> String {
    checks
        .iter()
        .map(|c| format!("{:15} | {:45} | {}", c.section, c.check, c.status))
        .collect::<Vec<_>>()
        .join("\n")
}
