use serde::Serialize;
use std::cmp::Ordering;

use crate::store::{DriverResult, EventKey, EventRecord, Store, TeamResult};

/// One event's driver and constructor tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventReport {
    pub event: EventRecord,
    /// Points descending, then finishing position ascending
    pub drivers: Vec<DriverResult>,
    /// Points descending
    pub teams: Vec<TeamResult>,
}

fn by_finish(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Build the tables for `key`, or for the latest event with results.
///
/// Returns `None` when the event is unknown or nothing has been ingested.
pub fn event_report(store: &Store, key: Option<EventKey>) -> Option<EventReport> {
    let event = match key {
        Some(key) => store.event(key)?,
        None => store.latest_event_with_results()?,
    };

    let mut drivers: Vec<DriverResult> = store
        .drivers_for(event.key)
        .into_iter()
        .cloned()
        .collect();
    drivers.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then_with(|| by_finish(a.finish, b.finish))
            .then_with(|| a.driver.cmp(&b.driver))
    });

    let mut teams: Vec<TeamResult> = store.teams_for(event.key).into_iter().cloned().collect();
    teams.sort_by(|a, b| b.points.total_cmp(&a.points).then_with(|| a.team.cmp(&b.team)));

    Some(EventReport {
        event: event.clone(),
        drivers,
        teams,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ComponentSet;

    fn key(round: u32) -> EventKey {
        EventKey::new(2025, round).unwrap()
    }

    fn row(round: u32, driver: &str, points: f64, finish: Option<u32>) -> DriverResult {
        DriverResult {
            event: key(round),
            driver: driver.to_string(),
            team: "Team".to_string(),
            grid: None,
            finish,
            components: ComponentSet::default(),
            pf: 0.0,
            car_strength: 1.0,
            csi: 0.0,
            points,
        }
    }

    fn store() -> Store {
        let mut store = Store::new();
        for round in 1..=2 {
            store.upsert_event(EventRecord {
                key: key(round),
                name: format!("Round {round}"),
                date: None,
            });
        }
        store.upsert_drivers(vec![
            row(1, "Slow", 4.0, Some(9)),
            row(1, "Tied late", 7.0, Some(5)),
            row(1, "Tied early", 7.0, Some(2)),
            row(1, "Retired", 7.0, None),
        ]);
        store
    }

    #[test]
    fn test_driver_ordering() {
        let report = event_report(&store(), Some(key(1))).unwrap();
        let names: Vec<&str> = report.drivers.iter().map(|d| d.driver.as_str()).collect();
        assert_eq!(names, vec!["Tied early", "Tied late", "Retired", "Slow"]);
    }

    #[test]
    fn test_defaults_to_latest_with_results() {
        // Round 2 is on the calendar without results
        let report = event_report(&store(), None).unwrap();
        assert_eq!(report.event.key, key(1));
    }

    #[test]
    fn test_unknown_event() {
        assert!(event_report(&store(), Some(key(7))).is_none());
        assert!(event_report(&Store::new(), None).is_none());
    }

    #[test]
    fn test_calendar_event_without_results_is_empty() {
        let report = event_report(&store(), Some(key(2))).unwrap();
        assert!(report.drivers.is_empty());
        assert!(report.teams.is_empty());
    }
}
