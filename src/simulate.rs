//! Deterministic demo seasons.
//!
//! A fixed 20-driver, 10-team field. The finishing order rotates by one
//! place per round, components are a linear function of finishing
//! position, and team metrics follow from a fixed car-strength table.

use chrono::{Days, NaiveDate};

use crate::ingest::{DriverInput, EventInput, TeamInput};
use crate::scoring::ComponentSet;

const FIELD: [(&str, &str); 20] = [
    ("Max Verstappen", "Red Bull Racing"),
    ("Sergio Pérez", "Red Bull Racing"),
    ("Lewis Hamilton", "Mercedes"),
    ("George Russell", "Mercedes"),
    ("Fernando Alonso", "Aston Martin"),
    ("Lance Stroll", "Aston Martin"),
    ("Charles Leclerc", "Ferrari"),
    ("Carlos Sainz", "Ferrari"),
    ("Lando Norris", "McLaren"),
    ("Oscar Piastri", "McLaren"),
    ("Esteban Ocon", "Alpine"),
    ("Pierre Gasly", "Alpine"),
    ("Valtteri Bottas", "Sauber"),
    ("Zhou Guanyu", "Sauber"),
    ("Yuki Tsunoda", "RB"),
    ("Daniel Ricciardo", "RB"),
    ("Kevin Magnussen", "Haas"),
    ("Nico Hulkenberg", "Haas"),
    ("Alexander Albon", "Williams"),
    ("Logan Sargeant", "Williams"),
];

const TEAM_STRENGTH: [(&str, f64); 10] = [
    ("Red Bull Racing", 1.18),
    ("Mercedes", 1.10),
    ("Ferrari", 1.08),
    ("McLaren", 1.06),
    ("Aston Martin", 1.02),
    ("Alpine", 0.98),
    ("Sauber", 0.94),
    ("RB", 0.96),
    ("Haas", 0.92),
    ("Williams", 0.90),
];

pub const DEFAULT_ROUNDS: u32 = 8;

/// Days between simulated rounds.
const ROUND_SPACING: u64 = 14;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn strength(team: &str) -> f64 {
    TEAM_STRENGTH
        .iter()
        .find(|(t, _)| *t == team)
        .map(|(_, s)| *s)
        .unwrap_or(1.0)
}

fn team_metrics(team: &str) -> TeamInput {
    let s = strength(team) - 1.0;
    TeamInput {
        team: team.to_string(),
        ops: Some(round2(7.5 + s * 10.0)),
        reliability: Some(round2(7.0 + s * 8.0)),
        development: Some(round2(6.8 + s * 12.0)),
    }
}

/// Components of the driver finishing in `pos` (1-based) at round `round`.
///
/// OQ exists only for the top 12; WA only every fifth round.
pub fn components_for_position(pos: u32, round: u32) -> ComponentSet {
    let p = pos as f64;
    let rr = (10.0 - 0.35 * (p - 1.0)).max(0.0);
    let qr = (10.0 - 0.30 * ((pos + 2) % 20) as f64).max(0.0);
    let td = (9.0 - 0.25 * (p - 1.0)).max(0.0);
    let oq = (pos <= 12).then(|| round2(8.5 - 0.4 * (p - 1.0)));
    let wa = (round % 5 == 0).then(|| round2(7.0 - 0.3 * (p - 1.0)));
    ComponentSet::new(Some(round2(rr)), Some(round2(qr)), Some(round2(td)), oq, wa)
}

/// One simulated event.
pub fn simulate_event(season: i32, round: u32) -> EventInput {
    let shift = (round.saturating_sub(1) as usize) % FIELD.len();

    let drivers = (0..FIELD.len())
        .map(|i| FIELD[(i + shift) % FIELD.len()])
        .enumerate()
        .map(|(i, (driver, team))| {
            let pos = i as u32 + 1;
            DriverInput {
                driver: driver.to_string(),
                team: team.to_string(),
                grid: Some(pos),
                finish: Some(pos),
                components: components_for_position(pos, round),
                pf: 0.0,
                car_strength: strength(team),
            }
        })
        .collect();

    let teams = TEAM_STRENGTH.iter().map(|(t, _)| team_metrics(t)).collect();

    let date = NaiveDate::from_ymd_opt(season, 3, 1).and_then(|start| {
        start.checked_add_days(Days::new(ROUND_SPACING * u64::from(round.saturating_sub(1))))
    });

    EventInput {
        season,
        round,
        name: format!("{season} Simulated Grand Prix (R{round})"),
        date,
        drivers,
        teams,
    }
}

/// Rounds `1..=rounds` of a simulated season.
pub fn simulate_season(season: i32, rounds: u32) -> Vec<EventInput> {
    (1..=rounds).map(|r| simulate_event(season, r)).collect()
}
