//! Aggregated views over the store: event tables, season standings,
//! historical tables and best seasons.

pub mod best;
pub mod event;
pub mod history;
pub mod season;
mod years;

pub use best::{best_seasons_drivers, best_seasons_teams, BestSeasons, Podium};
pub use event::{event_report, EventReport};
pub use history::{driver_history, team_history, HistoricalDriver, HistoricalTeam, History};
pub use season::{season_report, DriverStanding, SeasonReport, TeamStanding};
pub use years::{compress_years, teams_and_years};

use glob::{MatchOptions, Pattern, PatternError};

use crate::scoring::{round3, Component, ComponentSet};

/// Running mean that skips absent values.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.n += 1;
        }
    }

    /// Rounded mean, `None` when nothing was pushed.
    fn get(&self) -> Option<f64> {
        (self.n > 0).then(|| round3(self.sum / self.n as f64))
    }
}

/// Per-component means over the events where each component was present.
#[derive(Debug, Clone, Copy, Default)]
struct ComponentMeans([Mean; 5]);

impl ComponentMeans {
    fn push(&mut self, set: &ComponentSet) {
        for (i, c) in Component::ALL.iter().enumerate() {
            self.0[i].push(set.get(*c));
        }
    }

    fn get(&self) -> ComponentSet {
        let mut out = ComponentSet::default();
        for (i, c) in Component::ALL.iter().enumerate() {
            out.set(*c, self.0[i].get());
        }
        out
    }
}

/// Case-insensitive name filter. A pattern without glob metacharacters
/// matches as a substring.
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: Pattern,
}

impl NameFilter {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let has_meta = pattern.contains(['*', '?', '[']);
        let pattern = if has_meta {
            Pattern::new(pattern)?
        } else {
            Pattern::new(&format!("*{}*", Pattern::escape(pattern)))?
        };
        Ok(Self { pattern })
    }

    pub fn matches(&self, name: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        self.pattern.matches_with(name, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_skips_absent() {
        let mut m = Mean::default();
        assert_eq!(m.get(), None);
        m.push(Some(1.0));
        m.push(None);
        m.push(Some(2.0));
        assert_eq!(m.get(), Some(1.5));
    }

    #[test]
    fn test_component_means() {
        let mut means = ComponentMeans::default();
        means.push(&ComponentSet::new(Some(8.0), Some(6.0), None, None, None));
        means.push(&ComponentSet::new(Some(6.0), None, None, Some(5.0), None));
        let out = means.get();
        assert_eq!(out.rr, Some(7.0));
        assert_eq!(out.qr, Some(6.0));
        assert_eq!(out.td, None);
        assert_eq!(out.oq, Some(5.0));
    }

    #[test]
    fn test_name_filter_substring() {
        let filter = NameFilter::new("verstap").unwrap();
        assert!(filter.matches("Max Verstappen"));
        assert!(!filter.matches("Lewis Hamilton"));
    }

    #[test]
    fn test_name_filter_glob() {
        let filter = NameFilter::new("l*").unwrap();
        assert!(filter.matches("Lando Norris"));
        assert!(filter.matches("lewis hamilton"));
        assert!(!filter.matches("Max Verstappen"));
    }

    #[test]
    fn test_name_filter_invalid() {
        assert!(NameFilter::new("[unclosed").is_err());
    }
}
