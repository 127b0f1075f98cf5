//! Season accumulation.
//!
//! Per-event scores are summed round by round per participant, and each
//! prefix of the sum is rescaled onto 0-100 against the best possible
//! total for the rounds counted so far (10 points per round).

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::ScoreError;
use crate::scoring::{round3, MAX_EVENT_POINTS};

/// One participant's score in one round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundScore {
    pub round: u32,
    pub points: f64,
}

/// Cumulative state after a round has been counted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonPoint {
    pub round: u32,
    pub points: f64,
    pub cumulative: f64,
    /// Rounds included in `cumulative`
    pub rounds_counted: u32,
    /// `100 * cumulative / (10 * rounds_counted)`
    pub scaled: f64,
}

/// Rescale a cumulative total onto 0-100 for `rounds` counted rounds.
/// Zero rounds scale to 0.
pub fn scale_to_100(cumulative: f64, rounds: u32) -> f64 {
    if rounds == 0 {
        return 0.0;
    }
    round3(100.0 * cumulative / (MAX_EVENT_POINTS * rounds as f64))
}

/// Accumulate one participant's rounds, which must be strictly increasing.
///
/// The denominator of every prefix is the number of rounds in that prefix,
/// so a participant who joined late is compared over the rounds they ran.
pub fn accumulate(rounds: &[RoundScore]) -> Result<Vec<SeasonPoint>, ScoreError> {
    let mut out = Vec::with_capacity(rounds.len());
    let mut running = 0.0;
    let mut previous: Option<u32> = None;

    for (i, r) in rounds.iter().enumerate() {
        if let Some(prev) = previous {
            if r.round <= prev {
                return Err(ScoreError::RoundOrder {
                    previous: prev,
                    next: r.round,
                });
            }
        }
        previous = Some(r.round);

        running += r.points;
        let counted = (i + 1) as u32;
        out.push(SeasonPoint {
            round: r.round,
            points: r.points,
            cumulative: round3(running),
            rounds_counted: counted,
            scaled: scale_to_100(running, counted),
        });
    }

    Ok(out)
}

/// A participant's season: the per-round accumulation curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonTimeline<K> {
    pub participant: K,
    pub points: Vec<SeasonPoint>,
}

impl<K> SeasonTimeline<K> {
    pub fn total(&self) -> f64 {
        self.points.last().map(|p| p.cumulative).unwrap_or(0.0)
    }

    /// Final rescaled value; only meaningful once the season is complete.
    pub fn scaled(&self) -> f64 {
        self.points.last().map(|p| p.scaled).unwrap_or(0.0)
    }

    pub fn rounds_counted(&self) -> u32 {
        self.points.last().map(|p| p.rounds_counted).unwrap_or(0)
    }

    /// Total rescaled against the whole season's round count instead of
    /// the rounds this participant ran.
    pub fn season_cap(&self, season_rounds: u32) -> f64 {
        scale_to_100(self.total(), season_rounds)
    }

    pub fn at_round(&self, round: u32) -> Option<&SeasonPoint> {
        self.points.iter().find(|p| p.round == round)
    }
}

/// Groups `(participant, round, points)` rows and accumulates each group.
///
/// Rows may arrive in any order; each participant's rounds are sorted
/// before accumulation. A participant scored twice in the same round is
/// rejected.
#[derive(Debug, Clone)]
pub struct SeasonAccumulator<K> {
    rows: BTreeMap<K, Vec<RoundScore>>,
}

impl<K: Ord + Clone> Default for SeasonAccumulator<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone> SeasonAccumulator<K> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, participant: K, round: u32, points: f64) {
        self.rows
            .entry(participant)
            .or_default()
            .push(RoundScore { round, points });
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Accumulate every participant. Output is ordered by participant key.
    pub fn finish(self) -> Result<Vec<SeasonTimeline<K>>, ScoreError> {
        self.rows
            .into_iter()
            .map(|(participant, mut rounds)| {
                rounds.sort_by_key(|r| r.round);
                Ok(SeasonTimeline {
                    participant,
                    points: accumulate(&rounds)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rounds(pairs: &[(u32, f64)]) -> Vec<RoundScore> {
        pairs
            .iter()
            .map(|&(round, points)| RoundScore { round, points })
            .collect()
    }

    #[test]
    fn test_two_perfect_rounds() {
        let curve = accumulate(&rounds(&[(1, 10.0), (2, 10.0)])).unwrap();
        assert_eq!(curve[1].cumulative, 20.0);
        assert_eq!(curve[1].rounds_counted, 2);
        assert_eq!(curve[1].scaled, 100.0);
    }

    #[test]
    fn test_uneven_rounds() {
        let curve = accumulate(&rounds(&[(1, 5.0), (2, 0.0), (3, 5.0)])).unwrap();
        assert_eq!(curve[0].scaled, 50.0);
        assert_eq!(curve[1].scaled, 25.0);
        assert_eq!(curve[2].cumulative, 10.0);
        assert_eq!(curve[2].scaled, 33.333);
    }

    #[test]
    fn test_denominator_tracks_prefix_length() {
        let curve = accumulate(&rounds(&[(1, 8.0), (2, 6.0), (3, 7.0), (4, 9.0)])).unwrap();
        let counted: Vec<u32> = curve.iter().map(|p| p.rounds_counted).collect();
        assert_eq!(counted, vec![1, 2, 3, 4]);
        assert_eq!(curve[1].scaled, 70.0);
        assert_eq!(curve[3].scaled, 75.0);
    }

    #[test]
    fn test_late_starter_counts_own_rounds() {
        // Joined at round 4: denominator is rounds run, not the round number
        let curve = accumulate(&rounds(&[(4, 6.0), (5, 8.0)])).unwrap();
        assert_eq!(curve[0].rounds_counted, 1);
        assert_eq!(curve[0].scaled, 60.0);
        assert_eq!(curve[1].scaled, 70.0);
    }

    #[test]
    fn test_out_of_order_rejected() {
        let err = accumulate(&rounds(&[(2, 5.0), (1, 5.0)])).unwrap_err();
        assert_eq!(
            err,
            ScoreError::RoundOrder {
                previous: 2,
                next: 1
            }
        );
    }

    #[test]
    fn test_duplicate_round_rejected() {
        assert!(accumulate(&rounds(&[(1, 5.0), (1, 6.0)])).is_err());
    }

    #[test]
    fn test_empty_sequence() {
        assert!(accumulate(&[]).unwrap().is_empty());
        assert_eq!(scale_to_100(0.0, 0), 0.0);
    }

    #[test]
    fn test_accumulator_groups_and_sorts() {
        let mut acc = SeasonAccumulator::new();
        acc.push("B".to_string(), 2, 4.0);
        acc.push("A".to_string(), 2, 6.0);
        acc.push("A".to_string(), 1, 8.0);
        acc.push("B".to_string(), 1, 2.0);

        let timelines = acc.finish().unwrap();
        assert_eq!(timelines.len(), 2);
        assert_eq!(timelines[0].participant, "A");
        assert_eq!(timelines[0].points[0].round, 1);
        assert_eq!(timelines[0].total(), 14.0);
        assert_eq!(timelines[0].scaled(), 70.0);
        assert_eq!(timelines[1].total(), 6.0);
        assert_eq!(timelines[1].scaled(), 30.0);
    }

    #[test]
    fn test_accumulator_duplicate_round_fails() {
        let mut acc = SeasonAccumulator::new();
        acc.push(1u32, 3, 4.0);
        acc.push(1u32, 3, 5.0);
        assert!(acc.finish().is_err());
    }

    #[test]
    fn test_season_cap_uses_full_season() {
        let timeline = SeasonTimeline {
            participant: "late",
            points: accumulate(&rounds(&[(3, 9.0), (4, 9.0)])).unwrap(),
        };
        assert_eq!(timeline.scaled(), 90.0);
        assert_eq!(timeline.season_cap(4), 45.0);
        assert_eq!(timeline.at_round(4).map(|p| p.cumulative), Some(18.0));
        assert!(timeline.at_round(1).is_none());
    }
}
