//! Empirical-Bayes shrinkage of per-group means.
//!
//! The pooling strength `k` is a method-of-moments estimate,
//! `var_within / var_between`, computed once over the whole population.
//! Each group mean is then blended with the population mean using the
//! weight `n / (n + k)`: small groups move toward the population mean,
//! large groups barely move.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::scoring::ShrinkageConfig;

/// Pooling strength and population mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShrinkagePrior {
    pub k: f64,
    pub mu: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEstimate<K> {
    pub key: K,
    pub n: usize,
    pub mean: f64,
    /// `n / (n + k)`
    pub weight: f64,
    pub shrunk_mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShrinkageTable<K> {
    pub prior: ShrinkagePrior,
    pub groups: Vec<GroupEstimate<K>>,
}

impl<K: PartialEq> ShrinkageTable<K> {
    pub fn get(&self, key: &K) -> Option<&GroupEstimate<K>> {
        self.groups.iter().find(|g| &g.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Per-group sufficient statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GroupStats {
    n: usize,
    mean: f64,
    /// Sample variance with n - 1 degrees of freedom; 0 when n <= 1
    var: f64,
}

fn group_stats(values: &[f64]) -> GroupStats {
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = if n > 1 {
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };
    GroupStats { n, mean, var }
}

/// Group values by key, dropping non-finite values.
fn collect_groups<K, I>(observations: I) -> BTreeMap<K, Vec<f64>>
where
    K: Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    let mut dropped = 0usize;
    for (key, value) in observations {
        if value.is_finite() {
            groups.entry(key).or_default().push(value);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        debug!(dropped, "ignoring non-finite observations");
    }
    groups
}

fn prior_from_stats(stats: &[GroupStats], config: &ShrinkageConfig) -> ShrinkagePrior {
    let n_total: usize = stats.iter().map(|s| s.n).sum();
    let g_count = stats.len();

    if n_total == 0 {
        return ShrinkagePrior {
            k: config.fallback_k,
            mu: 0.0,
        };
    }

    let mu = stats.iter().map(|s| s.mean * s.n as f64).sum::<f64>() / n_total as f64;

    if n_total <= g_count {
        debug!(n_total, g_count, "too few observations per group; using fallback k");
        return ShrinkagePrior {
            k: config.fallback_k,
            mu,
        };
    }

    let var_between = stats
        .iter()
        .map(|s| s.n as f64 * (s.mean - mu).powi(2))
        .sum::<f64>()
        / (n_total - 1).max(1) as f64;
    let var_within = stats
        .iter()
        .map(|s| s.n.saturating_sub(1) as f64 * s.var)
        .sum::<f64>()
        / (n_total - g_count).max(1) as f64;

    if var_between <= config.variance_threshold {
        debug!(var_between, "group means indistinguishable; using fallback k");
        return ShrinkagePrior {
            k: config.fallback_k,
            mu,
        };
    }

    let k = (var_within / var_between).max(config.min_k);
    debug!(k, mu, var_within, var_between, "estimated shrinkage prior");
    ShrinkagePrior { k, mu }
}

/// Estimate the pooling strength `k` and population mean `mu`.
///
/// Empty input yields `(fallback_k, 0)`. When there are no more
/// observations than groups, or the group means do not vary, `k` falls
/// back to `fallback_k` with `mu` the population mean.
pub fn estimate_prior<K, I>(observations: I, config: &ShrinkageConfig) -> ShrinkagePrior
where
    K: Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    let stats: Vec<GroupStats> = collect_groups(observations)
        .values()
        .map(|v| group_stats(v))
        .collect();
    prior_from_stats(&stats, config)
}

/// Shrink every group's mean toward the population mean.
///
/// Groups are returned in key order. Empty input returns the fallback prior
/// and no groups.
pub fn shrink_means<K, I>(observations: I, config: &ShrinkageConfig) -> ShrinkageTable<K>
where
    K: Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    let groups = collect_groups(observations);
    let stats: Vec<(K, GroupStats)> = groups
        .into_iter()
        .map(|(key, values)| {
            let s = group_stats(&values);
            (key, s)
        })
        .collect();

    let only_stats: Vec<GroupStats> = stats.iter().map(|(_, s)| *s).collect();
    let prior = prior_from_stats(&only_stats, config);

    let groups = stats
        .into_iter()
        .map(|(key, s)| {
            let weight = s.n as f64 / (s.n as f64 + prior.k);
            GroupEstimate {
                key,
                n: s.n,
                mean: s.mean,
                weight,
                shrunk_mean: weight * s.mean + (1.0 - weight) * prior.mu,
            }
        })
        .collect();

    ShrinkageTable { prior, groups }
}
