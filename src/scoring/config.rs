use serde::{Deserialize, Serialize};

use super::components::Component;

/// Per-event scoring configuration.
///
/// Every field is optional in YAML and falls back to the standard formula.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   weights: { rr: 5, qr: 2, td: 1.5, oq: 1, wa: 0.5 }
///   max_penalty: 2
///   car_strength_floor: 0.000001
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Nominal weight of each component
    pub weights: ComponentWeights,

    /// Largest penalty that can be subtracted from an event score
    pub max_penalty: f64,

    /// Lower bound applied to car strength before it is used as a divisor
    pub car_strength_floor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ComponentWeights::default(),
            max_penalty: 2.0,
            car_strength_floor: 1e-6,
        }
    }
}

/// Nominal component weights. Only the weights of supplied components are
/// used when a score is normalised.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ComponentWeights {
    pub rr: f64,
    pub qr: f64,
    pub td: f64,
    pub oq: f64,
    pub wa: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            rr: 5.0,
            qr: 2.0,
            td: 1.5,
            oq: 1.0,
            wa: 0.5,
        }
    }
}

impl ComponentWeights {
    pub fn weight(&self, component: Component) -> f64 {
        match component {
            Component::Rr => self.rr,
            Component::Qr => self.qr,
            Component::Td => self.td,
            Component::Oq => self.oq,
            Component::Wa => self.wa,
        }
    }
}

/// Fixed weights of the constructor event score.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConstructorWeights {
    /// Weight of the team's mean driver CSI
    pub merit: f64,
    pub ops: f64,
    pub reliability: f64,
    pub development: f64,
}

impl Default for ConstructorWeights {
    fn default() -> Self {
        Self {
            merit: 0.6,
            ops: 0.2,
            reliability: 0.1,
            development: 0.1,
        }
    }
}

/// Thresholds of the empirical-Bayes estimator.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ShrinkageConfig {
    /// Between-group variance at or below this is treated as zero
    pub variance_threshold: f64,
    /// Smallest pooling strength produced from the variance ratio
    pub min_k: f64,
    /// Pooling strength used whenever the variances cannot be estimated
    pub fallback_k: f64,
}

impl Default for ShrinkageConfig {
    fn default() -> Self {
        Self {
            variance_threshold: 1e-12,
            min_k: 1e-6,
            fallback_k: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.weights.rr, 5.0);
        assert_eq!(config.weights.qr, 2.0);
        assert_eq!(config.weights.td, 1.5);
        assert_eq!(config.weights.oq, 1.0);
        assert_eq!(config.weights.wa, 0.5);
        assert_eq!(config.max_penalty, 2.0);
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
max_penalty: 3
weights:
  rr: 6
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.max_penalty, 3.0);
        assert_eq!(config.weights.rr, 6.0);
        // Unspecified weights keep their defaults
        assert_eq!(config.weights.qr, 2.0);
        assert_eq!(config.car_strength_floor, 1e-6);
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str("base_score: 100");
        assert!(result.is_err());
    }

    #[test]
    fn test_weight_lookup() {
        let weights = ComponentWeights::default();
        let total: f64 = Component::ALL.iter().map(|c| weights.weight(*c)).sum();
        assert_eq!(total, 10.0);
    }

    #[test]
    fn test_constructor_weights_sum_to_one() {
        let w = ConstructorWeights::default();
        assert!((w.merit + w.ops + w.reliability + w.development - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shrinkage_config_parse() {
        let yaml = "fallback_k: 2.5";
        let config: ShrinkageConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.fallback_k, 2.5);
        assert_eq!(config.min_k, 1e-6);
    }
}
