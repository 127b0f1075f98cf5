use super::components::Component;
use super::config::{ConstructorWeights, ScoringConfig, ShrinkageConfig};

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(
    scoring: &ScoringConfig,
    constructor: &ConstructorWeights,
    shrinkage: &ShrinkageConfig,
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Component weights must all be positive
    for component in Component::ALL {
        let w = scoring.weights.weight(component);
        if !w.is_finite() || w <= 0.0 {
            errors.push(format!(
                "scoring.weights.{}: must be a positive number, got {}",
                component.label().to_lowercase(),
                w
            ));
        }
    }

    if !(0.0..=10.0).contains(&scoring.max_penalty) {
        errors.push(format!(
            "scoring.max_penalty: must be within [0, 10], got {}",
            scoring.max_penalty
        ));
    }

    if !(scoring.car_strength_floor > 0.0) {
        errors.push(format!(
            "scoring.car_strength_floor: must be positive, got {}",
            scoring.car_strength_floor
        ));
    }

    // Constructor weights
    for (name, w) in [
        ("merit", constructor.merit),
        ("ops", constructor.ops),
        ("reliability", constructor.reliability),
        ("development", constructor.development),
    ] {
        if !w.is_finite() || w < 0.0 {
            errors.push(format!(
                "constructor.{}: must be a non-negative number, got {}",
                name, w
            ));
        }
    }

    // Shrinkage thresholds
    for (name, v) in [
        ("variance_threshold", shrinkage.variance_threshold),
        ("min_k", shrinkage.min_k),
        ("fallback_k", shrinkage.fallback_k),
    ] {
        if !(v > 0.0) || !v.is_finite() {
            errors.push(format!("shrinkage.{}: must be positive, got {}", name, v));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(scoring: &ScoringConfig) -> Result<(), Vec<String>> {
        validate_scoring(
            scoring,
            &ConstructorWeights::default(),
            &ShrinkageConfig::default(),
        )
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_negative_weight() {
        let mut config = ScoringConfig::default();
        config.weights.oq = -1.0;
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.weights.oq"));
    }

    #[test]
    fn test_zero_weight_rejected() {
        let mut config = ScoringConfig::default();
        config.weights.wa = 0.0;
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.weights.wa"));
    }

    #[test]
    fn test_max_penalty_out_of_range() {
        let mut config = ScoringConfig::default();
        config.max_penalty = -1.0;
        let errors = validate(&config).unwrap_err();
        assert!(errors[0].contains("max_penalty"));
    }

    #[test]
    fn test_zero_floor_rejected() {
        let mut config = ScoringConfig::default();
        config.car_strength_floor = 0.0;
        let errors = validate(&config).unwrap_err();
        assert!(errors[0].contains("car_strength_floor"));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ScoringConfig::default();
        config.weights.rr = f64::NAN;
        config.max_penalty = 50.0;
        let constructor = ConstructorWeights {
            ops: -0.2,
            ..ConstructorWeights::default()
        };
        let shrinkage = ShrinkageConfig {
            fallback_k: 0.0,
            ..ShrinkageConfig::default()
        };
        let errors = validate_scoring(&config, &constructor, &shrinkage).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("scoring.weights.rr")));
        assert!(errors.iter().any(|e| e.contains("constructor.ops")));
        assert!(errors.iter().any(|e| e.contains("shrinkage.fallback_k")));
    }
}
