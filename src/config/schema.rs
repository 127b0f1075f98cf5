use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::scoring::{ConstructorWeights, ScoringConfig, ShrinkageConfig};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Store file; defaults to the user data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,
    pub scoring: ScoringConfig,
    pub constructor: ConstructorWeights,
    pub shrinkage: ShrinkageConfig,
    pub naming: NamingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Extra team aliases (alias -> canonical name), on top of the built-in ones
    pub teams: BTreeMap<String, String>,
}
