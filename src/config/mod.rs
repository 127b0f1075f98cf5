mod init;
mod schema;

pub use init::write_default_config;
pub use schema::{Config, NamingConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/apex-rating/)
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("apex-rating")
}

/// Get the default config file path (~/.config/apex-rating/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path,
///   and a missing default file simply means the default configuration.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file; using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

/// Resolve the store file: command-line flag, then config, then the default.
pub fn resolve_store_path(flag: Option<PathBuf>, config: &Config) -> PathBuf {
    flag.or_else(|| config.store.clone())
        .unwrap_or_else(crate::store::get_store_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_explicit_missing_config_is_error() {
        let path = env::temp_dir().join("apex_rating_test_no_such_config.yaml");
        let _ = fs::remove_file(&path);
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_partial_config() {
        let path = env::temp_dir().join("apex_rating_test_partial_config.yaml");
        fs::write(
            &path,
            r#"
store: /tmp/apex-store.json
scoring:
  max_penalty: 1.5
naming:
  teams:
    "scuderia toro rosso": "Racing Bulls"
"#,
        )
        .unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.store, Some(PathBuf::from("/tmp/apex-store.json")));
        assert_eq!(config.scoring.max_penalty, 1.5);
        assert_eq!(config.scoring.weights.rr, 5.0);
        assert_eq!(config.constructor.merit, 0.6);
        assert_eq!(
            config.naming.teams.get("scuderia toro rosso").map(String::as_str),
            Some("Racing Bulls")
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let path = env::temp_dir().join("apex_rating_test_bad_config.yaml");
        fs::write(&path, "scoring: [unclosed").unwrap();
        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_store_path_precedence() {
        let mut config = Config::default();
        config.store = Some(PathBuf::from("/from/config.json"));

        let flag = Some(PathBuf::from("/from/flag.json"));
        assert_eq!(
            resolve_store_path(flag, &config),
            PathBuf::from("/from/flag.json")
        );
        assert_eq!(
            resolve_store_path(None, &config),
            PathBuf::from("/from/config.json")
        );

        config.store = None;
        assert!(resolve_store_path(None, &config).ends_with("store.json"));
    }
}
