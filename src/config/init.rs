use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::Config;

const HEADER: &str = "\
# apex-rating configuration
#
# scoring.weights      nominal component weights; only supplied components count
# scoring.max_penalty  largest penalty subtracted from an event score
# constructor          fixed weights of the constructor event score
# shrinkage            thresholds of the historical empirical-Bayes estimator
# naming.teams         extra team aliases (alias -> canonical name)
";

/// Write the default configuration to `path` (or the default config path).
///
/// Refuses to overwrite an existing file unless `force` is set.
/// Returns the path written.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let path = path.unwrap_or_else(super::get_config_path);

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    ensure_parent(&path)?;

    let body = serde_saphyr::to_string(&Config::default())
        .context("Failed to serialize default config")?;

    let mut file = AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(HEADER.as_bytes())
        .and_then(|_| file.write_all(b"\n"))
        .and_then(|_| file.write_all(body.as_bytes()))
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(path)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_written_default_loads_back() {
        let path = env::temp_dir().join("apex_rating_test_init_config.yaml");
        let _ = fs::remove_file(&path);

        let written = write_default_config(Some(path.clone()), false).unwrap();
        assert_eq!(written, path);

        let loaded = crate::config::load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded, Config::default());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let path = env::temp_dir().join("apex_rating_test_init_exists.yaml");
        fs::write(&path, "{}").unwrap();

        assert!(write_default_config(Some(path.clone()), false).is_err());
        assert!(write_default_config(Some(path.clone()), true).is_ok());

        let _ = fs::remove_file(&path);
    }
}
