use super::types::{Store, STORE_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the default store path (~/.local/share/apex-rating/store.json on Linux)
pub fn get_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("apex-rating"))
        .unwrap_or_else(crate::config::get_config_dir)
        .join("store.json")
}

/// Load the store from a JSON file
///
/// If the file doesn't exist, returns a new empty store.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_store(path: &Path) -> Result<Store> {
    if !path.exists() {
        debug!(path = %path.display(), "no store file yet; starting empty");
        return Ok(Store::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open store file at {}", path.display()))?;

    let store: Store = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to load store from {}", path.display()))?;

    if store.version != STORE_VERSION {
        anyhow::bail!("Unsupported store version: {}", store.version);
    }

    debug!(
        events = store.events.len(),
        drivers = store.drivers.len(),
        teams = store.teams.len(),
        "loaded store"
    );
    Ok(store)
}

/// Save the store to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_store(path: &Path, store: &Store) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory at {}", parent.display())
            })?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, store).context("Failed to serialize store")?;

    file.commit().context("Failed to save store")?;

    debug!(path = %path.display(), "saved store");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{EventKey, EventRecord};
    use std::env;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let temp_path = env::temp_dir().join("apex_rating_test_missing_store.json");
        let _ = std::fs::remove_file(&temp_path);

        let store = load_store(&temp_path).unwrap();
        assert_eq!(store.version, STORE_VERSION);
        assert!(store.events.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("apex_rating_test_store_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut store = Store::new();
        store.upsert_event(EventRecord {
            key: EventKey::new(2025, 4).unwrap(),
            name: "Bahrain Grand Prix".to_string(),
            date: Some("2025-04-13".parse().unwrap()),
        });

        save_store(&temp_path, &store).unwrap();
        let loaded = load_store(&temp_path).unwrap();
        assert_eq!(loaded, store);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let temp_path = env::temp_dir().join("apex_rating_test_store_version.json");
        std::fs::write(&temp_path, r#"{"version": 99}"#).unwrap();

        let err = load_store(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported store version"));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = env::temp_dir().join("apex_rating_test_nested_store");
        let _ = std::fs::remove_dir_all(&dir);
        let temp_path = dir.join("inner").join("store.json");

        save_store(&temp_path, &Store::new()).unwrap();
        assert!(temp_path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
