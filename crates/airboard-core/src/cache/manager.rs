use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::AirlineList;

use super::KvStore;

/// Key under which the board contents are persisted.
pub const AIRLINE_DATA_KEY: &str = "airlineData";

/// Persists the board's `AirlineList` in the local key-value store.
///
/// The entry carries no timestamp or expiry; only the file's modification
/// time is consulted, and only for display.
pub struct CacheManager {
    store: KvStore,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            store: KvStore::new(cache_dir)?,
        })
    }

    /// Load the cached list. A stored JSON `null` reads as no entry.
    pub fn load_airlines(&self) -> Result<Option<AirlineList>> {
        let Some(contents) = self.store.get(AIRLINE_DATA_KEY)? else {
            return Ok(None);
        };

        let list: Option<AirlineList> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache entry: {}", AIRLINE_DATA_KEY))?;
        Ok(list)
    }

    pub fn save_airlines(&self, airlines: &AirlineList) -> Result<()> {
        let contents = serde_json::to_string(airlines)?;
        self.store.set(AIRLINE_DATA_KEY, &contents)
    }

    /// Delete the cached list so the next cycle fetches. Returns whether an
    /// entry existed.
    pub fn clear_airlines(&self) -> Result<bool> {
        self.store.remove(AIRLINE_DATA_KEY)
    }

    /// Human-readable age of the cached list, or `None` when there is none.
    pub fn airlines_age(&self) -> Option<String> {
        match self.store.modified(AIRLINE_DATA_KEY) {
            Ok(Some(modified)) => {
                let modified: DateTime<Utc> = modified.into();
                Some(age_display((Utc::now() - modified).num_minutes()))
            }
            Ok(None) => None,
            Err(e) => {
                debug!(error = %e, "Failed to read cache age");
                None
            }
        }
    }
}

/// Format an age in minutes as "just now", "5m ago", "2h ago" or "3d ago".
pub fn age_display(minutes: i64) -> String {
    if minutes < 1 {
        // Negative values come from clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AirlineRecord;

    fn manager() -> (tempfile::TempDir, CacheManager) {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = CacheManager::new(dir.path().to_path_buf()).expect("manager");
        (dir, manager)
    }

    #[test]
    fn test_age_display() {
        assert_eq!(age_display(-5), "just now");
        assert_eq!(age_display(0), "just now");
        assert_eq!(age_display(5), "5m ago");
        assert_eq!(age_display(90), "2h ago");
        assert_eq!(age_display(125), "2h ago");
        assert_eq!(age_display(1440 + 13 * 60), "2d ago");
    }

    #[test]
    fn test_save_and_load_airlines() {
        let (_dir, cache) = manager();
        assert!(cache.load_airlines().expect("load").is_none());
        assert!(cache.airlines_age().is_none());

        let list = AirlineList::from_slots(vec![
            Some(AirlineRecord {
                name: Some("American Airlines".to_string()),
                ..Default::default()
            }),
            None,
        ]);
        cache.save_airlines(&list).expect("save");

        assert_eq!(cache.load_airlines().expect("load"), Some(list));
        assert_eq!(cache.airlines_age().as_deref(), Some("just now"));
    }

    #[test]
    fn test_value_is_plain_json_array() {
        let (dir, cache) = manager();
        cache.save_airlines(&AirlineList::empty(2)).expect("save");

        let raw = std::fs::read_to_string(dir.path().join("airlineData.json")).expect("read");
        assert_eq!(raw, "[null,null]");
    }

    #[test]
    fn test_null_entry_reads_as_absent() {
        let (dir, cache) = manager();
        std::fs::write(dir.path().join("airlineData.json"), "null").expect("write");
        assert!(cache.load_airlines().expect("load").is_none());
    }

    #[test]
    fn test_corrupt_entry_is_error() {
        let (dir, cache) = manager();
        std::fs::write(dir.path().join("airlineData.json"), "{not json").expect("write");
        assert!(cache.load_airlines().is_err());
    }

    #[test]
    fn test_clear_airlines() {
        let (_dir, cache) = manager();
        cache.save_airlines(&AirlineList::empty(1)).expect("save");
        assert!(cache.clear_airlines().expect("clear"));
        assert!(cache.load_airlines().expect("load").is_none());
    }
}
