//! Reading history log.
//!
//! The whole log lives under one settings key as a JSON array serialized to
//! a string. It is capped (oldest entries evicted) and rewritten on every
//! mutation.

use crate::settings::SettingsStore;
use crate::HistoryEntry;
use serde_json::Value;

pub const HISTORY_KEY: &str = "tarot_reading_history";

/// Default cap on the number of stored entries
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Ordered, capped history of past readings
#[derive(Debug)]
pub struct HistoryStore<S> {
    settings: S,
}

impl<S: SettingsStore> HistoryStore<S> {
    pub fn new(settings: S) -> Self {
        Self { settings }
    }

    /// Load all entries, newest first
    ///
    /// Returns an empty list if nothing is stored or the stored data is
    /// corrupt.
    pub fn load(&self) -> Vec<HistoryEntry> {
        let Some(value) = self.settings.get(HISTORY_KEY) else {
            tracing::debug!("No reading history stored");
            return Vec::new();
        };

        let Some(raw) = value.as_str() else {
            tracing::warn!("Reading history is not a string, ignoring it");
            return Vec::new();
        };

        let mut entries: Vec<HistoryEntry> = match serde_json::from_str(raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to parse reading history: {}. Ignoring it.", e);
                return Vec::new();
            }
        };

        // Sort by created_at, newest first
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        tracing::debug!("Loaded {} history entries", entries.len());
        entries
    }

    /// Replace the stored log with `entries` as given
    ///
    /// Failures are logged and otherwise ignored.
    pub fn save(&self, entries: &[HistoryEntry]) {
        let raw = match serde_json::to_string(entries) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to serialize reading history: {}", e);
                return;
            }
        };

        if let Err(e) = self.settings.set(HISTORY_KEY, Value::String(raw)) {
            tracing::warn!("Failed to save reading history: {}", e);
        }
    }

    /// Prepend `entry`, keeping at most [`DEFAULT_MAX_ENTRIES`]
    pub fn append(&self, entry: HistoryEntry) {
        self.append_with_limit(entry, DEFAULT_MAX_ENTRIES)
    }

    /// Prepend `entry`, dropping the oldest entries beyond `max_count`
    pub fn append_with_limit(&self, entry: HistoryEntry, max_count: usize) {
        let mut entries = self.load();
        entries.insert(0, entry);

        if entries.len() > max_count {
            tracing::debug!(
                "Evicting {} oldest history entries",
                entries.len() - max_count
            );
            entries.truncate(max_count);
        }

        self.save(&entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{JsonSettingsFile, MemorySettings};
    use crate::SpreadType;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn entry_at(minutes: i64, question: &str) -> HistoryEntry {
        let mut entry = HistoryEntry::new(
            SpreadType::DailyGuidance,
            question,
            vec!["Le Mat".into()],
        );
        entry.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + Duration::minutes(minutes);
        entry
    }

    #[test]
    fn test_append_then_load_returns_entry() {
        let store = HistoryStore::new(MemorySettings::new());
        let entry = HistoryEntry::new(
            SpreadType::DailyGuidance,
            "Message du jour",
            vec!["Le Mat".into()],
        );

        store.append(entry.clone());
        let entries = store.load();

        assert_eq!(entries, vec![entry]);
    }

    #[test]
    fn test_most_recent_first() {
        let store = HistoryStore::new(MemorySettings::new());
        let e1 = entry_at(0, "first");
        let e2 = entry_at(1, "second");

        store.append(e1.clone());
        store.append(e2.clone());

        assert_eq!(store.load(), vec![e2, e1]);
    }

    #[test]
    fn test_load_sorts_regardless_of_storage_order() {
        let store = HistoryStore::new(MemorySettings::new());
        let older = entry_at(0, "older");
        let newer = entry_at(30, "newer");

        store.save(&[older.clone(), newer.clone()]);

        assert_eq!(store.load(), vec![newer, older]);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let store = HistoryStore::new(MemorySettings::new());
        for i in 0..101 {
            store.append_with_limit(entry_at(i, &format!("q{i}")), 100);
        }

        let entries = store.load();
        assert_eq!(entries.len(), 100);
        assert_eq!(entries[0].question, "q100");
        assert!(entries.iter().all(|e| e.question != "q0"));
    }

    #[test]
    fn test_default_cap_is_100() {
        let store = HistoryStore::new(MemorySettings::new());
        for i in 0..105 {
            store.append(entry_at(i, "q"));
        }
        assert_eq!(store.load().len(), DEFAULT_MAX_ENTRIES);
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        crate::logging::init_test();
        let settings = MemorySettings::new();
        settings.set(HISTORY_KEY, json!("[{ not json")).unwrap();
        assert!(HistoryStore::new(&settings).load().is_empty());

        settings.set(HISTORY_KEY, json!(42)).unwrap();
        assert!(HistoryStore::new(&settings).load().is_empty());

        settings.set(HISTORY_KEY, json!(r#"[{"id": "nope"}]"#)).unwrap();
        assert!(HistoryStore::new(&settings).load().is_empty());
    }

    #[test]
    fn test_append_after_corruption_starts_fresh() {
        let settings = MemorySettings::new();
        settings.set(HISTORY_KEY, json!("garbage")).unwrap();

        let store = HistoryStore::new(&settings);
        store.append(entry_at(0, "fresh"));

        let entries = store.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question, "fresh");
    }

    #[test]
    fn test_ids_and_timestamps_roundtrip_through_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut entry = HistoryEntry::new(
            SpreadType::PastPresentFuture,
            "Où vais-je ?",
            vec!["Le Mat".into(), "La Lune".into(), "Roi de Deniers".into()],
        );
        // Sub-second precision must survive
        entry.created_at = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();

        HistoryStore::new(JsonSettingsFile::new(&path)).append(entry.clone());

        let loaded = HistoryStore::new(JsonSettingsFile::new(&path)).load();
        assert_eq!(loaded, vec![entry]);
    }
}
