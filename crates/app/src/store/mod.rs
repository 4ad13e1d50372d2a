//! Local persistence for profiles and collections.
//!
//! # Records
//!
//! - `snowmanDex_v2_all_users` - JSON array of every [`UserProfile`]
//! - `snowmanDex_v2_nick_<profileId>` - JSON array of that profile's
//!   [`SnowmanEntry`] values, most recent first
//!
//! Every write replaces a whole record. There are no partial updates and no
//! multi-key transactions. Reads are forgiving: an absent or corrupt record
//! loads as empty and is logged, never surfaced. Collections are repaired
//! entry by entry, so one bad entry never empties the rest.

mod file;
mod memory;

use std::collections::HashSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use snowdex_core::{ProfileId, RawStats, SnowmanEntry, SnowmanStats, UserProfile};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key of the profile registry record.
pub const PROFILES_KEY: &str = "snowmanDex_v2_all_users";

/// Prefix of every per-profile collection record.
pub const COLLECTION_KEY_PREFIX: &str = "snowmanDex_v2_nick_";

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The key contains characters the backend cannot store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// String key-value storage with whole-value reads and writes.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Storage key holding a profile's collection.
#[must_use]
pub fn collection_key(profile_id: &ProfileId) -> String {
    format!("{COLLECTION_KEY_PREFIX}{profile_id}")
}

/// Typed access to the profile registry and per-profile collections.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    /// Wrap a key-value backend.
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A store backed by a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Every persisted profile, in creation order.
    #[must_use]
    pub fn load_profiles(&self) -> Vec<UserProfile> {
        self.load_json(PROFILES_KEY).unwrap_or_default()
    }

    /// Overwrite the profile registry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the registry cannot be written.
    pub fn save_profiles(&self, profiles: &[UserProfile]) -> Result<(), StoreError> {
        self.save_json(PROFILES_KEY, profiles)
    }

    /// A profile's entries, most recent first.
    ///
    /// Entries are decoded one by one. Out-of-range stats are clamped into
    /// `1..=100`, an entry that still cannot be decoded is dropped, and an
    /// entry repeating an earlier id is dropped. The rest of the collection
    /// always survives.
    #[must_use]
    pub fn load_collection(&self, profile_id: &ProfileId) -> Vec<SnowmanEntry> {
        let records: Vec<Value> = self
            .load_json(&collection_key(profile_id))
            .unwrap_or_default();

        let total = records.len();
        let mut seen = HashSet::with_capacity(total);
        let mut duplicates = 0_usize;
        let mut entries = Vec::with_capacity(total);

        for (index, record) in records.into_iter().enumerate() {
            let Some(entry) = decode_entry(profile_id, index, record) else {
                continue;
            };
            if seen.insert(entry.id.clone()) {
                entries.push(entry);
            } else {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            tracing::warn!(
                profile_id = %profile_id,
                dropped = duplicates,
                "Collection contained duplicate entry ids"
            );
        }
        entries
    }

    /// Overwrite a profile's collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the collection cannot be written.
    pub fn save_collection(
        &self,
        profile_id: &ProfileId,
        entries: &[SnowmanEntry],
    ) -> Result<(), StoreError> {
        self.save_json(&collection_key(profile_id), entries)
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read record, treating as empty");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Corrupt record, treating as empty");
                None
            }
        }
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key, &json)
    }
}

/// Decode one stored entry, clamping stats written before range checks.
fn decode_entry(profile_id: &ProfileId, index: usize, mut record: Value) -> Option<SnowmanEntry> {
    if let Some(stats) = record.get_mut("stats")
        && let Ok(raw) = RawStats::deserialize(&*stats)
    {
        let (clamped, adjusted) = SnowmanStats::clamped(raw);
        if !adjusted.is_empty() {
            tracing::warn!(
                profile_id = %profile_id,
                index,
                adjusted = ?adjusted,
                "Stored entry had out-of-range stats, clamped"
            );
            if let Ok(value) = serde_json::to_value(clamped) {
                *stats = value;
            }
        }
    }

    match serde_json::from_value(record) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::warn!(
                profile_id = %profile_id,
                index,
                error = %e,
                "Dropping undecodable entry"
            );
            None
        }
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use snowdex_core::{AnalysisResult, ImageData, Rarity, SnowmanStats};

    use super::*;

    const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\x00\x10JFIF";

    fn entry(name: &str) -> SnowmanEntry {
        SnowmanEntry::new(
            AnalysisResult {
                name: name.to_string(),
                description: "desc".to_string(),
                kind: "Frost".to_string(),
                rarity: Rarity::Common,
                stats: SnowmanStats::new(10, 20, 30, 40, 50).unwrap(),
                fun_fact: "fact".to_string(),
            },
            ImageData::from_bytes(JPEG_BYTES.to_vec()).unwrap(),
            None,
        )
    }

    #[test]
    fn test_collection_key_format() {
        let id = ProfileId::new("abc");
        assert_eq!(collection_key(&id), "snowmanDex_v2_nick_abc");
    }

    #[test]
    fn test_empty_store_loads_empty() {
        let store = LocalStore::in_memory();
        assert!(store.load_profiles().is_empty());
        assert!(store.load_collection(&ProfileId::new("nobody")).is_empty());
    }

    #[test]
    fn test_profiles_roundtrip() {
        let store = LocalStore::in_memory();
        let profiles = vec![
            UserProfile::create("Rookie").unwrap(),
            UserProfile::create("Veteran").unwrap(),
        ];
        store.save_profiles(&profiles).unwrap();
        assert_eq!(store.load_profiles(), profiles);
    }

    #[test]
    fn test_collection_roundtrip_preserves_order() {
        let store = LocalStore::in_memory();
        let id = ProfileId::new("p1");
        let entries = vec![entry("Newest"), entry("Older"), entry("Oldest")];

        store.save_collection(&id, &entries).unwrap();
        assert_eq!(store.load_collection(&id), entries);
    }

    #[test]
    fn test_collections_are_isolated() {
        let store = LocalStore::in_memory();
        let a = ProfileId::new("a");
        let b = ProfileId::new("b");

        store.save_collection(&a, &[entry("Only A")]).unwrap();
        assert_eq!(store.load_collection(&a).len(), 1);
        assert!(store.load_collection(&b).is_empty());
    }

    #[test]
    fn test_corrupt_records_load_empty() {
        let backend = MemoryStore::new();
        backend.set(PROFILES_KEY, "{not json").unwrap();
        backend.set("snowmanDex_v2_nick_p1", "[{\"id\": 42}]").unwrap();

        let store = LocalStore::new(backend);
        assert!(store.load_profiles().is_empty());
        assert!(store.load_collection(&ProfileId::new("p1")).is_empty());
    }

    fn stored(entries: &[SnowmanEntry]) -> Vec<Value> {
        entries
            .iter()
            .map(|entry| serde_json::to_value(entry).unwrap())
            .collect()
    }

    #[test]
    fn test_out_of_range_stats_are_clamped_on_load() {
        let backend = MemoryStore::new();
        let entries = vec![entry("Newest"), entry("Middle"), entry("Oldest")];
        let mut records = stored(&entries);
        if let Some(stats) = records.last_mut().and_then(|r| r.get_mut("stats")) {
            stats["creativity"] = Value::from(0);
            stats["durability"] = Value::from(250);
        }
        backend
            .set("snowmanDex_v2_nick_p1", &Value::Array(records).to_string())
            .unwrap();

        let loaded = LocalStore::new(backend).load_collection(&ProfileId::new("p1"));

        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.get(..2).unwrap(), entries.get(..2).unwrap());
        let oldest = loaded.last().unwrap();
        assert_eq!(oldest.id, entries.last().unwrap().id);
        assert_eq!(oldest.stats().creativity(), 1);
        assert_eq!(oldest.stats().durability(), 100);
        assert_eq!(oldest.stats().roundness(), 20);
    }

    #[test]
    fn test_undecodable_entry_is_dropped_alone() {
        let backend = MemoryStore::new();
        let entries = vec![entry("Keep"), entry("Broken"), entry("Also Keep")];
        let mut records = stored(&entries);
        if let Some(broken) = records.get_mut(1) {
            broken["rarity"] = Value::from("Epic");
        }
        backend
            .set("snowmanDex_v2_nick_p1", &Value::Array(records).to_string())
            .unwrap();

        let names: Vec<String> = LocalStore::new(backend)
            .load_collection(&ProfileId::new("p1"))
            .iter()
            .map(|entry| entry.name().to_string())
            .collect();
        assert_eq!(names, vec!["Keep", "Also Keep"]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let store = LocalStore::in_memory();
        let id = ProfileId::new("p1");
        let first = entry("First");
        let mut dupe = entry("Second");
        dupe.id = first.id.clone();

        store.save_collection(&id, &[first.clone(), dupe]).unwrap();
        assert_eq!(store.load_collection(&id), vec![first]);
    }
}
