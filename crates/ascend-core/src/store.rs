//! Persistence of player ledgers.
//!
//! The engine only knows the logical record layout
//! ([`PlayerTalentRecord`]); where and how records are kept is up to the
//! [`LedgerStore`] implementation. When a player is unloaded their journal
//! entries are handed to the store as well, so the in-memory journal only
//! holds history for players still in play.

use std::collections::BTreeMap;
use std::sync::Mutex;

use ascend_types::{PlayerId, PlayerTalentRecord, TalentTransaction};

use crate::error::StoreError;

/// Durable storage for player talent records.
pub trait LedgerStore: Send + Sync {
    /// Load the record for `player`, or `None` if none was saved.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend fails or the stored bytes
    /// cannot be decoded.
    fn load(&self, player: PlayerId) -> Result<Option<PlayerTalentRecord>, StoreError>;

    /// Save `record` for `player`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the record cannot be encoded or written.
    fn save(&self, player: PlayerId, record: &PlayerTalentRecord) -> Result<(), StoreError>;

    /// Append `entries` to the player's archived journal history.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the entries cannot be encoded or written.
    fn archive_journal(
        &self,
        player: PlayerId,
        entries: &[TalentTransaction],
    ) -> Result<(), StoreError>;
}

/// A [`LedgerStore`] that keeps JSON-encoded records and archived journal
/// entries in memory.
///
/// Everything goes through `serde_json` on every save and load so that tests
/// exercise the same encoding a file or database backend would.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    records: Mutex<BTreeMap<PlayerId, String>>,
    journals: Mutex<BTreeMap<PlayerId, Vec<String>>>,
}

impl InMemoryLedgerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    /// Whether no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the raw JSON stored for `player`.
    pub fn raw(&self, player: PlayerId) -> Option<String> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.get(&player).cloned())
    }

    /// Decode every journal entry archived for `player`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the archive lock is poisoned or an entry
    /// cannot be decoded.
    pub fn archived(&self, player: PlayerId) -> Result<Vec<TalentTransaction>, StoreError> {
        let journals = self.journals.lock().map_err(|_poisoned| poisoned())?;
        journals
            .get(&player)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    /// Store raw JSON for `player`, bypassing encoding.
    pub fn insert_raw(&self, player: PlayerId, json: impl Into<String>) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(player, json.into());
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend {
        reason: String::from("in-memory store lock poisoned"),
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self, player: PlayerId) -> Result<Option<PlayerTalentRecord>, StoreError> {
        let records = self.records.lock().map_err(|_poisoned| poisoned())?;
        records
            .get(&player)
            .map(|json| serde_json::from_str(json))
            .transpose()
            .map_err(StoreError::from)
    }

    fn save(&self, player: PlayerId, record: &PlayerTalentRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        self.records
            .lock()
            .map_err(|_poisoned| poisoned())?
            .insert(player, json);
        Ok(())
    }

    fn archive_journal(
        &self,
        player: PlayerId,
        entries: &[TalentTransaction],
    ) -> Result<(), StoreError> {
        let encoded = entries
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        self.journals
            .lock()
            .map_err(|_poisoned| poisoned())?
            .entry(player)
            .or_default()
            .extend(encoded);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascend_ledger::TalentJournal;
    use ascend_types::{BranchId, TalentId};

    use super::*;

    #[test]
    fn missing_record_is_none() {
        let store = InMemoryLedgerStore::new();
        assert!(store.load(PlayerId::new()).unwrap().is_none());
    }

    #[test]
    fn saved_record_loads_back() {
        let store = InMemoryLedgerStore::new();
        let player = PlayerId::new();
        let mut record = PlayerTalentRecord {
            available_points: 3,
            total_points_spent: 4,
            ..PlayerTalentRecord::default()
        };
        record.talents.insert(TalentId::from("cleave"), 2);
        record.branch_points.insert(BranchId::from("combat"), 4);

        store.save(player, &record).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load(player).unwrap(), Some(record));
        assert!(store.raw(player).unwrap().contains("\"cleave\":2"));
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        let store = InMemoryLedgerStore::new();
        let player = PlayerId::new();
        store.insert_raw(player, "not json");
        assert!(matches!(
            store.load(player),
            Err(StoreError::Serialization { .. })
        ));
    }

    #[test]
    fn archived_entries_accumulate_per_player() {
        let store = InMemoryLedgerStore::new();
        let alice = PlayerId::new();
        let bob = PlayerId::new();
        let mut first = TalentJournal::new();
        first.record_grant(alice, 3).unwrap();
        let mut second = TalentJournal::new();
        second.record_grant(alice, 4).unwrap();
        second.record_reset(alice, 5).unwrap();
        let mut other = TalentJournal::new();
        other.record_grant(bob, 1).unwrap();

        store.archive_journal(alice, first.all_entries()).unwrap();
        store.archive_journal(bob, other.all_entries()).unwrap();
        store.archive_journal(alice, second.all_entries()).unwrap();

        let points: Vec<u32> = store
            .archived(alice)
            .unwrap()
            .iter()
            .map(|e| e.points)
            .collect();
        assert_eq!(points, vec![3, 4, 5]);
        assert_eq!(store.archived(bob).unwrap().len(), 1);
        assert!(store.archived(PlayerId::new()).unwrap().is_empty());
    }
}
