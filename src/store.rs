use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{CustomerRecord, PaymentCategory};

/// Durable customer map backed by a whole-file JSON snapshot.
///
/// The store is the sole writer of records. The in-memory map stays
/// authoritative for the process lifetime: a failed snapshot write is
/// logged and the mutation is kept, an accepted data-loss risk on restart.
pub struct CustomerStore {
    path: PathBuf,
    records: HashMap<String, Entry>,
    next_seq: u64,
}

struct Entry {
    record: CustomerRecord,
    // Insertion order, used to break target_date ties in list().
    seq: u64,
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serde(serde_json::Error),
    NotFound(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {}", e),
            StoreError::Serde(e) => write!(f, "Serialization error: {}", e),
            StoreError::NotFound(key) => write!(f, "Customer not found: {}", key),
        }
    }
}

impl std::error::Error for StoreError {}

impl CustomerStore {
    /// Loads the snapshot at `path`. A missing or corrupt file degrades to
    /// an empty store with a log line; it never errors to the caller.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match read_snapshot(&path) {
            Ok(records) => records,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No snapshot at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(e) => {
                tracing::error!("Failed to load snapshot {}: {}", path.display(), e);
                HashMap::new()
            }
        };
        let next_seq = records.values().map(|e| e.seq + 1).max().unwrap_or(0);
        Self {
            path,
            records,
            next_seq,
        }
    }

    /// Inserts or replaces by key. Replacing keeps the original insertion
    /// order. The snapshot is rewritten before returning.
    pub fn upsert(&mut self, record: CustomerRecord) {
        let seq = match self.records.get(&record.key) {
            Some(existing) => existing.seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };
        self.records.insert(record.key.clone(), Entry { record, seq });
        self.persist();
    }

    pub fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        match self.records.remove(key) {
            Some(_) => {
                self.persist();
                Ok(())
            }
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CustomerRecord> {
        self.records.get(key).map(|e| &e.record)
    }

    /// All records sorted by target date ascending, ties broken by
    /// insertion order.
    pub fn list(&self) -> Vec<CustomerRecord> {
        let mut entries: Vec<&Entry> = self.records.values().collect();
        entries.sort_by_key(|e| (e.record.target_date, e.seq));
        entries.iter().map(|e| e.record.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Idempotent: the flag only ever goes false -> true.
    pub fn mark_notified(&mut self, key: &str) -> Result<(), StoreError> {
        let entry = self
            .records
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        if !entry.record.notified {
            entry.record.notified = true;
            self.persist();
        }
        Ok(())
    }

    /// Flips one payment-settled flag and returns the new value.
    pub fn toggle_payment_flag(
        &mut self,
        key: &str,
        category: PaymentCategory,
    ) -> Result<bool, StoreError> {
        let entry = self
            .records
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        let value = entry.record.payments.toggle(category);
        self.persist();
        Ok(value)
    }

    fn persist(&self) {
        if let Err(e) = self.write_snapshot() {
            tracing::error!("Failed to write snapshot {}: {}", self.path.display(), e);
        }
    }

    fn write_snapshot(&self) -> Result<(), StoreError> {
        let mut entries: Vec<&Entry> = self.records.values().collect();
        entries.sort_by_key(|e| e.seq);

        let mut map = serde_json::Map::new();
        for entry in entries {
            map.insert(
                entry.record.key.clone(),
                serde_json::to_value(&entry.record)?,
            );
        }

        let json = serde_json::to_string_pretty(&serde_json::Value::Object(map))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

fn read_snapshot(path: &Path) -> Result<HashMap<String, Entry>, StoreError> {
    let raw = fs::read_to_string(path)?;
    // preserve_order keeps file order, which seeds the insertion sequence.
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw)?;

    let mut records = HashMap::new();
    for (seq, (key, value)) in map.into_iter().enumerate() {
        let record: CustomerRecord = serde_json::from_value(value)?;
        records.insert(
            key,
            Entry {
                record,
                seq: seq as u64,
            },
        );
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn record(key: &str, date: NaiveDate) -> CustomerRecord {
        CustomerRecord::new(key.to_string(), date)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
    }

    #[test]
    fn test_upsert_then_reload_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("customers.json");

        let mut original = record("@alice", day(3));
        original.order_amount = Some(12000.0);
        original.split_payment = Some(true);
        original.product_count = Some(2);

        {
            let mut store = CustomerStore::load(&path);
            store.upsert(original.clone());
        }

        let store = CustomerStore::load(&path);
        assert_eq!(store.get("@alice"), Some(&original));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = CustomerStore::load(dir.path().join("absent.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("customers.json");
        fs::write(&path, "{not json").unwrap();

        let store = CustomerStore::load(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_sorted_by_date_then_insertion() {
        let dir = tempdir().unwrap();
        let mut store = CustomerStore::load(dir.path().join("customers.json"));

        store.upsert(record("@late", day(9)));
        store.upsert(record("@first", day(3)));
        store.upsert(record("@second", day(3)));

        let keys: Vec<String> = store.list().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["@first", "@second", "@late"]);
    }

    #[test]
    fn test_insertion_order_survives_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("customers.json");

        {
            let mut store = CustomerStore::load(&path);
            store.upsert(record("@first", day(3)));
            store.upsert(record("@second", day(3)));
        }

        let store = CustomerStore::load(&path);
        let keys: Vec<String> = store.list().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["@first", "@second"]);
    }

    #[test]
    fn test_upsert_replaces_by_key() {
        let dir = tempdir().unwrap();
        let mut store = CustomerStore::load(dir.path().join("customers.json"));

        store.upsert(record("@alice", day(3)));
        store.upsert(record("@alice", day(5)));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("@alice").unwrap().target_date, day(5));
    }

    #[test]
    fn test_delete_unknown_key_reports_not_found() {
        let dir = tempdir().unwrap();
        let mut store = CustomerStore::load(dir.path().join("customers.json"));
        store.upsert(record("@alice", day(3)));

        let err = store.delete("@bob").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref k) if k == "@bob"));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_delete_removes_record() {
        let dir = tempdir().unwrap();
        let mut store = CustomerStore::load(dir.path().join("customers.json"));
        store.upsert(record("@alice", day(3)));

        store.delete("@alice").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_mark_notified_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut store = CustomerStore::load(dir.path().join("customers.json"));
        store.upsert(record("@alice", day(3)));

        store.mark_notified("@alice").unwrap();
        assert!(store.get("@alice").unwrap().notified);

        store.mark_notified("@alice").unwrap();
        assert!(store.get("@alice").unwrap().notified);
    }

    #[test]
    fn test_toggle_payment_flag_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("customers.json");

        {
            let mut store = CustomerStore::load(&path);
            store.upsert(record("TRK-1", day(3)));
            assert!(store
                .toggle_payment_flag("TRK-1", PaymentCategory::Duty)
                .unwrap());
        }

        let store = CustomerStore::load(&path);
        assert!(store.get("TRK-1").unwrap().payments.duty_paid);
        assert!(!store.get("TRK-1").unwrap().payments.deposit_paid);
    }

    #[test]
    fn test_mutation_survives_unwritable_snapshot() {
        let dir = tempdir().unwrap();
        // A directory path makes every snapshot write fail.
        let mut store = CustomerStore::load(dir.path());
        store.upsert(record("@alice", day(3)));

        assert_eq!(store.get("@alice").unwrap().key, "@alice");
    }
}
