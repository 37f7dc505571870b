use sooru_core::ClockPort;
use sooru_model::next_sequential_code;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::record::{check_expected_version, sort_newest_first};
use crate::{Record, RecordFilter, RecordKind, RecordStore, StoreError, StoreErrorCode, SystemClock};

#[derive(Default)]
struct MemoryState {
    records: BTreeMap<(RecordKind, String), Record>,
    sequences: BTreeMap<RecordKind, u64>,
}

/// Process-local store. Everything is lost on restart.
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    clock: Arc<dyn ClockPort>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            clock,
        }
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, kind: RecordKind, id: &str) -> Result<Option<Record>, StoreError> {
        let state = self.state.lock().map_err(|_| StoreError::poisoned())?;
        Ok(state.records.get(&(kind, id.to_string())).cloned())
    }

    fn save(&self, mut record: Record) -> Result<Record, StoreError> {
        record.validate()?;
        let kind = record.kind();
        let mut state = self.state.lock().map_err(|_| StoreError::poisoned())?;

        let stored_version = record
            .id()
            .and_then(|id| state.records.get(&(kind, id.to_string())))
            .map(Record::version);
        check_expected_version(&record, stored_version)?;

        if let Some(email) = record.email() {
            let taken = state.records.values().any(|other| {
                other.kind() == kind && other.email() == Some(email) && other.id() != record.id()
            });
            if taken {
                return Err(StoreError::new(
                    StoreErrorCode::Conflict,
                    format!("email `{email}` is already registered"),
                ));
            }
        }

        if record.id().is_none() {
            let seq = state.sequences.entry(kind).or_insert(0);
            *seq += 1;
            let id = kind.format_id(*seq);
            let code = kind.has_code().then(|| {
                next_sequential_code(
                    record.name(),
                    state
                        .records
                        .values()
                        .filter(|r| r.kind() == kind)
                        .filter_map(Record::code),
                )
            });
            record.assign_identity(id, code)?;
        }

        record.touch(self.clock.now_unix_ms());
        let id = record.id().unwrap_or_default().to_string();
        tracing::debug!(kind = kind.as_str(), id = %id, version = record.version(), "record saved");
        state.records.insert((kind, id), record.clone());
        Ok(record)
    }

    fn delete(&self, kind: RecordKind, id: &str) -> Result<bool, StoreError> {
        let mut state = self.state.lock().map_err(|_| StoreError::poisoned())?;
        let removed = state.records.remove(&(kind, id.to_string())).is_some();
        if removed {
            tracing::debug!(kind = kind.as_str(), id, "record deleted");
        }
        Ok(removed)
    }

    fn list(&self, kind: RecordKind, filter: &RecordFilter) -> Result<Vec<Record>, StoreError> {
        let state = self.state.lock().map_err(|_| StoreError::poisoned())?;
        let mut out: Vec<Record> = state
            .records
            .iter()
            .filter(|((k, _), r)| *k == kind && r.matches(filter))
            .map(|(_, r)| r.clone())
            .collect();
        sort_newest_first(&mut out);
        Ok(out)
    }
}
