#![forbid(unsafe_code)]

mod clock;
mod error;
mod memory;
mod record;
mod sqlite;

pub use clock::{FixedClock, SystemClock};
pub use error::{StoreError, StoreErrorCode};
pub use memory::MemoryStore;
pub use record::{Record, RecordFilter, RecordKind, StoredRecord};
pub use sqlite::SqliteStore;

pub const CRATE_NAME: &str = "sooru-store";

/// Persistence for the three record kinds.
///
/// `save` assigns id, code and timestamps to unsaved records (`id` absent,
/// `version` 0), bumps `version` on every write and rejects a write whose
/// `version` no longer matches the stored one with [`StoreErrorCode::Conflict`].
pub trait RecordStore: Send + Sync {
    fn load(&self, kind: RecordKind, id: &str) -> Result<Option<Record>, StoreError>;
    fn save(&self, record: Record) -> Result<Record, StoreError>;
    fn delete(&self, kind: RecordKind, id: &str) -> Result<bool, StoreError>;
    /// Matching records, newest first.
    fn list(&self, kind: RecordKind, filter: &RecordFilter) -> Result<Vec<Record>, StoreError>;
}

/// Typed access on top of [`RecordStore`].
pub trait StoreExt: RecordStore {
    fn find<T: StoredRecord>(&self, id: &str) -> Result<Option<T>, StoreError> {
        match self.load(T::KIND, id)? {
            Some(record) => T::from_record(record).map(Some),
            None => Ok(None),
        }
    }

    fn get<T: StoredRecord>(&self, id: &str) -> Result<T, StoreError> {
        self.find(id)?.ok_or_else(|| {
            StoreError::new(
                StoreErrorCode::NotFound,
                format!("{} `{id}` not found", T::KIND.as_str()),
            )
        })
    }

    fn put<T: StoredRecord>(&self, value: T) -> Result<T, StoreError> {
        T::from_record(self.save(value.into_record())?)
    }

    fn list_of<T: StoredRecord>(&self, filter: &RecordFilter) -> Result<Vec<T>, StoreError> {
        self.list(T::KIND, filter)?
            .into_iter()
            .map(T::from_record)
            .collect()
    }
}

impl<S: RecordStore + ?Sized> StoreExt for S {}
