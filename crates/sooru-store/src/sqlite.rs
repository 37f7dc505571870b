// SPDX-License-Identifier: Apache-2.0

use rusqlite::{params, Connection, OptionalExtension, Transaction};
use sooru_core::{ClockPort, ResultExt};
use sooru_model::next_sequential_code;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::record::{check_expected_version, sort_newest_first};
use crate::{Record, RecordFilter, RecordKind, RecordStore, StoreError, StoreErrorCode, SystemClock};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    kind TEXT NOT NULL,
    id TEXT NOT NULL,
    version INTEGER NOT NULL,
    owner TEXT,
    project_id TEXT,
    email TEXT,
    code TEXT,
    created_at_ms INTEGER NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (kind, id)
);
CREATE INDEX IF NOT EXISTS idx_records_owner ON records(kind, owner);
CREATE INDEX IF NOT EXISTS idx_records_project ON records(kind, project_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_records_email ON records(kind, email) WHERE email IS NOT NULL;
CREATE TABLE IF NOT EXISTS sequences (
    kind TEXT PRIMARY KEY,
    last INTEGER NOT NULL
);
";

/// Single-file store. Records are kept as JSON bodies with the filter columns
/// copied out for lookups.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    clock: Arc<dyn ClockPort>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).with_context("open sqlite database")?;
        Self::from_connection(conn, Arc::new(SystemClock))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, Arc::new(SystemClock))
    }

    pub fn from_connection(conn: Connection, clock: Arc<dyn ClockPort>) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .with_context("configure sqlite pragmas")?;
        conn.execute_batch(SCHEMA).with_context("create sqlite schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock,
        })
    }
}

fn decode(body: &str) -> Result<Record, StoreError> {
    Ok(serde_json::from_str(body)?)
}

fn stored_version(tx: &Transaction<'_>, kind: RecordKind, id: Option<&str>) -> Result<Option<u64>, StoreError> {
    let Some(id) = id else {
        return Ok(None);
    };
    let version: Option<i64> = tx
        .query_row(
            "SELECT version FROM records WHERE kind = ?1 AND id = ?2",
            params![kind.as_str(), id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(version.map(|v| v as u64))
}

fn next_sequence(tx: &Transaction<'_>, kind: RecordKind) -> Result<u64, StoreError> {
    tx.execute(
        "INSERT INTO sequences(kind, last) VALUES (?1, 1)
         ON CONFLICT(kind) DO UPDATE SET last = last + 1",
        params![kind.as_str()],
    )?;
    let last: i64 = tx.query_row(
        "SELECT last FROM sequences WHERE kind = ?1",
        params![kind.as_str()],
        |row| row.get(0),
    )?;
    Ok(last as u64)
}

fn existing_codes(tx: &Transaction<'_>, kind: RecordKind) -> Result<Vec<String>, StoreError> {
    let mut stmt = tx.prepare("SELECT code FROM records WHERE kind = ?1 AND code IS NOT NULL")?;
    let rows = stmt.query_map(params![kind.as_str()], |row| row.get::<_, String>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

impl RecordStore for SqliteStore {
    fn load(&self, kind: RecordKind, id: &str) -> Result<Option<Record>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::poisoned())?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM records WHERE kind = ?1 AND id = ?2",
                params![kind.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;
        body.as_deref().map(decode).transpose()
    }

    fn save(&self, mut record: Record) -> Result<Record, StoreError> {
        record.validate()?;
        let kind = record.kind();
        let mut conn = self.conn.lock().map_err(|_| StoreError::poisoned())?;
        let tx = conn.transaction()?;

        let stored = stored_version(&tx, kind, record.id())?;
        check_expected_version(&record, stored)?;

        if let Some(email) = record.email() {
            let holder: Option<String> = tx
                .query_row(
                    "SELECT id FROM records WHERE kind = ?1 AND email = ?2",
                    params![kind.as_str(), email],
                    |row| row.get(0),
                )
                .optional()?;
            if holder.is_some() && holder.as_deref() != record.id() {
                return Err(StoreError::new(
                    StoreErrorCode::Conflict,
                    format!("email `{email}` is already registered"),
                ));
            }
        }

        if record.id().is_none() {
            let id = kind.format_id(next_sequence(&tx, kind)?);
            let code = if kind.has_code() {
                let codes = existing_codes(&tx, kind)?;
                Some(next_sequential_code(record.name(), codes.iter().map(String::as_str)))
            } else {
                None
            };
            record.assign_identity(id, code)?;
        }

        let expected = record.version() as i64;
        record.touch(self.clock.now_unix_ms());
        let body = serde_json::to_string(&record)?;
        let id = record.id().unwrap_or_default().to_string();
        let owner = record.owner().map(|o| o.as_str().to_string());
        let project = record.project_id().map(|p| p.as_str().to_string());
        let code = record.code().map(str::to_string);

        let changed = if stored.is_some() {
            tx.execute(
                "UPDATE records SET version = ?3, owner = ?4, project_id = ?5, email = ?6, code = ?7, body = ?8
                 WHERE kind = ?1 AND id = ?2 AND version = ?9",
                params![
                    kind.as_str(),
                    id,
                    record.version() as i64,
                    owner,
                    project,
                    record.email(),
                    code,
                    body,
                    expected
                ],
            )?
        } else {
            tx.execute(
                "INSERT INTO records(kind, id, version, owner, project_id, email, code, created_at_ms, body)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    kind.as_str(),
                    id,
                    record.version() as i64,
                    owner,
                    project,
                    record.email(),
                    code,
                    record.created_at_ms() as i64,
                    body
                ],
            )?
        };
        if changed != 1 {
            return Err(StoreError::new(
                StoreErrorCode::Conflict,
                format!("{} `{id}` was modified concurrently", kind.as_str()),
            ));
        }
        tx.commit()?;
        tracing::debug!(kind = kind.as_str(), id = %id, version = record.version(), "record saved");
        Ok(record)
    }

    fn delete(&self, kind: RecordKind, id: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::poisoned())?;
        let removed = conn.execute(
            "DELETE FROM records WHERE kind = ?1 AND id = ?2",
            params![kind.as_str(), id],
        )?;
        if removed > 0 {
            tracing::debug!(kind = kind.as_str(), id, "record deleted");
        }
        Ok(removed > 0)
    }

    fn list(&self, kind: RecordKind, filter: &RecordFilter) -> Result<Vec<Record>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::poisoned())?;
        let mut stmt = conn.prepare(
            "SELECT body FROM records
             WHERE kind = ?1
               AND (?2 IS NULL OR owner = ?2)
               AND (?3 IS NULL OR project_id = ?3)
               AND (?4 IS NULL OR email = ?4)",
        )?;
        let rows = stmt.query_map(
            params![
                kind.as_str(),
                filter.owner.as_ref().map(|o| o.as_str()),
                filter.project_id.as_ref().map(|p| p.as_str()),
                filter.email.as_deref()
            ],
            |row| row.get::<_, String>(0),
        )?;
        let mut out = Vec::new();
        for body in rows {
            out.push(decode(&body?)?);
        }
        sort_newest_first(&mut out);
        Ok(out)
    }
}
