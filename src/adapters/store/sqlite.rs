//! SQLite-backed pending store
//!
//! Persists pending sync entries in a single local database file with an
//! explicit schema version, checked on open. Records travel as a JSON
//! column; everything the queue filters on is a real column.

use super::traits::PendingStore;
use crate::core::queue::entry::{PendingSyncEntry, SyncState};
use crate::domain::ids::{PatientId, VisitId};
use crate::domain::{LabTestRecord, RelayError, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// Current on-disk schema version
const SCHEMA_VERSION: i64 = 1;

/// SQLite-backed implementation of [`PendingStore`]
pub struct SqlitePendingStore {
    conn: Mutex<Connection>,
}

impl SqlitePendingStore {
    /// Open (or create) the store at the given path
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Open` if the database cannot be opened and
    /// `StoreError::Migration` if the file carries a newer schema version
    /// than this build understands.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Open(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (tests, dry runs)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS pending_entries (
                entry_key     TEXT PRIMARY KEY,
                visit_id      INTEGER NOT NULL,
                patient_id    TEXT NOT NULL,
                records       TEXT NOT NULL,
                state         TEXT NOT NULL,
                sync_attempts INTEGER NOT NULL DEFAULT 0,
                created_at    TEXT NOT NULL,
                updated_at    TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_pending_entries_state
                ON pending_entries (state);
            "#,
        )?;

        let version: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match version {
            None => {
                conn.execute(
                    "INSERT INTO meta (key, value) VALUES ('schema_version', ?1)",
                    params![SCHEMA_VERSION.to_string()],
                )?;
                Ok(())
            }
            Some(v) => {
                let found: i64 = v.parse().map_err(|_| {
                    StoreError::Migration(format!("Unreadable schema version: {v:?}"))
                })?;
                if found > SCHEMA_VERSION {
                    return Err(StoreError::Migration(format!(
                        "Store schema version {found} is newer than supported version {SCHEMA_VERSION}"
                    )));
                }
                // Older versions would be migrated here as the schema evolves.
                Ok(())
            }
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Query("Store mutex poisoned".to_string()))
    }
}

/// Intermediate row struct for database mapping
struct EntryRow {
    entry_key: String,
    visit_id: i64,
    patient_id: String,
    records: String,
    state: String,
    sync_attempts: u32,
    created_at: String,
}

const ENTRY_COLUMNS: &str =
    "entry_key, visit_id, patient_id, records, state, sync_attempts, created_at";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok(EntryRow {
        entry_key: row.get(0)?,
        visit_id: row.get(1)?,
        patient_id: row.get(2)?,
        records: row.get(3)?,
        state: row.get(4)?,
        sync_attempts: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl TryFrom<EntryRow> for PendingSyncEntry {
    type Error = StoreError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let visit_id = VisitId::new(row.visit_id).map_err(StoreError::Serialization)?;
        let patient_id = PatientId::new(row.patient_id).map_err(StoreError::Serialization)?;
        let records: Vec<LabTestRecord> = serde_json::from_str(&row.records)?;
        let state = SyncState::parse(&row.state).map_err(StoreError::Serialization)?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| StoreError::Serialization(format!("Invalid created_at timestamp: {e}")))?
            .with_timezone(&Utc);

        Ok(PendingSyncEntry {
            entry_key: row.entry_key,
            visit_id,
            patient_id,
            records,
            created_at,
            sync_attempts: row.sync_attempts,
            state,
        })
    }
}

#[async_trait]
impl PendingStore for SqlitePendingStore {
    async fn put(&self, entry: &PendingSyncEntry) -> Result<(), RelayError> {
        let records_json = serde_json::to_string(&entry.records).map_err(StoreError::from)?;
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO pending_entries
                (entry_key, visit_id, patient_id, records, state, sync_attempts, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(entry_key) DO UPDATE SET
                visit_id = excluded.visit_id,
                patient_id = excluded.patient_id,
                records = excluded.records,
                state = excluded.state,
                sync_attempts = excluded.sync_attempts,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at
            "#,
            params![
                entry.entry_key,
                entry.visit_id.as_i64(),
                entry.patient_id.as_str(),
                records_json,
                entry.state.as_str(),
                entry.sync_attempts,
                entry.created_at.to_rfc3339(),
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn get(&self, entry_key: &str) -> Result<Option<PendingSyncEntry>, RelayError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM pending_entries WHERE entry_key = ?"),
                [entry_key],
                map_row,
            )
            .optional()
            .map_err(StoreError::from)?;

        Ok(row.map(PendingSyncEntry::try_from).transpose()?)
    }

    async fn list_by_state(&self, state: SyncState) -> Result<Vec<PendingSyncEntry>, RelayError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM pending_entries WHERE state = ? ORDER BY created_at ASC"
            ))
            .map_err(StoreError::from)?;

        let rows = stmt
            .query_map([state.as_str()], map_row)
            .map_err(StoreError::from)?;

        let mut entries = Vec::new();
        for row in rows {
            let row = row.map_err(StoreError::from)?;
            entries.push(PendingSyncEntry::try_from(row)?);
        }
        Ok(entries)
    }

    async fn list_all(&self) -> Result<Vec<PendingSyncEntry>, RelayError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM pending_entries ORDER BY created_at ASC"
            ))
            .map_err(StoreError::from)?;

        let rows = stmt.query_map([], map_row).map_err(StoreError::from)?;

        let mut entries = Vec::new();
        for row in rows {
            let row = row.map_err(StoreError::from)?;
            entries.push(PendingSyncEntry::try_from(row)?);
        }
        Ok(entries)
    }

    async fn delete(&self, entry_key: &str) -> Result<bool, RelayError> {
        let conn = self.lock()?;
        let rows_affected = conn
            .execute("DELETE FROM pending_entries WHERE entry_key = ?", [entry_key])
            .map_err(StoreError::from)?;
        Ok(rows_affected > 0)
    }
}
