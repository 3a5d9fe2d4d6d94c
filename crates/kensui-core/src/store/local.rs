//! Local guest storage.
//!
//! Sessions without an account persist to a SQLite key-value table on
//! this device. Documents are JSON strings under fixed `guest/...`
//! keys, the same shapes the remote store keeps per account, so the
//! engine never notices which backend served it. A document that fails
//! to parse is logged and treated as absent; losing a corrupt guest
//! history beats refusing to start.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use super::StreakStats;
use crate::error::{Result, StoreError};
use crate::rank::DEFAULT_RANK;
use crate::record::{SetDraft, SetRecord};

const RANK_KEY: &str = "guest/rank";
const STATS_KEY: &str = "guest/stats";
const RECORDS_KEY: &str = "guest/records";

/// SQLite-backed store for the guest namespace.
pub struct LocalStore {
    conn: Mutex<Connection>,
}

impl LocalStore {
    /// Open the guest store at `~/.config/kensui/kensui.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = super::data_dir()?.join("kensui.db");
        Self::open_at(&path)
    }

    /// Open the guest store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(StoreError::from)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store (tests, ephemeral sessions).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.lock().execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    /// Get a value from the kv store.
    fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Read one JSON document. Missing and corrupt documents both come
    /// back as `None`; corruption is logged.
    fn read_doc<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.kv_get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(doc) => Ok(Some(doc)),
            Err(err) => {
                warn!(key, error = %err, "corrupt guest document, treating it as absent");
                Ok(None)
            }
        }
    }

    fn write_doc<T: Serialize>(&self, key: &str, doc: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(doc).map_err(|err| StoreError::Corrupt {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        self.kv_set(key, &raw)
    }

    // ── Progress documents ──────────────────────────────────────────

    pub fn get_rank(&self) -> Result<u32, StoreError> {
        Ok(self.read_doc::<u32>(RANK_KEY)?.unwrap_or(DEFAULT_RANK))
    }

    pub fn set_rank(&self, rank: u32) -> Result<(), StoreError> {
        self.write_doc(RANK_KEY, &rank)
    }

    pub fn get_stats(&self) -> Result<StreakStats, StoreError> {
        Ok(self.read_doc(STATS_KEY)?.unwrap_or_default())
    }

    pub fn set_stats(&self, stats: &StreakStats) -> Result<(), StoreError> {
        self.write_doc(STATS_KEY, stats)
    }

    /// Append one record to the guest ledger. The ledger is a single
    /// JSON array; callers serialize concurrent appends.
    pub fn append_record(
        &self,
        draft: &SetDraft,
        created_at: DateTime<Utc>,
    ) -> Result<SetRecord, StoreError> {
        let mut records: Vec<SetRecord> = self.read_doc(RECORDS_KEY)?.unwrap_or_default();
        let record = SetRecord {
            id: Uuid::new_v4().to_string(),
            level: draft.level.clone(),
            title: draft.title.clone(),
            created_at,
            sets: draft.sets,
        };
        records.push(record.clone());
        self.write_doc(RECORDS_KEY, &records)?;
        Ok(record)
    }

    /// All guest records, newest first.
    pub fn list_records(&self) -> Result<Vec<SetRecord>, StoreError> {
        let mut records: Vec<SetRecord> = self.read_doc(RECORDS_KEY)?.unwrap_or_default();
        // Stored in insertion order; the ledger is served newest first.
        records.reverse();
        Ok(records)
    }
}
