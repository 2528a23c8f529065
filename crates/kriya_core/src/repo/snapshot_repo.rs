//! Snapshot store contract and SQLite-backed implementation.
//!
//! # Responsibility
//! - Provide `save`/`load` of one serialized snapshot per storage key.
//!
//! # Invariants
//! - Storage keys are non-blank.
//! - `save` fully replaces the previous payload for the key.

use crate::db::DbError;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used when the caller does not configure one.
pub const DEFAULT_STORAGE_KEY: &str = "kriya-flowchart";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    InvalidKey(String),
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKey(_) => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Opaque key-value persistence for the serialized diagram.
pub trait SnapshotStore {
    fn save(&self, payload: &str) -> StoreResult<()>;
    fn load(&self) -> StoreResult<Option<String>>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for &T {
    fn save(&self, payload: &str) -> StoreResult<()> {
        (**self).save(payload)
    }

    fn load(&self) -> StoreResult<Option<String>> {
        (**self).load()
    }
}

/// SQLite-backed snapshot store bound to one storage key.
pub struct SqliteSnapshotStore<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteSnapshotStore<'conn> {
    /// Binds a store to `key` on an already migrated connection.
    ///
    /// # Errors
    /// - `StoreError::InvalidKey` when `key` is blank.
    pub fn try_new(conn: &'conn Connection, key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(StoreError::InvalidKey(key));
        }
        Ok(Self {
            conn,
            key: trimmed.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Removes the stored payload for this key.
    pub fn remove(&self) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM snapshots WHERE storage_key = ?1;", [&self.key])?;
        Ok(changed > 0)
    }
}

impl SnapshotStore for SqliteSnapshotStore<'_> {
    fn save(&self, payload: &str) -> StoreResult<()> {
        let result = self.conn.execute(
            "INSERT INTO snapshots (storage_key, payload)
             VALUES (?1, ?2)
             ON CONFLICT(storage_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.key.as_str(), payload],
        );

        match result {
            Ok(_) => {
                debug!(
                    "event=snapshot_save module=repo status=ok bytes={}",
                    payload.len()
                );
                Ok(())
            }
            Err(err) => {
                error!("event=snapshot_save module=repo status=error error={err}");
                Err(err.into())
            }
        }
    }

    fn load(&self) -> StoreResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE storage_key = ?1;",
                [&self.key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        debug!(
            "event=snapshot_load module=repo status=ok found={}",
            payload.is_some()
        );
        Ok(payload)
    }
}
