//! Persistence slot contracts and implementations.
//!
//! # Responsibility
//! - Provide a single named key-value entry holding the serialized collection.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `write` replaces the whole payload; there is no incremental format.
//! - `read` returns `None` for a slot that was never written or was cleared.

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key used when callers do not pick their own.
pub const DEFAULT_SLOT_KEY: &str = "academic_calendar_items";

pub type SlotResult<T> = Result<T, SlotError>;

/// Storage-level failure while opening or touching a slot.
#[derive(Debug)]
pub enum SlotError {
    Sqlite(rusqlite::Error),
    /// The slot database was written by a newer schema than this build knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Backend refused the operation (quota, read-only medium, ...).
    Unavailable(String),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "slot database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Durable storage location for one serialized payload.
pub trait PersistenceSlot {
    /// Name of the entry this slot reads and writes.
    fn slot_key(&self) -> &str;
    fn read(&self) -> SlotResult<Option<String>>;
    fn write(&self, payload: &str) -> SlotResult<()>;
    fn clear(&self) -> SlotResult<()>;
}

impl<T: PersistenceSlot + ?Sized> PersistenceSlot for &T {
    fn slot_key(&self) -> &str {
        (**self).slot_key()
    }

    fn read(&self) -> SlotResult<Option<String>> {
        (**self).read()
    }

    fn write(&self, payload: &str) -> SlotResult<()> {
        (**self).write(payload)
    }

    fn clear(&self) -> SlotResult<()> {
        (**self).clear()
    }
}

/// SQLite-backed slot stored as one row of `storage_slots`.
pub struct SqliteSlot<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteSlot<'conn> {
    /// Binds the default slot key on a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_key(conn, DEFAULT_SLOT_KEY)
    }

    pub fn with_key(conn: &'conn Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }
}

impl PersistenceSlot for SqliteSlot<'_> {
    fn slot_key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> SlotResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM storage_slots WHERE slot_key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write(&self, payload: &str) -> SlotResult<()> {
        self.conn.execute(
            "INSERT INTO storage_slots (slot_key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(slot_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), payload],
        )?;
        debug!(
            "event=slot_write module=repo status=ok backend=sqlite bytes={}",
            payload.len()
        );
        Ok(())
    }

    fn clear(&self) -> SlotResult<()> {
        self.conn.execute(
            "DELETE FROM storage_slots WHERE slot_key = ?1;",
            [self.key.as_str()],
        )?;
        Ok(())
    }
}

/// Process-local slot for embedders without a database.
#[derive(Debug)]
pub struct MemorySlot {
    key: String,
    payload: RefCell<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self {
            key: DEFAULT_SLOT_KEY.to_string(),
            payload: RefCell::new(None),
        }
    }

    /// Creates a slot that already holds `payload`.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        let slot = Self::new();
        slot.payload.replace(Some(payload.into()));
        slot
    }

    /// Returns a copy of the current payload.
    pub fn payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }
}

impl Default for MemorySlot {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistenceSlot for MemorySlot {
    fn slot_key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> SlotResult<Option<String>> {
        Ok(self.payload())
    }

    fn write(&self, payload: &str) -> SlotResult<()> {
        self.payload.replace(Some(payload.to_string()));
        Ok(())
    }

    fn clear(&self) -> SlotResult<()> {
        self.payload.replace(None);
        Ok(())
    }
}
