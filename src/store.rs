//! Store Module
//!
//! The core component: a key-value contract mapped onto one durable SQLite
//! table with timestamps, prefix search, and upsert semantics.
//!
//! ## Responsibilities
//! - Open/create the backing file and table (WAL mode)
//! - Translate each operation into exactly one statement execution
//! - Encode/decode values through the configured codec
//!
//! ## Concurrency Model
//!
//! Fully synchronous: every operation blocks the caller until the statement
//! completes. No locking above what SQLite provides; WAL mode lets readers
//! proceed while a writer commits, writers serialize at the engine level.
//! `set` is a single atomic upsert, so two concurrent writers of the same
//! key cannot race a lookup against an insert.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::codec::{Codec, JsonCodec};
use crate::config::Config;
use crate::error::{KvError, Result};
use crate::record::Record;

/// Per-table SQL text, built once at open
///
/// The table name is baked into these strings (identifiers cannot be bound
/// as parameters); everything else binds through `?N` placeholders.
struct Sql {
    get: String,
    upsert: String,
    delete: String,
    all: String,
    find: String,
    record: String,
    count: String,
}

impl Sql {
    fn new(table: &str, escape_like_wildcards: bool) -> Self {
        let find = if escape_like_wildcards {
            format!("SELECT key, value FROM {table} WHERE key LIKE ?1 ESCAPE '\\'")
        } else {
            format!("SELECT key, value FROM {table} WHERE key LIKE ?1")
        };
        Self {
            get: format!("SELECT value FROM {table} WHERE key = ?1 LIMIT 1"),
            upsert: format!(
                "INSERT INTO {table} (key, value, ctime, mtime) VALUES (?1, ?2, ?3, ?3) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, mtime = excluded.mtime"
            ),
            delete: format!("DELETE FROM {table} WHERE key = ?1"),
            all: format!("SELECT key, value FROM {table}"),
            find,
            record: format!("SELECT key, value, ctime, mtime FROM {table} WHERE key = ?1 LIMIT 1"),
            count: format!("SELECT COUNT(*) FROM {table}"),
        }
    }
}

/// Persistent key-value store over one SQLite table
///
/// Owns its connection exclusively; `close` (or drop) releases it, and a new
/// store must be constructed to resume use. Opening the same path/table
/// again sees all previously committed data.
pub struct Store<C: Codec = JsonCodec> {
    /// Store configuration
    config: Config,

    /// Exclusive connection to the backing file
    conn: Connection,

    /// Value codec (JSON by default)
    codec: C,

    /// Prepared SQL text, scoped to the configured table
    sql: Sql,
}

impl<C: Codec> std::fmt::Debug for Store<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.config.path)
            .field("table", &self.config.table_name)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Open or create a store with the given config (JSON codec)
    ///
    /// Enables WAL journal mode and creates the backing table if missing.
    /// Idempotent: repeated opens against the same path/table keep existing
    /// data. Fails with `StorageUnavailable` if the file cannot be
    /// opened/created, `InvalidTableName` if the table name is not a bare
    /// identifier.
    pub fn open(config: Config) -> Result<Self> {
        Self::open_with_codec(config, JsonCodec)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified database file
    pub fn open_path(path: &Path) -> Result<Self> {
        let mut config = Config::default();
        config.path = path.to_path_buf();
        Self::open(config)
    }
}

impl<C: Codec> Store<C> {
    /// Open or create a store with an explicit codec
    pub fn open_with_codec(config: Config, codec: C) -> Result<Self> {
        validate_table_name(&config.table_name)?;

        // Step 1: Ensure the parent directory exists
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| KvError::StorageUnavailable {
                    path: config.path.display().to_string(),
                    reason: e.to_string(),
                })?;
            }
        }

        // Step 2: Open/create the backing file
        let conn = Connection::open(&config.path).map_err(|e| KvError::StorageUnavailable {
            path: config.path.display().to_string(),
            reason: e.to_string(),
        })?;

        // Step 3: Enable WAL so readers proceed while a writer commits
        let mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;

        // Step 4: Ensure the table exists
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} \
                 (key TEXT PRIMARY KEY, value TEXT, ctime INTEGER, mtime INTEGER)",
                config.table_name
            ),
            [],
        )?;

        debug!(
            path = %config.path.display(),
            table = %config.table_name,
            journal_mode = %mode,
            "store opened"
        );

        let sql = Sql::new(&config.table_name, config.escape_like_wildcards);
        Ok(Self {
            config,
            conn,
            codec,
            sql,
        })
    }

    /// Get a value by key
    ///
    /// Returns `Ok(None)` when no record exists or its value column is
    /// NULL/empty. A stored text that fails to decode propagates as
    /// `KvError::Decode` (never silently treated as absent); the same policy
    /// applies to `all` and `find`.
    pub fn get<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        let mut stmt = self.conn.prepare_cached(&self.sql.get)?;
        let value: Option<Option<String>> = stmt
            .query_row(params![key], |row| row.get(0))
            .optional()?;

        match value.flatten() {
            Some(text) if !text.is_empty() => Ok(Some(self.decode(key, &text)?)),
            _ => Ok(None),
        }
    }

    /// Set a key to a value (chainable)
    ///
    /// One atomic upsert: inserts a fresh record with `ctime = mtime = now`,
    /// or on key conflict updates `value` and `mtime` only, leaving `ctime`
    /// untouched. Exactly one durable write either way.
    pub fn set<V: Serialize>(&self, key: &str, value: &V) -> Result<&Self> {
        let text = self.codec.encode(value)?;
        let now = now_millis();

        let mut stmt = self.conn.prepare_cached(&self.sql.upsert)?;
        stmt.execute(params![key, text, now])?;
        Ok(self)
    }

    /// Delete a key
    ///
    /// Returns true iff a row was actually removed; a missing key returns
    /// false, not an error.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let mut stmt = self.conn.prepare_cached(&self.sql.delete)?;
        let changes = stmt.execute(params![key])?;
        Ok(changes > 0)
    }

    /// Get every record, decoded, as a key -> value mapping
    ///
    /// Records with a NULL/empty value column are skipped, matching `get`
    /// absence semantics. Unbounded result size; intended for
    /// small-to-medium tables.
    pub fn all<V: DeserializeOwned>(&self) -> Result<BTreeMap<String, V>> {
        let mut stmt = self.conn.prepare_cached(&self.sql.all)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })?;
        self.collect_rows(rows)
    }

    /// Get all records whose key starts with `prefix`, decoded
    ///
    /// Matching uses `LIKE prefix || '%'`. By default LIKE metacharacters
    /// (`%`, `_`) inside `prefix` are NOT escaped, so a prefix like `"50%"`
    /// matches more broadly than a literal prefix would. Set
    /// `escape_like_wildcards` in the config for literal prefix semantics.
    pub fn find<V: DeserializeOwned>(&self, prefix: &str) -> Result<BTreeMap<String, V>> {
        let pattern = self.like_pattern(prefix);
        let mut stmt = self.conn.prepare_cached(&self.sql.find)?;
        let rows = stmt.query_map(params![pattern], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })?;
        self.collect_rows(rows)
    }

    /// Get the raw record for a key, timestamps included
    ///
    /// Unlike `get`, a record with a NULL/empty value is still returned.
    pub fn record(&self, key: &str) -> Result<Option<Record>> {
        let mut stmt = self.conn.prepare_cached(&self.sql.record)?;
        let record = stmt
            .query_row(params![key], |row| {
                Ok(Record {
                    key: row.get(0)?,
                    value: row.get(1)?,
                    ctime: row.get(2)?,
                    mtime: row.get(3)?,
                })
            })
            .optional()?;
        Ok(record)
    }

    /// Number of records in the table
    pub fn len(&self) -> Result<usize> {
        let mut stmt = self.conn.prepare_cached(&self.sql.count)?;
        let count: i64 = stmt.query_row([], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// True if the table holds no records
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Close the store, releasing the backing connection
    ///
    /// Consumes the store, so no operation can run afterwards; construct a
    /// new store to resume use. Dropping the store releases the connection
    /// as well, but `close` surfaces any final engine error.
    pub fn close(self) -> Result<()> {
        let Store { conn, config, .. } = self;
        debug!(path = %config.path.display(), "store closed");
        conn.close().map_err(|(_conn, err)| KvError::from(err))
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Decode stored text, attributing failures to `key`
    fn decode<V: DeserializeOwned>(&self, key: &str, text: &str) -> Result<V> {
        self.codec.decode(text).map_err(|e| match e {
            KvError::Decode { reason, .. } => KvError::Decode {
                key: key.to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Build the LIKE pattern for a prefix scan
    fn like_pattern(&self, prefix: &str) -> String {
        if self.config.escape_like_wildcards {
            let mut pattern = String::with_capacity(prefix.len() + 1);
            for ch in prefix.chars() {
                if matches!(ch, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(ch);
            }
            pattern.push('%');
            pattern
        } else {
            format!("{prefix}%")
        }
    }

    /// Decode a (key, value) row stream into a mapping, skipping absent values
    fn collect_rows<V: DeserializeOwned>(
        &self,
        rows: impl Iterator<Item = rusqlite::Result<(String, Option<String>)>>,
    ) -> Result<BTreeMap<String, V>> {
        let mut map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            if let Some(text) = value.filter(|t| !t.is_empty()) {
                let decoded = self.decode(&key, &text)?;
                map.insert(key, decoded);
            }
        }
        Ok(map)
    }
}

/// Validate a table name as a bare SQL identifier
///
/// The name is interpolated into SQL text, so anything beyond
/// `[A-Za-z_][A-Za-z0-9_]*` is rejected up front.
fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(KvError::InvalidTableName(name.to_string()))
    }
}

/// Current time in milliseconds since the Unix epoch
fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64)
}
