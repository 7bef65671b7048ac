//! Record Module
//!
//! The durable unit of storage: one row of the backing table.

use serde::Serialize;

/// One durable key/value/timestamps row
///
/// Timestamps are milliseconds since the Unix epoch. `ctime` is set once at
/// insert and never mutated; `mtime` is set at insert and on every update,
/// so `mtime >= ctime` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Primary identity, unique across the table
    pub key: String,

    /// Serialized value text; `None` (or empty) reads as absent
    pub value: Option<String>,

    /// Creation time (ms since epoch), immutable after insert
    pub ctime: i64,

    /// Last-modified time (ms since epoch), touched on every update
    pub mtime: i64,
}
