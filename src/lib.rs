//! # kvlite
//!
//! A persistent key-value store layered on embedded SQLite with:
//! - Typed get/set/delete over string keys and JSON-serializable values
//! - Creation/modification timestamps per record
//! - Prefix search and full scans
//! - WAL journal mode for concurrent readers
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller                                │
//! │              get / set / delete / all / find                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Store                                  │
//! │         (one statement per operation, atomic upsert)         │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!     ┌─────────────┐               ┌─────────────┐
//!     │    Codec    │               │   SQLite    │
//!     │   (JSON)    │               │ (WAL mode)  │
//!     └─────────────┘               └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use kvlite::{Config, Store};
//!
//! let store = Store::open(Config::builder().path("./kvs.db").build()).unwrap();
//! store.set("user:1", &"alice").unwrap();
//! let name: Option<String> = store.get("user:1").unwrap();
//! assert_eq!(name.as_deref(), Some("alice"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod record;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use codec::{Codec, JsonCodec};
pub use record::Record;
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvlite
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
