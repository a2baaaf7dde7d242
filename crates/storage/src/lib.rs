//! `stockroom-storage` — persistence adapters for the ledger's collections.
//!
//! The adapter boundary is [`SnapshotStore`]: whole-collection writes, one
//! durable collection per entity type plus the business-info singleton.
//! Backends:
//!
//! - [`SqliteStore`]: the relational backend (JSON documents keyed by
//!   collection + id).
//! - [`JsonFileStore`]: local key-value fallback, one JSON file per
//!   collection.
//! - [`MemoryStore`]: in-process, for tests and ephemeral sessions.
//! - [`FallbackStore`]: tries a primary backend and degrades to a fallback
//!   once, logging the failure.
//!
//! Persistence is fire-and-forget relative to the in-memory ledger: the
//! ledger commits optimistically and never rolls back on a failed write, so
//! durable state may lag in-memory state.

pub mod config;
pub mod fallback;
pub mod file;
pub mod memory;
pub mod snapshot;
pub mod sqlite;

pub use config::StorageConfig;
pub use fallback::FallbackStore;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;
pub use sqlite::SqliteStore;
