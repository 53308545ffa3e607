//! Persistence collaborator contract
//!
//! The engine consumes, but does not own, a backing store that can load and
//! save whole collections of raw JSON records. Partial writes are not
//! supported: `save` overwrites the entire collection. Concurrent writers
//! across processes are not coordinated here; the last full overwrite wins.

pub mod json_file;
pub mod memory;

use serde_json::Value;
use thiserror::Error;

use crate::core::identity::EntityKind;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Failures at the persistence boundary; surfaced unchanged, never retried
/// by the engine
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backing resource for a collection does not exist. This is an
    /// error, not an empty collection; `init` seeds the empty files.
    #[error("collection {collection} has no backing resource at {path}")]
    Missing { collection: String, path: String },

    #[error("failed to {action} {path}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("collection {collection} is not a JSON array")]
    NotAnArray { collection: String },

    #[error("failed to encode {collection} records")]
    Encode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Whole-collection load/save over raw JSON records
pub trait Persistence {
    /// Return the full collection in stored order
    fn load(&self, kind: EntityKind) -> Result<Vec<Value>, PersistenceError>;

    /// Atomically overwrite the entire collection
    fn save(&self, kind: EntityKind, records: &[Value]) -> Result<(), PersistenceError>;
}
