//! Error taxonomy for the entity graph engine
//!
//! All failures are typed and returned to the caller; nothing is retried
//! internally. Subscriber failures are the one place errors are isolated:
//! each broadcast collects them and reports them once to the caller that
//! triggered the mutation.

use thiserror::Error;

use crate::core::identity::{EntityId, EntityKind};
use crate::persistence::PersistenceError;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level engine error
#[derive(Debug, Error)]
pub enum Error {
    /// An operation referenced an ID absent from its store
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    /// Entity fields violate domain constraints; raised before any mutation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Delete would orphan a reference, or an insert collided with an
    /// existing ID; the caller must resolve explicitly
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// The external store failed to load or save; surfaced unchanged
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// One or more subscribers failed during a broadcast; the mutation
    /// itself is already committed
    #[error(transparent)]
    Subscriber(#[from] SubscriberFailures),
}

impl Error {
    pub fn not_found(kind: EntityKind, id: &EntityId) -> Self {
        Error::NotFound {
            kind,
            id: id.clone(),
        }
    }
}

/// Field-level constraint violations, collected per operation
#[derive(Debug, Error)]
#[error("validation failed: {}", issues.join("; "))]
pub struct ValidationError {
    pub issues: Vec<String>,
}

impl ValidationError {
    pub fn new(issues: Vec<String>) -> Self {
        Self { issues }
    }

    pub fn single(issue: impl Into<String>) -> Self {
        Self {
            issues: vec![issue.into()],
        }
    }
}

/// Conflicting state the caller must resolve explicitly
#[derive(Debug, Error)]
pub enum ConflictError {
    #[error("{kind} {id} already exists")]
    DuplicateId { kind: EntityKind, id: EntityId },

    #[error("route for pair ({supplier_id}, {warehouse_id}) already exists as {route_id}")]
    DuplicateRoute {
        supplier_id: EntityId,
        warehouse_id: EntityId,
        route_id: EntityId,
    },

    #[error("{kind} {id} is still referenced by {}; delete with cascade to remove the dependents", referents.join(", "))]
    StillReferenced {
        kind: EntityKind,
        id: EntityId,
        referents: Vec<String>,
    },
}

/// A single subscriber failure captured during a broadcast
#[derive(Debug)]
pub struct SubscriberFailure {
    /// Registered subscriber name
    pub subscriber: String,
    /// Rendered error message from the subscriber
    pub message: String,
}

/// All subscriber failures collected from the broadcasts of one operation
#[derive(Debug, Error)]
#[error("{} subscriber(s) failed: {}", failures.len(), summary(failures))]
pub struct SubscriberFailures {
    pub failures: Vec<SubscriberFailure>,
}

fn summary(failures: &[SubscriberFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.subscriber, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}
