//! ChangeNotifier - synchronous mutation broadcast
//!
//! Subscribers register interest in one entity kind (or all) and receive
//! every committed mutation in registration order. Delivery is synchronous,
//! never queued or retried. A failing subscriber does not block the ones
//! after it; the failures from one broadcast are collected and surfaced
//! once to the caller that triggered the mutation.

use serde::Serialize;

use crate::core::error::{SubscriberFailure, SubscriberFailures};
use crate::core::identity::{EntityId, EntityKind};

/// Mutation kind observed by subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// One committed mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub kind: EntityKind,
    pub op: Operation,
    pub id: EntityId,
}

impl ChangeEvent {
    pub fn new(kind: EntityKind, op: Operation, id: &EntityId) -> Self {
        Self {
            kind,
            op,
            id: id.clone(),
        }
    }
}

/// What a subscriber wants to hear about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    All,
    Kind(EntityKind),
}

impl Interest {
    fn matches(&self, event: &ChangeEvent) -> bool {
        match self {
            Interest::All => true,
            Interest::Kind(kind) => *kind == event.kind,
        }
    }
}

/// A mutation observer
pub trait Subscriber {
    /// Name used when reporting failures
    fn name(&self) -> &str;

    fn on_event(
        &mut self,
        event: &ChangeEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

struct Registration {
    interest: Interest,
    subscriber: Box<dyn Subscriber>,
}

/// Observer registry; delivery follows registration order
#[derive(Default)]
pub struct ChangeNotifier {
    registrations: Vec<Registration>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, interest: Interest, subscriber: Box<dyn Subscriber>) {
        self.registrations.push(Registration {
            interest,
            subscriber,
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.registrations.len()
    }

    /// Deliver an event to every matching subscriber; failures are
    /// collected per subscriber, never short-circuiting delivery
    pub fn broadcast(&mut self, event: &ChangeEvent) -> Vec<SubscriberFailure> {
        let mut failures = Vec::new();
        for registration in &mut self.registrations {
            if !registration.interest.matches(event) {
                continue;
            }
            if let Err(err) = registration.subscriber.on_event(event) {
                tracing::warn!(
                    subscriber = registration.subscriber.name(),
                    %event.id,
                    "subscriber failed: {err}"
                );
                failures.push(SubscriberFailure {
                    subscriber: registration.subscriber.name().to_string(),
                    message: err.to_string(),
                });
            }
        }
        failures
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.registrations.len())
            .finish()
    }
}

/// Turn collected failures into a single reportable error, if any
pub(crate) fn failures_into_result(failures: Vec<SubscriberFailure>) -> Result<(), SubscriberFailures> {
    if failures.is_empty() {
        Ok(())
    } else {
        Err(SubscriberFailures { failures })
    }
}
