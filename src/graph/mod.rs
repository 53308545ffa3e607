//! Entity graph - indices, reconciliation, classification, notification

pub mod automap;
pub mod classify;
pub mod engine;
pub mod notify;
pub mod resolver;

pub use automap::{AggregationTarget, AutoMapper, ReconcileOutcome};
pub use classify::{classify, RouteSpec};
pub use engine::{IntegrityReport, SupplyGraph};
pub use notify::{ChangeEvent, ChangeNotifier, Interest, Operation, Subscriber};
pub use resolver::ReferenceResolver;
