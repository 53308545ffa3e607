//! Core module - fundamental types and utilities

pub mod entity;
pub mod error;
pub mod geo;
pub mod identity;
pub mod store;

pub use entity::Entity;
pub use error::{ConflictError, Error, Result, SubscriberFailures, ValidationError};
pub use geo::{haversine_km, Coordinates, Location};
pub use identity::{EntityId, EntityKind};
pub use store::{EntityStore, Patch};
