//! Entity type definitions

pub mod material;
pub mod route;
pub mod supplier;
pub mod warehouse;

pub use material::{MaterialQuality, RawMaterial};
pub use route::{Route, TransportMode};
pub use supplier::Supplier;
pub use warehouse::Warehouse;
