//! Filiere: flat-file supply-chain entity management
//!
//! A library and CLI for keeping four entity collections (suppliers, raw
//! materials, warehouses, routes) referentially consistent on top of plain
//! JSON files, with automatic warehouse reconciliation and derived route
//! transport metadata.

pub mod cli;
pub mod core;
pub mod entities;
pub mod graph;
pub mod persistence;
