//! Domain model for the pets catalog.
//!
//! # Responsibility
//! - Define the row record and the write set used by the provider.
//!
//! # Invariants
//! - Write sets are validated before they reach storage.

pub mod pet;
