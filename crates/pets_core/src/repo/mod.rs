//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the single-table store contract the provider depends on.
//! - Isolate SQLite query details from routing and validation.
//!
//! # Invariants
//! - Repositories do not validate write sets; the provider does so first.

pub mod pet_repo;
pub mod selection;
