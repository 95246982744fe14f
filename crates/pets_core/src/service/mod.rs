//! Core use-case services.
//!
//! # Responsibility
//! - Mediate caller requests into repository calls.
//! - Keep presentation layers decoupled from storage details.

pub mod pet_provider;
