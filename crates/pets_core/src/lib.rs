//! Core data access for the pets catalog.
//! Routes `pets` / `pets/{id}` requests to a single SQLite table, validates
//! writes and publishes change signals.

pub mod config;
pub mod contract;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod path;
pub mod repo;
pub mod service;

pub use config::PetsConfig;
pub use contract::{is_valid_gender, Gender, PetColumn};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::pet::{Field, Pet, PetId, PetValidationError, PetValues};
pub use notify::{ChangeBus, ChangeObserver, ObserverId};
pub use path::{InvalidPathError, PathKind, PetPath};
pub use repo::pet_repo::{PetRepository, RepoError, RepoResult, SqlitePetRepository};
pub use repo::selection::{Direction, Selection, SortOrder};
pub use service::pet_provider::{PetProvider, ProviderError, ProviderResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
