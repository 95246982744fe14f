//! Pet data provider: routing, validation and change notification.
//!
//! # Responsibility
//! - Route `pets` / `pets/{id}` addresses to store operations.
//! - Validate write sets before any store call.
//! - Publish change signals after mutations that affected rows.
//!
//! # Invariants
//! - Item addresses replace any caller selection with `_id = <id>`.
//! - Insert is only defined on the collection address.
//! - Validation and routing failures never reach the store.
//! - No notification is published for failed or zero-row mutations.
//! - The provider caches no rows; every query reads the store.

use crate::db::{open_db, open_db_in_memory};
use crate::model::pet::{Pet, PetId, PetValidationError, PetValues};
use crate::notify::ChangeBus;
use crate::path::{InvalidPathError, PathKind, PetPath};
use crate::repo::pet_repo::{PetRepository, RepoError, SqlitePetRepository};
use crate::repo::selection::{Selection, SortOrder};
use log::{debug, error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failure taxonomy surfaced to provider callers.
#[derive(Debug)]
pub enum ProviderError {
    /// Address matches neither `pets` nor `pets/{id}`.
    InvalidAddress(String),
    /// Operation is not defined for this address shape.
    UnsupportedOperation {
        operation: &'static str,
        path: PetPath,
    },
    Validation(PetValidationError),
    /// The store rejected the call; no partial mutation is assumed.
    Storage(RepoError),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAddress(address) => write!(f, "unknown pets address `{address}`"),
            Self::UnsupportedOperation { operation, path } => {
                write!(f, "{operation} is not supported for `{path}`")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::InvalidAddress(_) | Self::UnsupportedOperation { .. } => None,
        }
    }
}

impl From<InvalidPathError> for ProviderError {
    fn from(value: InvalidPathError) -> Self {
        Self::InvalidAddress(value.address)
    }
}

impl From<PetValidationError> for ProviderError {
    fn from(value: PetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ProviderError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Mediation layer over one pets store.
pub struct PetProvider<R: PetRepository = SqlitePetRepository> {
    repo: R,
    bus: Arc<ChangeBus>,
}

impl PetProvider<SqlitePetRepository> {
    /// Opens (creating if needed) the database file and binds a provider to it.
    pub fn open(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let conn = open_db(path).map_err(RepoError::from)?;
        Ok(Self::new(SqlitePetRepository::try_new(conn)?))
    }

    /// Opens a provider over a fresh in-memory database.
    pub fn open_in_memory() -> ProviderResult<Self> {
        let conn = open_db_in_memory().map_err(RepoError::from)?;
        Ok(Self::new(SqlitePetRepository::try_new(conn)?))
    }

    /// Releases the store handle.
    pub fn close(self) -> ProviderResult<()> {
        self.repo.close()?;
        debug!("event=provider_close module=provider status=ok");
        Ok(())
    }
}

impl<R: PetRepository> PetProvider<R> {
    /// Binds a provider to `repo` with its own change bus.
    pub fn new(repo: R) -> Self {
        Self::with_bus(repo, Arc::new(ChangeBus::new()))
    }

    /// Binds a provider to `repo`, publishing on a shared bus.
    pub fn with_bus(repo: R, bus: Arc<ChangeBus>) -> Self {
        Self { repo, bus }
    }

    /// Bus that observers subscribe to.
    pub fn observers(&self) -> &Arc<ChangeBus> {
        &self.bus
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Classifies `address` as collection or item.
    pub fn type_of(&self, address: &str) -> ProviderResult<PathKind> {
        Ok(route(address)?.kind())
    }

    /// Returns rows at `address`.
    ///
    /// Collection addresses honor `selection` (all rows when `None`); item
    /// addresses ignore it and match on id. Without `order`, rows come back in
    /// ascending id order.
    pub fn query(
        &self,
        address: &str,
        selection: Option<Selection>,
        order: Option<SortOrder>,
    ) -> ProviderResult<Vec<Pet>> {
        let path = route(address)?;
        let selection = scoped_selection(path, selection);
        let pets = match self.repo.query_pets(selection.as_ref(), order) {
            Ok(pets) => pets,
            Err(err) => {
                error!(
                    "event=pet_query module=provider status=error path={path} error_code=storage error={err}"
                );
                return Err(err.into());
            }
        };
        debug!(
            "event=pet_query module=provider status=ok path={} rows={}",
            path,
            pets.len()
        );
        Ok(pets)
    }

    /// Returns one pet by id.
    pub fn get(&self, id: PetId) -> ProviderResult<Option<Pet>> {
        let pets = self.repo.query_pets(Some(&Selection::by_id(id)), None)?;
        Ok(pets.into_iter().next())
    }

    /// Number of rows in the table.
    pub fn count(&self) -> ProviderResult<usize> {
        Ok(self.repo.count_pets(None)?)
    }

    /// Inserts one pet at the collection address and returns its new id.
    ///
    /// # Errors
    /// - `UnsupportedOperation` for item addresses.
    /// - `Validation` when name, gender or weight preconditions fail.
    /// - `Storage` when the store rejects the row; nothing is published.
    pub fn insert(&self, address: &str, values: &PetValues) -> ProviderResult<PetId> {
        let path = route(address)?;
        if path != PetPath::Collection {
            warn!(
                "event=pet_insert module=provider status=error path={path} error_code=unsupported_operation"
            );
            return Err(ProviderError::UnsupportedOperation {
                operation: "insert",
                path,
            });
        }

        if let Err(err) = values.validate_for_insert() {
            warn!(
                "event=pet_insert module=provider status=error path={} error_code=validation field={}",
                path,
                err.field()
            );
            return Err(err.into());
        }

        let id = match self.repo.insert_pet(values) {
            Ok(id) => id,
            Err(err) => {
                error!(
                    "event=pet_insert module=provider status=error path={path} error_code=storage error={err}"
                );
                return Err(err.into());
            }
        };

        debug!("event=pet_insert module=provider status=ok path={path} id={id}");
        self.bus.notify_change(PetPath::Collection);
        Ok(id)
    }

    /// Applies present fields of `values` to rows at `address`.
    ///
    /// Returns the number of rows changed; an empty write set returns 0
    /// without touching the store.
    pub fn update(
        &self,
        address: &str,
        values: &PetValues,
        selection: Option<Selection>,
    ) -> ProviderResult<usize> {
        let path = route(address)?;

        if let Err(err) = values.validate_for_update() {
            warn!(
                "event=pet_update module=provider status=error path={} error_code=validation field={}",
                path,
                err.field()
            );
            return Err(err.into());
        }

        if values.is_empty() {
            return Ok(0);
        }

        let selection = scoped_selection(path, selection);
        let changed = match self.repo.update_pets(values, selection.as_ref()) {
            Ok(changed) => changed,
            Err(err) => {
                error!(
                    "event=pet_update module=provider status=error path={path} error_code=storage error={err}"
                );
                return Err(err.into());
            }
        };
        debug!(
            "event=pet_update module=provider status=ok path={} fields={} rows={}",
            path,
            values.len(),
            changed
        );

        if changed != 0 {
            self.bus.notify_change(path);
        }
        Ok(changed)
    }

    /// Removes rows at `address` and returns how many were removed.
    ///
    /// The collection address with no selection removes every row.
    pub fn delete(&self, address: &str, selection: Option<Selection>) -> ProviderResult<usize> {
        let path = route(address)?;
        let selection = scoped_selection(path, selection);
        let removed = match self.repo.delete_pets(selection.as_ref()) {
            Ok(removed) => removed,
            Err(err) => {
                error!(
                    "event=pet_delete module=provider status=error path={path} error_code=storage error={err}"
                );
                return Err(err.into());
            }
        };
        debug!("event=pet_delete module=provider status=ok path={path} rows={removed}");

        if removed != 0 {
            self.bus.notify_change(path);
        }
        Ok(removed)
    }
}

fn route(address: &str) -> ProviderResult<PetPath> {
    PetPath::parse(address).map_err(|err| {
        warn!("event=route module=provider status=error error_code=invalid_address");
        err.into()
    })
}

fn scoped_selection(path: PetPath, selection: Option<Selection>) -> Option<Selection> {
    match path {
        PetPath::Collection => selection,
        PetPath::Item(id) => Some(Selection::by_id(id)),
    }
}
