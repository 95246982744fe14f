//! Pets store bootstrap.
//!
//! # Responsibility
//! - Open file or in-memory connections ready for the pet repository.
//! - Make sure the single `pets` table exists.
//!
//! # Invariants
//! - A returned connection carries the `pets` table and the current stamp.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{ensure_pets_schema, schema_version, PETS_SCHEMA_VERSION};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// SQLite could not open the file or memory database.
    Connect {
        mode: &'static str,
        source: rusqlite::Error,
    },
    Sqlite(rusqlite::Error),
    /// The file was stamped by something other than this store.
    ForeignSchema { found: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect { mode, source } => {
                write!(f, "cannot open {mode} pets database: {source}")
            }
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::ForeignSchema { found } => write!(
                f,
                "database is stamped with schema version {found}, pets store uses {PETS_SCHEMA_VERSION}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::ForeignSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
