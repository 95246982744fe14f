//! `pets` table creation and version stamp.
//!
//! # Invariants
//! - `user_version = 0` marks a fresh file: the table is created and the
//!   file is stamped with `PETS_SCHEMA_VERSION` in one transaction.
//! - Any other stamp than 0 or `PETS_SCHEMA_VERSION` is refused untouched.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Stamp written to `PRAGMA user_version` once the `pets` table exists.
pub const PETS_SCHEMA_VERSION: u32 = 1;

const CREATE_PETS_TABLE: &str = include_str!("pets_table.sql");

/// Creates the `pets` table on a fresh file, or accepts an already stamped one.
pub fn ensure_pets_schema(conn: &Connection) -> DbResult<()> {
    match schema_version(conn)? {
        PETS_SCHEMA_VERSION => Ok(()),
        0 => {
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch(CREATE_PETS_TABLE)?;
            tx.pragma_update(None, "user_version", PETS_SCHEMA_VERSION)?;
            tx.commit()?;
            info!(
                "event=db_schema module=db status=ok action=create_table version={PETS_SCHEMA_VERSION}"
            );
            Ok(())
        }
        found => Err(DbError::ForeignSchema { found }),
    }
}

/// Reads the `user_version` stamp of `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}
