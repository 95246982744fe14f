//! Pet repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the single-table store operations the provider routes to.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - The repository owns its connection; callers release it via `close`.
//! - Read paths reject persisted rows with an out-of-domain gender.
//! - Only present write-set fields appear in generated SQL.

use crate::contract::{
    Gender, ALL_COLUMNS, COLUMN_ID, COLUMN_PET_BREED, COLUMN_PET_GENDER, COLUMN_PET_NAME,
    COLUMN_PET_WEIGHT, TABLE_NAME,
};
use crate::db::{schema_version, DbError, PETS_SCHEMA_VERSION};
use crate::model::pet::{Field, Pet, PetId, PetValues};
use crate::repo::selection::{Selection, SortOrder};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PET_SELECT_SQL: &str = "SELECT
    _id,
    name,
    breed,
    gender,
    weight
FROM pets";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for pet persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted pet data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Single-table store used by the pet provider.
pub trait PetRepository {
    /// Inserts one row and returns the storage-assigned id.
    fn insert_pet(&self, values: &PetValues) -> RepoResult<PetId>;
    /// Returns rows matching `selection`, all rows when `None`.
    fn query_pets(
        &self,
        selection: Option<&Selection>,
        order: Option<SortOrder>,
    ) -> RepoResult<Vec<Pet>>;
    /// Number of rows matching `selection`, all rows when `None`.
    fn count_pets(&self, selection: Option<&Selection>) -> RepoResult<usize>;
    /// Writes present fields to matching rows and returns the changed count.
    fn update_pets(&self, values: &PetValues, selection: Option<&Selection>) -> RepoResult<usize>;
    /// Removes matching rows and returns the removed count.
    fn delete_pets(&self, selection: Option<&Selection>) -> RepoResult<usize>;
}

/// SQLite-backed pet repository.
pub struct SqlitePetRepository {
    conn: Connection,
}

impl SqlitePetRepository {
    /// Takes ownership of a connection returned by `db::open_db`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the `pets` stamp is missing or foreign.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema is
    ///   incomplete.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the connection, surfacing errors from pending statements.
    pub fn close(self) -> RepoResult<()> {
        self.conn.close().map_err(|(_, err)| RepoError::from(err))
    }
}

impl PetRepository for SqlitePetRepository {
    fn insert_pet(&self, values: &PetValues) -> RepoResult<PetId> {
        let assignments = present_fields(values);
        if assignments.is_empty() {
            self.conn
                .execute(&format!("INSERT INTO {TABLE_NAME} DEFAULT VALUES;"), [])?;
        } else {
            let columns: Vec<&str> = assignments.iter().map(|(column, _)| *column).collect();
            let placeholders = vec!["?"; columns.len()].join(", ");
            let sql = format!(
                "INSERT INTO {TABLE_NAME} ({}) VALUES ({placeholders});",
                columns.join(", ")
            );
            self.conn.execute(
                &sql,
                params_from_iter(assignments.into_iter().map(|(_, value)| value)),
            )?;
        }

        Ok(self.conn.last_insert_rowid())
    }

    fn query_pets(
        &self,
        selection: Option<&Selection>,
        order: Option<SortOrder>,
    ) -> RepoResult<Vec<Pet>> {
        let mut sql = String::from(PET_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(selection) = selection {
            sql.push_str(" WHERE ");
            sql.push_str(selection.clause());
            bind_values.extend_from_slice(selection.args());
        }

        match order {
            Some(order) => {
                sql.push_str(" ORDER BY ");
                sql.push_str(&order.to_sql());
            }
            None => sql.push_str(&format!(" ORDER BY {COLUMN_ID} ASC")),
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut pets = Vec::new();

        while let Some(row) = rows.next()? {
            pets.push(parse_pet_row(row)?);
        }

        Ok(pets)
    }

    fn count_pets(&self, selection: Option<&Selection>) -> RepoResult<usize> {
        let mut sql = format!("SELECT COUNT(*) FROM {TABLE_NAME}");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(selection) = selection {
            sql.push_str(" WHERE ");
            sql.push_str(selection.clause());
            bind_values.extend_from_slice(selection.args());
        }

        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("row count `{count}` out of range")))
    }

    fn update_pets(&self, values: &PetValues, selection: Option<&Selection>) -> RepoResult<usize> {
        let assignments = present_fields(values);
        if assignments.is_empty() {
            return Ok(0);
        }

        let set_clause = assignments
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {TABLE_NAME} SET {set_clause}");
        let mut bind_values: Vec<Value> = assignments.into_iter().map(|(_, value)| value).collect();

        if let Some(selection) = selection {
            sql.push_str(" WHERE ");
            sql.push_str(selection.clause());
            bind_values.extend_from_slice(selection.args());
        }

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }

    fn delete_pets(&self, selection: Option<&Selection>) -> RepoResult<usize> {
        let mut sql = format!("DELETE FROM {TABLE_NAME}");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(selection) = selection {
            sql.push_str(" WHERE ");
            sql.push_str(selection.clause());
            bind_values.extend_from_slice(selection.args());
        }

        let removed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(removed)
    }
}

fn present_fields(values: &PetValues) -> Vec<(&'static str, Value)> {
    let mut fields = Vec::with_capacity(4);
    push_field(&mut fields, COLUMN_PET_NAME, &values.name, |v| Value::Text(v.clone()));
    push_field(&mut fields, COLUMN_PET_BREED, &values.breed, |v| Value::Text(v.clone()));
    push_field(&mut fields, COLUMN_PET_GENDER, &values.gender, |v| Value::Integer(*v));
    push_field(&mut fields, COLUMN_PET_WEIGHT, &values.weight, |v| Value::Integer(*v));
    fields
}

fn push_field<T>(
    fields: &mut Vec<(&'static str, Value)>,
    column: &'static str,
    field: &Field<T>,
    to_value: impl Fn(&T) -> Value,
) {
    match field {
        Field::Unset => {}
        Field::Null => fields.push((column, Value::Null)),
        Field::Set(value) => fields.push((column, to_value(value))),
    }
}

fn parse_pet_row(row: &Row<'_>) -> RepoResult<Pet> {
    let id: PetId = row.get("_id")?;
    let gender_code: i64 = row.get("gender")?;
    let gender = Gender::from_code(gender_code).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid gender `{gender_code}` in pets.gender for _id={id}"
        ))
    })?;

    Ok(Pet {
        id,
        name: row.get("name")?,
        breed: row.get("breed")?,
        gender,
        weight: row.get("weight")?,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = PETS_SCHEMA_VERSION;
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, TABLE_NAME)? {
        return Err(RepoError::MissingRequiredTable(TABLE_NAME));
    }

    for column in ALL_COLUMNS {
        if !table_has_column(conn, TABLE_NAME, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: TABLE_NAME,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
