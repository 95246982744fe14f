//! Row selection and ordering for pet queries and writes.
//!
//! # Responsibility
//! - Carry a `WHERE` fragment with positional bind values.
//! - Restrict `ORDER BY` to known columns.
//!
//! # Invariants
//! - The number of `?` placeholders in `clause` matches `args`.
//! - Order clauses never contain caller-provided SQL.

use crate::contract::{PetColumn, COLUMN_ID};
use crate::model::pet::PetId;
use rusqlite::types::Value;

/// `WHERE` fragment plus bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    clause: String,
    args: Vec<Value>,
}

impl Selection {
    /// Wraps a raw clause such as `weight > ? AND breed IS NOT NULL`.
    pub fn raw(clause: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            clause: clause.into(),
            args,
        }
    }

    /// `column = value`.
    pub fn eq(column: PetColumn, value: impl Into<Value>) -> Self {
        Self {
            clause: format!("{} = ?", column.as_str()),
            args: vec![value.into()],
        }
    }

    /// Selection used for item paths.
    pub fn by_id(id: PetId) -> Self {
        Self {
            clause: format!("{COLUMN_ID} = ?"),
            args: vec![Value::Integer(id)],
        }
    }

    /// Conjunction of two selections.
    pub fn and(self, other: Selection) -> Self {
        let mut args = self.args;
        args.extend(other.args);
        Self {
            clause: format!("({}) AND ({})", self.clause, other.clause),
            args,
        }
    }

    pub fn clause(&self) -> &str {
        &self.clause
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// `ORDER BY` over one known column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: PetColumn,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(column: PetColumn) -> Self {
        Self {
            column,
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: PetColumn) -> Self {
        Self {
            column,
            direction: Direction::Desc,
        }
    }

    pub(crate) fn to_sql(self) -> String {
        let direction = match self.direction {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        };
        format!("{} {direction}", self.column.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Selection, SortOrder};
    use crate::contract::PetColumn;
    use rusqlite::types::Value;

    #[test]
    fn eq_builds_single_placeholder() {
        let selection = Selection::eq(PetColumn::Breed, "Terrier".to_string());
        assert_eq!(selection.clause(), "breed = ?");
        assert_eq!(selection.args(), &[Value::Text("Terrier".to_string())]);
    }

    #[test]
    fn and_concatenates_args_in_order() {
        let selection = Selection::eq(PetColumn::Gender, 1_i64)
            .and(Selection::raw("weight > ?", vec![Value::Integer(5)]));
        assert_eq!(selection.clause(), "(gender = ?) AND (weight > ?)");
        assert_eq!(selection.args(), &[Value::Integer(1), Value::Integer(5)]);
    }

    #[test]
    fn sort_order_renders_known_column() {
        assert_eq!(SortOrder::desc(PetColumn::Weight).to_sql(), "weight DESC");
        assert_eq!(SortOrder::asc(PetColumn::Id).to_sql(), "_id ASC");
    }
}
