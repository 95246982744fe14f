//! Static data dictionary for the `pets` table.
//!
//! # Responsibility
//! - Name the table, its columns and the content address constants.
//! - Define the closed gender domain and its validity predicate.
//!
//! # Invariants
//! - Gender codes are stable: `0=unknown`, `1=male`, `2=female`.
//! - This module holds no state and performs no I/O.

use serde::{Deserialize, Serialize};

/// Authority segment of full content URIs.
pub const CONTENT_AUTHORITY: &str = "com.example.android.pets";
/// Path segment addressing the pets resource.
pub const PATH_PETS: &str = "pets";
/// Content type tag for the whole collection.
pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/com.example.android.pets/pets";
/// Content type tag for a single pet.
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/com.example.android.pets/pets";

pub const TABLE_NAME: &str = "pets";

pub const COLUMN_ID: &str = "_id";
pub const COLUMN_PET_NAME: &str = "name";
pub const COLUMN_PET_BREED: &str = "breed";
pub const COLUMN_PET_GENDER: &str = "gender";
pub const COLUMN_PET_WEIGHT: &str = "weight";

/// Every column in table order.
pub const ALL_COLUMNS: [&str; 5] = [
    COLUMN_ID,
    COLUMN_PET_NAME,
    COLUMN_PET_BREED,
    COLUMN_PET_GENDER,
    COLUMN_PET_WEIGHT,
];

pub const GENDER_UNKNOWN: i64 = 0;
pub const GENDER_MALE: i64 = 1;
pub const GENDER_FEMALE: i64 = 2;

/// Enumerated gender domain stored in `pets.gender`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Returns the persisted integer code.
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => GENDER_UNKNOWN,
            Self::Male => GENDER_MALE,
            Self::Female => GENDER_FEMALE,
        }
    }

    /// Maps a persisted code back to the enum, `None` when out of domain.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            GENDER_UNKNOWN => Some(Self::Unknown),
            GENDER_MALE => Some(Self::Male),
            GENDER_FEMALE => Some(Self::Female),
            _ => None,
        }
    }
}

/// Returns whether `value` is one of the known gender codes.
pub fn is_valid_gender(value: i64) -> bool {
    Gender::from_code(value).is_some()
}

/// Columns callers may filter or order on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetColumn {
    Id,
    Name,
    Breed,
    Gender,
    Weight,
}

impl PetColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => COLUMN_ID,
            Self::Name => COLUMN_PET_NAME,
            Self::Breed => COLUMN_PET_BREED,
            Self::Gender => COLUMN_PET_GENDER,
            Self::Weight => COLUMN_PET_WEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_gender, Gender, PetColumn, ALL_COLUMNS};

    #[test]
    fn gender_predicate_accepts_only_known_codes() {
        assert!(is_valid_gender(0));
        assert!(is_valid_gender(1));
        assert!(is_valid_gender(2));
        assert!(!is_valid_gender(3));
        assert!(!is_valid_gender(-1));
    }

    #[test]
    fn gender_codes_roundtrip() {
        for gender in [Gender::Unknown, Gender::Male, Gender::Female] {
            assert_eq!(Gender::from_code(gender.code()), Some(gender));
        }
    }

    #[test]
    fn column_names_follow_table_order() {
        let names = [
            PetColumn::Id,
            PetColumn::Name,
            PetColumn::Breed,
            PetColumn::Gender,
            PetColumn::Weight,
        ]
        .map(PetColumn::as_str);
        assert_eq!(names, ALL_COLUMNS);
    }
}
