//! Pet domain model and write-set validation.
//!
//! # Responsibility
//! - Define the read record returned by queries.
//! - Define the tri-state write set accepted by insert/update.
//! - Enforce field preconditions before any storage mutation.
//!
//! # Invariants
//! - `id` is assigned by storage and never part of a write set.
//! - Insert requires a non-empty name and an in-domain gender.
//! - Update validates only fields that are present in the write set.
//! - Weight, when present, is never negative.

use crate::contract::{is_valid_gender, Gender};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned row identifier.
pub type PetId = i64;

/// One persisted row of the `pets` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub breed: Option<String>,
    pub gender: Gender,
    pub weight: Option<i64>,
}

/// Tri-state value of one write-set field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field<T> {
    /// Field is not part of the write.
    #[default]
    Unset,
    /// Field is written as SQL `NULL`.
    Null,
    Set(T),
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Set(value),
            None => Self::Null,
        }
    }
}

/// Write set for insert/update.
///
/// Gender is carried as a raw code so that out-of-domain values coming from
/// callers can be rejected with a validation error instead of being
/// unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetValues {
    pub name: Field<String>,
    pub breed: Field<String>,
    pub gender: Field<i64>,
    pub weight: Field<i64>,
}

impl PetValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Field::Set(name.into());
        self
    }

    pub fn breed(mut self, breed: Option<impl Into<String>>) -> Self {
        let breed: Option<String> = breed.map(Into::into);
        self.breed = breed.into();
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Field::Set(gender.code());
        self
    }

    /// Sets a raw gender code without checking the domain.
    pub fn gender_code(mut self, code: i64) -> Self {
        self.gender = Field::Set(code);
        self
    }

    pub fn weight(mut self, weight: Option<i64>) -> Self {
        self.weight = weight.into();
        self
    }

    /// Returns whether no field is present.
    pub fn is_empty(&self) -> bool {
        !(self.name.is_present()
            || self.breed.is_present()
            || self.gender.is_present()
            || self.weight.is_present())
    }

    /// Number of present fields.
    pub fn len(&self) -> usize {
        [
            self.name.is_present(),
            self.breed.is_present(),
            self.gender.is_present(),
            self.weight.is_present(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Checks insert preconditions in order: name, gender, weight.
    ///
    /// Breed is unconstrained.
    pub fn validate_for_insert(&self) -> Result<(), PetValidationError> {
        match &self.name {
            Field::Set(name) if !name.is_empty() => {}
            _ => return Err(PetValidationError::NameRequired),
        }

        match self.gender {
            Field::Set(code) if is_valid_gender(code) => {}
            Field::Set(code) => return Err(PetValidationError::InvalidGender(code)),
            Field::Unset | Field::Null => return Err(PetValidationError::GenderRequired),
        }

        validate_weight(&self.weight)
    }

    /// Checks update preconditions on present fields only.
    ///
    /// # Invariants
    /// - An absent field is never an error.
    /// - A present name may be empty but not null.
    pub fn validate_for_update(&self) -> Result<(), PetValidationError> {
        if matches!(self.name, Field::Null) {
            return Err(PetValidationError::NameRequired);
        }

        match self.gender {
            Field::Set(code) if !is_valid_gender(code) => {
                return Err(PetValidationError::InvalidGender(code));
            }
            Field::Null => return Err(PetValidationError::GenderRequired),
            _ => {}
        }

        validate_weight(&self.weight)
    }
}

fn validate_weight(weight: &Field<i64>) -> Result<(), PetValidationError> {
    match weight {
        Field::Set(value) if *value < 0 => Err(PetValidationError::InvalidWeight(*value)),
        _ => Ok(()),
    }
}

/// Field precondition failures for pet writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetValidationError {
    NameRequired,
    GenderRequired,
    InvalidGender(i64),
    InvalidWeight(i64),
}

impl PetValidationError {
    /// Column the failed rule applies to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameRequired => crate::contract::COLUMN_PET_NAME,
            Self::GenderRequired | Self::InvalidGender(_) => crate::contract::COLUMN_PET_GENDER,
            Self::InvalidWeight(_) => crate::contract::COLUMN_PET_WEIGHT,
        }
    }
}

impl Display for PetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "name required"),
            Self::GenderRequired => write!(f, "gender required"),
            Self::InvalidGender(code) => write!(f, "invalid gender: {code}"),
            Self::InvalidWeight(value) => write!(f, "invalid weight: {value}"),
        }
    }
}

impl Error for PetValidationError {}

#[cfg(test)]
mod tests {
    use super::{Field, Pet, PetValidationError, PetValues};
    use crate::contract::Gender;

    fn toto() -> PetValues {
        PetValues::new()
            .name("Toto")
            .breed(Some("Terrier"))
            .gender(Gender::Male)
            .weight(Some(7))
    }

    #[test]
    fn insert_accepts_complete_values() {
        assert_eq!(toto().validate_for_insert(), Ok(()));
    }

    #[test]
    fn insert_checks_name_before_gender() {
        let values = PetValues::new().gender_code(9);
        assert_eq!(
            values.validate_for_insert(),
            Err(PetValidationError::NameRequired)
        );
    }

    #[test]
    fn insert_rejects_empty_name() {
        let values = toto().name("");
        assert_eq!(
            values.validate_for_insert(),
            Err(PetValidationError::NameRequired)
        );
    }

    #[test]
    fn insert_requires_gender() {
        let mut values = toto();
        values.gender = Field::Unset;
        assert_eq!(
            values.validate_for_insert(),
            Err(PetValidationError::GenderRequired)
        );

        values.gender = Field::Null;
        assert_eq!(
            values.validate_for_insert(),
            Err(PetValidationError::GenderRequired)
        );
    }

    #[test]
    fn insert_accepts_null_weight_and_breed() {
        let values = PetValues::new()
            .name("Rex")
            .breed(None::<String>)
            .gender(Gender::Unknown)
            .weight(None);
        assert_eq!(values.validate_for_insert(), Ok(()));
    }

    #[test]
    fn update_ignores_absent_fields() {
        assert_eq!(PetValues::new().validate_for_update(), Ok(()));
        assert_eq!(
            PetValues::new().weight(Some(3)).validate_for_update(),
            Ok(())
        );
    }

    #[test]
    fn update_rejects_present_null_name() {
        let values = PetValues {
            name: Field::Null,
            ..PetValues::default()
        };
        let err = values.validate_for_update().unwrap_err();
        assert_eq!(err, PetValidationError::NameRequired);
        assert_eq!(err.field(), "name");
    }

    #[test]
    fn update_rejects_out_of_domain_gender_and_negative_weight() {
        assert_eq!(
            PetValues::new().gender_code(5).validate_for_update(),
            Err(PetValidationError::InvalidGender(5))
        );
        assert_eq!(
            PetValues::new().weight(Some(-1)).validate_for_update(),
            Err(PetValidationError::InvalidWeight(-1))
        );
    }

    #[test]
    fn len_counts_present_fields() {
        assert!(PetValues::new().is_empty());
        assert_eq!(toto().len(), 4);
        assert_eq!(PetValues::new().breed(None::<String>).len(), 1);
    }

    #[test]
    fn pet_serializes_gender_as_name() {
        let pet = Pet {
            id: 3,
            name: "Luna".to_string(),
            breed: None,
            gender: Gender::Female,
            weight: Some(4),
        };
        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["gender"], "female");
        assert_eq!(json["breed"], serde_json::Value::Null);

        let back: Pet = serde_json::from_value(json).unwrap();
        assert_eq!(back, pet);
    }
}
