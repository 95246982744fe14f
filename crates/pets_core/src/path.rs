//! Logical address routing for pet requests.
//!
//! # Responsibility
//! - Classify an address as the pets collection or one pet by id.
//! - Render addresses back to their canonical and content-URI forms.
//!
//! # Invariants
//! - Only `pets` and `pets/{digits}` are valid, after stripping an optional
//!   leading `/` or a `content://<authority>/` prefix for our own authority.
//! - Empty path segments are ignored, so `pets/` addresses the collection.
//! - Classification is pure and never touches storage.

use crate::contract::{CONTENT_AUTHORITY, CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE, PATH_PETS};
use crate::model::pet::PetId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static URI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*)://(?P<authority>[^/]*)(?P<path>/.*)?$")
        .expect("valid uri regex")
});

/// Routed address of a pet request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PetPath {
    /// The whole pets resource.
    Collection,
    /// Exactly one pet by identifier.
    Item(PetId),
}

/// Shape of a routed address, exposed as a content type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Collection,
    Item,
}

impl PathKind {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Collection => CONTENT_LIST_TYPE,
            Self::Item => CONTENT_ITEM_TYPE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Item => "item",
        }
    }
}

/// Raised when an address matches neither known shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPathError {
    pub address: String,
}

impl Display for InvalidPathError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown pets address `{}`", self.address)
    }
}

impl Error for InvalidPathError {}

impl PetPath {
    /// Parses a logical path or content URI.
    pub fn parse(address: &str) -> Result<Self, InvalidPathError> {
        let invalid = || InvalidPathError {
            address: address.to_string(),
        };

        let path = match URI_RE.captures(address) {
            Some(captures) => {
                if &captures["scheme"] != "content" || &captures["authority"] != CONTENT_AUTHORITY
                {
                    return Err(invalid());
                }
                captures.name("path").map_or("", |m| m.as_str())
            }
            None => address,
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [resource] if *resource == PATH_PETS => Ok(Self::Collection),
            [resource, id] if *resource == PATH_PETS => {
                parse_id(id).map(Self::Item).ok_or_else(invalid)
            }
            _ => Err(invalid()),
        }
    }

    pub fn kind(self) -> PathKind {
        match self {
            Self::Collection => PathKind::Collection,
            Self::Item(_) => PathKind::Item,
        }
    }

    /// Item id, `None` for the collection.
    pub fn id(self) -> Option<PetId> {
        match self {
            Self::Collection => None,
            Self::Item(id) => Some(id),
        }
    }

    /// Full `content://` form of this address.
    pub fn to_content_uri(self) -> String {
        format!("content://{CONTENT_AUTHORITY}/{self}")
    }

    /// Whether a change at `changed` is visible to an observer watching `self`.
    pub fn is_affected_by(self, changed: PetPath, notify_for_descendants: bool) -> bool {
        match (self, changed) {
            (_, Self::Collection) => true,
            (Self::Collection, Self::Item(_)) => notify_for_descendants,
            (Self::Item(watched), Self::Item(id)) => watched == id,
        }
    }
}

fn parse_id(segment: &str) -> Option<PetId> {
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<PetId>().ok()
}

impl FromStr for PetPath {
    type Err = InvalidPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for PetPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection => write!(f, "{PATH_PETS}"),
            Self::Item(id) => write!(f, "{PATH_PETS}/{id}"),
        }
    }
}
