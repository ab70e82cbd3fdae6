//! Generic record envelope and entity contract.
//!
//! # Responsibility
//! - Define the identity/timestamp envelope owned by repositories.
//! - Define what an entity type must declare to be stored (unique fields,
//!   partial patch, validation).
//!
//! # Invariants
//! - `id`, `created_at` and `updated_at` are only written by a repository.
//! - `updated_at >= created_at` for every record handed out.
//! - Unique field values are compared case-sensitively, exact match.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Repository-assigned record identifier.
///
/// Assigned monotonically starting at 1 and never reused within one
/// repository instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// First id handed out by an empty repository.
    pub const FIRST: RecordId = RecordId(1);

    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> RecordId {
        RecordId(self.0 + 1)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// One stored entity together with repository-owned metadata.
///
/// Serialized flat: entity fields appear next to `id`, `created_at` and
/// `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<T> {
    pub id: RecordId,
    /// Unix epoch milliseconds. Immutable after creation.
    pub created_at: i64,
    /// Unix epoch milliseconds. Refreshed on every successful update.
    pub updated_at: i64,
    #[serde(flatten)]
    pub fields: T,
}

/// Field-level validation failure raised by [`Entity::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid field `{}`: {}", self.field, self.reason)
    }
}

impl Error for FieldError {}

/// Contract for entity types stored in a repository.
///
/// # Contract
/// - `UNIQUE_FIELDS` lists every field whose value must be distinct across
///   live records; `unique_value` must return `Some` for each of them.
/// - `apply_patch` touches only the fields present in the patch.
/// - `validate` is pure; repositories call it before every write.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Sparse update shape: one `Option` per mutable field.
    type Patch;

    /// Lowercase entity name used in errors and log events.
    const KIND: &'static str;

    /// Names of fields constrained to be unique.
    const UNIQUE_FIELDS: &'static [&'static str];

    /// Returns the value of one unique field, or `None` for unknown names.
    fn unique_value(&self, field: &str) -> Option<&str>;

    /// Applies the fields present in `patch`, leaving the rest untouched.
    fn apply_patch(&mut self, patch: &Self::Patch);

    /// Validates field contents.
    fn validate(&self) -> Result<(), FieldError> {
        Ok(())
    }

    /// Returns the canonical `&'static` name of a declared unique field.
    fn unique_field(field: &str) -> Option<&'static str> {
        Self::UNIQUE_FIELDS
            .iter()
            .copied()
            .find(|candidate| *candidate == field)
    }
}
