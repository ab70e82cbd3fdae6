//! Record repository contract and error taxonomy.
//!
//! # Responsibility
//! - Define the CRUD + paginated-list contract every record store provides.
//! - Define the three semantic failure kinds surfaced to hosting layers.
//!
//! # Invariants
//! - Failed operations leave the store exactly as before the call.
//! - Errors are returned unchanged; nothing is retried.

use crate::model::record::{Entity, FieldError, Record, RecordId};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Semantic repository failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Id or unique-field lookup does not resolve to a live record.
    NotFound { kind: &'static str, key: String },
    /// The write would give two live records the same unique value.
    Conflict { kind: &'static str, field: &'static str },
    /// Unknown or non-unique field referenced, or field content rejected.
    InvalidField { field: String, reason: String },
}

impl RepoError {
    pub(crate) fn not_found_id(kind: &'static str, id: RecordId) -> Self {
        Self::NotFound {
            kind,
            key: format!("id={id}"),
        }
    }

    pub(crate) fn not_found_field(kind: &'static str, field: &str, value: &str) -> Self {
        Self::NotFound {
            kind,
            key: format!("{field}={value}"),
        }
    }

    /// Offending field for `Conflict` and `InvalidField` errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NotFound { .. } => None,
            Self::Conflict { field, .. } => Some(*field),
            Self::InvalidField { field, .. } => Some(field.as_str()),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::InvalidField { .. } => "invalid_field",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, key } => write!(f, "{kind} not found: {key}"),
            Self::Conflict { kind, field } => {
                write!(f, "{kind} conflict: `{field}` already exists")
            }
            Self::InvalidField { field, reason } => {
                write!(f, "invalid field `{field}`: {reason}")
            }
        }
    }
}

impl Error for RepoError {}

impl From<FieldError> for RepoError {
    fn from(value: FieldError) -> Self {
        Self::InvalidField {
            field: value.field.to_string(),
            reason: value.reason,
        }
    }
}

/// One window of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Records ordered by `created_at DESC, id DESC`.
    pub items: Vec<Record<T>>,
    /// Count of all live records, independent of the window.
    pub total: usize,
    /// Effective 1-indexed page after normalization.
    pub page: u32,
    /// Effective page size after normalization.
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        let pages = self.total.div_ceil(self.page_size as usize);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// Repository interface for record CRUD operations.
///
/// Implementations own ids and timestamps; callers only ever see clones.
pub trait Repository<T: Entity>: Send + Sync {
    fn create(&self, fields: T) -> RepoResult<Record<T>>;
    fn get_by_id(&self, id: RecordId) -> RepoResult<Record<T>>;
    /// Fails with `InvalidField` when `field` is not declared unique for `T`.
    fn get_by_unique_field(&self, field: &str, value: &str) -> RepoResult<Record<T>>;
    /// Lists one page; `page < 1` reads as 1, out-of-range pages are empty.
    fn list(&self, page: i64, page_size: i64) -> RepoResult<Page<T>>;
    fn list_all(&self) -> RepoResult<Vec<Record<T>>>;
    fn update(&self, id: RecordId, patch: &T::Patch) -> RepoResult<Record<T>>;
    fn delete(&self, id: RecordId) -> RepoResult<()>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Entity, R: Repository<T> + ?Sized> Repository<T> for Arc<R> {
    fn create(&self, fields: T) -> RepoResult<Record<T>> {
        (**self).create(fields)
    }

    fn get_by_id(&self, id: RecordId) -> RepoResult<Record<T>> {
        (**self).get_by_id(id)
    }

    fn get_by_unique_field(&self, field: &str, value: &str) -> RepoResult<Record<T>> {
        (**self).get_by_unique_field(field, value)
    }

    fn list(&self, page: i64, page_size: i64) -> RepoResult<Page<T>> {
        (**self).list(page, page_size)
    }

    fn list_all(&self) -> RepoResult<Vec<Record<T>>> {
        (**self).list_all()
    }

    fn update(&self, id: RecordId, patch: &T::Patch) -> RepoResult<Record<T>> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        (**self).delete(id)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, RepoError};
    use crate::model::record::{FieldError, RecordId};

    #[test]
    fn display_messages_are_stable() {
        assert_eq!(
            RepoError::not_found_id("user", RecordId(3)).to_string(),
            "user not found: id=3"
        );
        assert_eq!(
            RepoError::Conflict {
                kind: "user",
                field: "username"
            }
            .to_string(),
            "user conflict: `username` already exists"
        );
    }

    #[test]
    fn field_error_converts_to_invalid_field() {
        let err: RepoError = FieldError::new("price", "must be greater than zero").into();
        assert_eq!(err.field(), Some("price"));
        assert_eq!(err.code(), "invalid_field");
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<()> = Page {
            items: Vec::new(),
            total: 21,
            page: 2,
            page_size: 10,
        };
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());

        let empty: Page<()> = Page {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size: 10,
        };
        assert_eq!(empty.total_pages(), 0);
        assert!(!empty.has_next());
    }
}
