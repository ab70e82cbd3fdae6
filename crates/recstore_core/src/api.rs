//! Hosting-layer response envelope.
//!
//! # Responsibility
//! - Map repository results onto a transport-neutral envelope with an
//!   HTTP-style status code.
//! - Render envelopes as JSON for handlers and the CLI.
//!
//! # Invariants
//! - `NotFound` -> 404, `Conflict` -> 409, `InvalidField` -> 400.
//! - `data` is present only on success; `error` only on failure.

use crate::model::record::Record;
use crate::repo::record_repo::{Page, RepoError, RepoResult};
use serde::Serialize;

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_NO_CONTENT: u16 = 204;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_CONFLICT: u16 = 409;

/// Uniform response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<D> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<D>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<D> ApiResponse<D> {
    pub fn ok(data: D) -> Self {
        Self::success(STATUS_OK, data)
    }

    pub fn created(data: D) -> Self {
        Self::success(STATUS_CREATED, data)
    }

    fn success(code: u16, data: D) -> Self {
        Self {
            success: true,
            code,
            message: "success".to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn from_error(err: &RepoError) -> Self {
        Self {
            success: false,
            code: status_code(err),
            message: err.code().to_string(),
            data: None,
            error: Some(err.to_string()),
        }
    }
}

impl ApiResponse<()> {
    pub fn no_content() -> Self {
        Self {
            success: true,
            code: STATUS_NO_CONTENT,
            message: "success".to_string(),
            data: None,
            error: None,
        }
    }
}

/// Returns the HTTP-style status for a repository error.
pub fn status_code(err: &RepoError) -> u16 {
    match err {
        RepoError::NotFound { .. } => STATUS_NOT_FOUND,
        RepoError::Conflict { .. } => STATUS_CONFLICT,
        RepoError::InvalidField { .. } => STATUS_BAD_REQUEST,
    }
}

/// Wraps a read/update result as `200` or the mapped error status.
pub fn respond<D>(result: RepoResult<D>) -> ApiResponse<D> {
    match result {
        Ok(data) => ApiResponse::ok(data),
        Err(err) => ApiResponse::from_error(&err),
    }
}

/// Wraps a create result as `201` or the mapped error status.
pub fn respond_created<D>(result: RepoResult<D>) -> ApiResponse<D> {
    match result {
        Ok(data) => ApiResponse::created(data),
        Err(err) => ApiResponse::from_error(&err),
    }
}

/// Wraps a delete result as `204` or the mapped error status.
pub fn respond_deleted(result: RepoResult<()>) -> ApiResponse<()> {
    match result {
        Ok(()) => ApiResponse::no_content(),
        Err(err) => ApiResponse::from_error(&err),
    }
}

/// Pagination payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageEnvelope<T> {
    pub items: Vec<Record<T>>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next: bool,
}

impl<T> From<Page<T>> for PageEnvelope<T> {
    fn from(value: Page<T>) -> Self {
        let total_pages = value.total_pages();
        let has_next = value.has_next();
        Self {
            items: value.items,
            total: value.total,
            page: value.page,
            page_size: value.page_size,
            total_pages,
            has_next,
        }
    }
}

/// Wraps a list result, adding `total_pages` and `has_next`.
pub fn respond_page<T>(result: RepoResult<Page<T>>) -> ApiResponse<PageEnvelope<T>> {
    respond(result.map(PageEnvelope::from))
}

/// Serializes an envelope to compact JSON.
pub fn to_json<D: Serialize>(response: &ApiResponse<D>) -> serde_json::Result<String> {
    serde_json::to_string(response)
}

#[cfg(test)]
mod tests {
    use super::{respond, respond_deleted, status_code, to_json, ApiResponse};
    use crate::model::record::RecordId;
    use crate::repo::record_repo::RepoError;

    #[test]
    fn error_kinds_map_to_status_codes() {
        let not_found = RepoError::NotFound {
            kind: "user",
            key: "id=1".to_string(),
        };
        let conflict = RepoError::Conflict {
            kind: "user",
            field: "email",
        };
        let invalid = RepoError::InvalidField {
            field: "nickname".to_string(),
            reason: "not a unique field of user".to_string(),
        };
        assert_eq!(status_code(&not_found), 404);
        assert_eq!(status_code(&conflict), 409);
        assert_eq!(status_code(&invalid), 400);
    }

    #[test]
    fn success_envelope_omits_error_key() {
        let json = to_json(&respond::<RecordId>(Ok(RecordId(7)))).unwrap();
        assert_eq!(json, r#"{"success":true,"code":200,"message":"success","data":7}"#);
    }

    #[test]
    fn failure_envelope_omits_data_key() {
        let response: ApiResponse<()> = respond_deleted(Err(RepoError::NotFound {
            kind: "book",
            key: "id=9".to_string(),
        }));
        let json = to_json(&response).unwrap();
        assert_eq!(
            json,
            r#"{"success":false,"code":404,"message":"not_found","error":"book not found: id=9"}"#
        );
    }
}
