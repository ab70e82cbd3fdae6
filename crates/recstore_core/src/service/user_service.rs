//! User use-case service.
//!
//! # Responsibility
//! - Provide user create/get/update/delete/list entry points.
//! - Normalize request input (trimming) before it reaches the repository.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or uniqueness checks.
//! - Repository errors are propagated unchanged.

use crate::model::record::{Record, RecordId};
use crate::model::user::{NewUser, User, UserPatch, EMAIL_FIELD, USERNAME_FIELD};
use crate::repo::record_repo::{Page, RepoResult, Repository};
use log::{debug, info, warn};

/// Use-case facade over a user repository.
pub struct UserService<R: Repository<User>> {
    repo: R,
}

impl<R: Repository<User>> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrow the backing repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Creates a user from trimmed request fields.
    pub fn create_user(&self, request: NewUser) -> RepoResult<Record<User>> {
        let user = User::new(request.username.trim(), request.email.trim());
        let record = self.repo.create(user).inspect_err(|err| {
            warn!(
                "event=user_create module=service status=error error_code={} field={}",
                err.code(),
                err.field().unwrap_or("-")
            );
        })?;
        info!(
            "event=user_create module=service status=ok id={}",
            record.id
        );
        Ok(record)
    }

    pub fn get_user(&self, id: RecordId) -> RepoResult<Record<User>> {
        self.repo.get_by_id(id)
    }

    pub fn get_user_by_username(&self, username: &str) -> RepoResult<Record<User>> {
        self.repo.get_by_unique_field(USERNAME_FIELD, username.trim())
    }

    pub fn get_user_by_email(&self, email: &str) -> RepoResult<Record<User>> {
        self.repo.get_by_unique_field(EMAIL_FIELD, email.trim())
    }

    /// Applies a sparse update; absent fields are left untouched.
    pub fn update_user(&self, id: RecordId, patch: UserPatch) -> RepoResult<Record<User>> {
        let patch = UserPatch {
            username: patch.username.map(|value| value.trim().to_string()),
            email: patch.email.map(|value| value.trim().to_string()),
        };
        if patch.is_empty() {
            debug!("event=user_update module=service status=noop id={id}");
        }

        let record = self.repo.update(id, &patch).inspect_err(|err| {
            warn!(
                "event=user_update module=service status=error id={id} error_code={}",
                err.code()
            );
        })?;
        info!("event=user_update module=service status=ok id={id}");
        Ok(record)
    }

    pub fn delete_user(&self, id: RecordId) -> RepoResult<()> {
        self.repo.delete(id)?;
        info!("event=user_delete module=service status=ok id={id}");
        Ok(())
    }

    pub fn list_users(&self, page: i64, page_size: i64) -> RepoResult<Page<User>> {
        self.repo.list(page, page_size)
    }
}
