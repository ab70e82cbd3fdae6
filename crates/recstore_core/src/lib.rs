//! Generic in-memory record repository with uniqueness constraints and
//! pagination, plus the user/book services built on it.

pub mod api;
pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{respond, respond_created, respond_deleted, respond_page, ApiResponse, PageEnvelope};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, RepoConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::book::{Book, BookPatch, NewBook};
pub use model::record::{Entity, FieldError, Record, RecordId};
pub use model::user::{NewUser, User, UserPatch};
pub use repo::memory_repo::MemoryRepository;
pub use repo::record_repo::{Page, RepoError, RepoResult, Repository};
pub use service::book_service::BookService;
pub use service::user_service::UserService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
