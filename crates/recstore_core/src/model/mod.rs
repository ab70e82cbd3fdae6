//! Domain model for stored records.
//!
//! # Responsibility
//! - Define the generic record envelope and the entity contract.
//! - Define the concrete user and book entities with their patch shapes.
//!
//! # Invariants
//! - Every stored entity is identified by a repository-assigned `RecordId`.
//! - Deletion is a hard delete; ids are never handed out twice.

pub mod book;
pub mod record;
pub mod user;
