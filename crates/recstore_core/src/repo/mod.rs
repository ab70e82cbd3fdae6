//! Repository layer abstractions and implementations.
//!
//! # Responsibility
//! - Define the record CRUD contract consumed by services and hosting layers.
//! - Provide the in-memory implementation.
//!
//! # Invariants
//! - Repository writes call `Entity::validate()` before mutating state.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`,
//!   `InvalidField`) and never partially apply a write.

pub mod memory_repo;
pub mod record_repo;
