//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep hosting layers decoupled from storage details.

pub mod book_service;
pub mod user_service;
