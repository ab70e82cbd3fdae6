//! Repository configuration.
//!
//! # Invariants
//! - `0 < default_page_size <= max_page_size`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroPageSize,
    DefaultAboveMax { default_page_size: u32, max_page_size: u32 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroPageSize => write!(f, "page sizes must be greater than zero"),
            Self::DefaultAboveMax {
                default_page_size,
                max_page_size,
            } => write!(
                f,
                "default page size {default_page_size} exceeds maximum {max_page_size}"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Pagination settings applied by repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoConfig {
    default_page_size: u32,
    max_page_size: u32,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl RepoConfig {
    pub fn new(default_page_size: u32, max_page_size: u32) -> Result<Self, ConfigError> {
        if default_page_size == 0 || max_page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if default_page_size > max_page_size {
            return Err(ConfigError::DefaultAboveMax {
                default_page_size,
                max_page_size,
            });
        }
        Ok(Self {
            default_page_size,
            max_page_size,
        })
    }

    /// Coerces `page_size < 1` to the default and clamps to the maximum.
    pub fn normalize_page_size(&self, page_size: i64) -> u32 {
        if page_size < 1 {
            return self.default_page_size;
        }
        u32::try_from(page_size)
            .unwrap_or(u32::MAX)
            .min(self.max_page_size)
    }
}

/// Coerces 1-indexed page numbers below 1 to 1.
pub fn normalize_page(page: i64) -> u32 {
    if page < 1 {
        return 1;
    }
    u32::try_from(page).unwrap_or(u32::MAX)
}
