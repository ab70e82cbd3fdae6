//! Book entity.
//!
//! # Invariants
//! - `isbn` is unique across live books.
//! - `title` is 1..=100 characters, `author` 1..=50 characters.
//! - `isbn` is at least 10 characters of dash-separated digit groups.
//! - `price` is finite and strictly positive.

use crate::model::record::{Entity, FieldError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const ISBN_FIELD: &str = "isbn";

const TITLE_MAX_CHARS: usize = 100;
const AUTHOR_MAX_CHARS: usize = 50;
const ISBN_MIN_CHARS: usize = 10;

static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(-[0-9]+)*-[0-9Xx]+$").expect("valid isbn regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: f64,
    /// Unix epoch milliseconds.
    pub published_at: Option<i64>,
}

/// Create request for books.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: f64,
    #[serde(default)]
    pub published_at: Option<i64>,
}

impl From<NewBook> for Book {
    fn from(value: NewBook) -> Self {
        Self {
            title: value.title,
            author: value.author,
            isbn: value.isbn,
            price: value.price,
            published_at: value.published_at,
        }
    }
}

/// Partial update for books.
///
/// `published_at` is doubly optional: `None` keeps the current value,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub published_at: Option<Option<i64>>,
}

// Maps a present JSON value (including `null`) to `Some(..)`; a missing key
// falls back to `#[serde(default)]`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

impl Entity for Book {
    type Patch = BookPatch;

    const KIND: &'static str = "book";
    const UNIQUE_FIELDS: &'static [&'static str] = &[ISBN_FIELD];

    fn unique_value(&self, field: &str) -> Option<&str> {
        match field {
            ISBN_FIELD => Some(self.isbn.as_str()),
            _ => None,
        }
    }

    fn apply_patch(&mut self, patch: &BookPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(author) = &patch.author {
            self.author = author.clone();
        }
        if let Some(isbn) = &patch.isbn {
            self.isbn = isbn.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(published_at) = patch.published_at {
            self.published_at = published_at;
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        for (field, value, max_chars) in [
            ("title", &self.title, TITLE_MAX_CHARS),
            ("author", &self.author, AUTHOR_MAX_CHARS),
        ] {
            if value.trim().is_empty() {
                return Err(FieldError::new(field, "must not be blank"));
            }
            let chars = value.chars().count();
            if chars > max_chars {
                return Err(FieldError::new(
                    field,
                    format!("must be at most {max_chars} characters, got {chars}"),
                ));
            }
        }
        if self.isbn.chars().count() < ISBN_MIN_CHARS || !ISBN_RE.is_match(&self.isbn) {
            return Err(FieldError::new(
                ISBN_FIELD,
                format!("`{}` is not a valid ISBN", self.isbn),
            ));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(FieldError::new(
                "price",
                format!("must be greater than zero, got {}", self.price),
            ));
        }
        Ok(())
    }
}
