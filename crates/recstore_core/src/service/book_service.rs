//! Book use-case service.
//!
//! # Responsibility
//! - Provide book create/get/update/delete/list entry points.
//!
//! # Invariants
//! - String fields are trimmed before reaching the repository, on create,
//!   update and ISBN lookup.

use crate::model::book::{Book, BookPatch, NewBook, ISBN_FIELD};
use crate::model::record::{Record, RecordId};
use crate::repo::record_repo::{Page, RepoResult, Repository};
use log::{info, warn};

/// Use-case facade over a book repository.
pub struct BookService<R: Repository<Book>> {
    repo: R,
}

impl<R: Repository<Book>> BookService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn create_book(&self, request: NewBook) -> RepoResult<Record<Book>> {
        let mut book = Book::from(request);
        book.title = book.title.trim().to_string();
        book.author = book.author.trim().to_string();
        book.isbn = book.isbn.trim().to_string();

        let record = self.repo.create(book).inspect_err(|err| {
            warn!(
                "event=book_create module=service status=error error_code={} field={}",
                err.code(),
                err.field().unwrap_or("-")
            );
        })?;
        info!(
            "event=book_create module=service status=ok id={}",
            record.id
        );
        Ok(record)
    }

    pub fn get_book(&self, id: RecordId) -> RepoResult<Record<Book>> {
        self.repo.get_by_id(id)
    }

    pub fn get_book_by_isbn(&self, isbn: &str) -> RepoResult<Record<Book>> {
        self.repo.get_by_unique_field(ISBN_FIELD, isbn.trim())
    }

    pub fn update_book(&self, id: RecordId, mut patch: BookPatch) -> RepoResult<Record<Book>> {
        for value in [&mut patch.title, &mut patch.author, &mut patch.isbn]
            .into_iter()
            .flatten()
        {
            *value = value.trim().to_string();
        }
        let record = self.repo.update(id, &patch).inspect_err(|err| {
            warn!(
                "event=book_update module=service status=error id={id} error_code={}",
                err.code()
            );
        })?;
        info!("event=book_update module=service status=ok id={id}");
        Ok(record)
    }

    pub fn delete_book(&self, id: RecordId) -> RepoResult<()> {
        self.repo.delete(id)?;
        info!("event=book_delete module=service status=ok id={id}");
        Ok(())
    }

    pub fn list_books(&self, page: i64, page_size: i64) -> RepoResult<Page<Book>> {
        self.repo.list(page, page_size)
    }
}
