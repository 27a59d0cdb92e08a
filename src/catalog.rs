//! The in-memory catalog and its write-through persistence. Every mutation is
//! followed by a full rewrite of the storage file; when that rewrite fails the
//! mutation is undone so memory and disk never disagree.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{CatalogError, Result};
use crate::models::Book;
use crate::store::{load_books, save_books, SkippedLine};

/// Result of a successful [`Catalog::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The id was already taken. The book was still stored, but id lookups
    /// keep resolving to the earlier entry.
    Duplicate,
}

/// Ordered book collection bound to one storage file.
#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    books: Vec<Book>,
    skipped: Vec<SkippedLine>,
}

impl Catalog {
    /// Bind a catalog to `path` and load whatever is already stored there.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut catalog = Self {
            path: path.into(),
            books: Vec::new(),
            skipped: Vec::new(),
        };
        catalog.load()?;
        Ok(catalog)
    }

    /// Replace the in-memory list with the stored records, in file order.
    /// On failure the current list is left as it was.
    pub fn load(&mut self) -> Result<()> {
        let report = load_books(&self.path)?;
        info!(
            path = %self.path.display(),
            books = report.books.len(),
            skipped = report.skipped.len(),
            "catalog loaded"
        );
        self.books = report.books;
        self.skipped = report.skipped;
        Ok(())
    }

    /// Rewrite the storage file from the in-memory list.
    pub fn save(&self) -> Result<()> {
        save_books(&self.path, &self.books)
    }

    pub fn add(
        &mut self,
        id: i64,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<AddOutcome> {
        let outcome = if self.position(id).is_some() {
            warn!(id, "adding a book whose id is already in the catalog");
            AddOutcome::Duplicate
        } else {
            AddOutcome::Added
        };

        self.books.push(Book::new(id, title, author));
        if let Err(err) = self.save() {
            self.books.pop();
            return Err(err);
        }

        info!(id, "book added");
        Ok(outcome)
    }

    /// Lend out the first book with `id`.
    pub fn issue(&mut self, id: i64) -> Result<&Book> {
        let idx = self.position(id).ok_or(CatalogError::NotFound(id))?;
        if self.books[idx].issued {
            return Err(CatalogError::AlreadyIssued(id));
        }

        self.books[idx].issue();
        if let Err(err) = self.save() {
            self.books[idx].unissue();
            return Err(err);
        }

        info!(id, "book issued");
        Ok(&self.books[idx])
    }

    /// Take back the first book with `id`.
    pub fn return_book(&mut self, id: i64) -> Result<&Book> {
        let idx = self.position(id).ok_or(CatalogError::NotFound(id))?;
        if !self.books[idx].issued {
            return Err(CatalogError::NotIssued(id));
        }

        self.books[idx].unissue();
        if let Err(err) = self.save() {
            self.books[idx].issue();
            return Err(err);
        }

        info!(id, "book returned");
        Ok(&self.books[idx])
    }

    pub fn search(&self, id: i64) -> Result<&Book> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .ok_or(CatalogError::NotFound(id))
    }

    pub fn list_all(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored lines that were dropped while loading.
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }
}
