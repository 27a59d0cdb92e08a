//! Typed failures surfaced by the catalog core. Front ends match on these to
//! pick the message shown to the user instead of parsing printed text.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// No record carries the requested id.
    #[error("Book not found.")]
    NotFound(i64),

    #[error("Book already issued.")]
    AlreadyIssued(i64),

    #[error("This book was not issued.")]
    NotIssued(i64),

    /// A stored line could not be decoded into a record.
    #[error("malformed record: {reason}")]
    Malformed { reason: String },

    /// The storage file could not be read or rewritten.
    #[error("storage unavailable at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CatalogError::Malformed {
            reason: reason.into(),
        }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CatalogError::Storage {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
