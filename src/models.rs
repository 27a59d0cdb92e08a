//! Domain model for a single catalog entry. `Book` is a light-weight data
//! holder that also knows its own storage line format and its fixed-width
//! table row, so both front ends and the persistence layer share one
//! definition of each.

use std::fmt;

use crate::error::{CatalogError, Result};
use crate::store::codec::{join_fields, split_fields};

/// Column widths of the book table: ID, Title, Author, Status.
pub const COLUMN_WIDTHS: [usize; 4] = [5, 25, 20, 10];

const FIELD_COUNT: usize = 4;
const ISSUED_FLAG: &str = "1";
const AVAILABLE_FLAG: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One book in the catalog.
pub struct Book {
    /// Catalog number typed in by the librarian. Not guaranteed unique; lookups
    /// resolve to the first book carrying it.
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Whether the book is currently lent out.
    pub issued: bool,
}

impl Book {
    /// Build a new, available book.
    pub fn new(id: i64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            issued: false,
        }
    }

    /// Mark the book as lent out. Callers check the previous state.
    pub fn issue(&mut self) {
        self.issued = true;
    }

    /// Mark the book as back on the shelf.
    pub fn unissue(&mut self) {
        self.issued = false;
    }

    pub fn status_label(&self) -> &'static str {
        if self.issued {
            "Issued"
        } else {
            "Available"
        }
    }

    /// Serialize into a single storage line (no trailing newline).
    pub fn encode(&self) -> String {
        let id = self.id.to_string();
        let flag = if self.issued {
            ISSUED_FLAG
        } else {
            AVAILABLE_FLAG
        };
        join_fields([id.as_str(), self.title.as_str(), self.author.as_str(), flag])
    }

    /// Parse a line produced by [`Book::encode`].
    pub fn decode(line: &str) -> Result<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let fields = split_fields(line, FIELD_COUNT);
        let [id, title, author, flag] = <[String; 4]>::try_from(fields).map_err(|fields| {
            CatalogError::malformed(format!("expected 4 fields, found {}", fields.len()))
        })?;

        let id = id
            .trim()
            .parse::<i64>()
            .map_err(|_| CatalogError::malformed(format!("book id {id:?} is not an integer")))?;

        let issued = match flag.trim() {
            ISSUED_FLAG => true,
            AVAILABLE_FLAG => false,
            other => {
                return Err(CatalogError::malformed(format!(
                    "status flag {other:?} is neither 1 nor 0"
                )))
            }
        };

        Ok(Self {
            id,
            title,
            author,
            issued,
        })
    }

    /// Fixed-width row lined up under [`table_header`]. Long values are
    /// not truncated, matching the console layout.
    pub fn table_row(&self) -> String {
        let [id_w, title_w, author_w, status_w] = COLUMN_WIDTHS;
        format!(
            "{:<id_w$}{:<title_w$}{:<author_w$}{:<status_w$}",
            self.id,
            self.title,
            self.author,
            self.status_label(),
        )
    }
}

/// Header row matching [`Book::table_row`].
pub fn table_header() -> String {
    let [id_w, title_w, author_w, status_w] = COLUMN_WIDTHS;
    format!(
        "{:<id_w$}{:<title_w$}{:<author_w$}{:<status_w$}",
        "ID", "Title", "Author", "Status"
    )
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.table_row())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_book_is_available() {
        let book = Book::new(7, "Dune", "Herbert");
        assert!(!book.issued);
        assert_eq!(book.status_label(), "Available");
    }

    #[test]
    fn encodes_plain_line() {
        let mut book = Book::new(7, "Dune", "Frank Herbert");
        assert_eq!(book.encode(), "7|Dune|Frank Herbert|0");
        book.issue();
        assert_eq!(book.encode(), "7|Dune|Frank Herbert|1");
        book.unissue();
        assert!(!book.issued);
    }

    #[test]
    fn round_trips_delimiters_in_fields() {
        let mut book = Book::new(-3, "Either|Or", r"Kierkegaard \ S.");
        book.issue();
        assert_eq!(Book::decode(&book.encode()).unwrap(), book);
    }

    #[test]
    fn decodes_legacy_line_with_crlf() {
        let book = Book::decode("42|Emma|Jane Austen|1\r").unwrap();
        assert_eq!(book.id, 42);
        assert_eq!(book.title, "Emma");
        assert_eq!(book.author, "Jane Austen");
        assert!(book.issued);
    }

    #[test]
    fn rejects_short_line() {
        let err = Book::decode("1|Only title").unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
    }

    #[test]
    fn rejects_unescaped_extra_delimiter() {
        let err = Book::decode("1|A|B|C|0").unwrap_err();
        assert!(err.to_string().contains("neither 1 nor 0"));
    }

    #[test]
    fn keeps_backslashes_in_plain_lines() {
        let book = Book::decode(r"1|C:\|Gates\\Allen|0").unwrap();
        assert_eq!(book.title, r"C:\");
        assert_eq!(book.author, r"Gates\\Allen");
        assert_eq!(book.encode(), r"1|C:\|Gates\\Allen|0");
    }

    #[test]
    fn rejects_non_numeric_id() {
        let err = Book::decode("abc|Title|Author|0").unwrap_err();
        assert!(err.to_string().contains("not an integer"));
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(Book::decode("1|Title|Author|yes").is_err());
    }

    #[test]
    fn table_row_uses_fixed_widths() {
        let mut book = Book::new(7, "Dune", "Herbert");
        book.issue();
        let row = book.table_row();
        assert_eq!(row.len(), 60);
        assert_eq!(&row[..5], "7    ");
        assert_eq!(row[5..30].trim_end(), "Dune");
        assert_eq!(row[30..50].trim_end(), "Herbert");
        assert_eq!(row[50..].trim_end(), "Issued");
        assert_eq!(table_header().len(), row.len());
        assert!(table_header().starts_with("ID   Title"));
    }
}
