//! Whole-file load and save of the flat storage file. Every save truncates
//! and rewrites the file from the in-memory list; there is no incremental
//! write path.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{CatalogError, Result};
use crate::models::Book;

/// A stored line that could not be decoded and was left out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the storage file.
    pub line_number: usize,
    pub reason: String,
}

/// Books read from storage plus whatever had to be skipped along the way.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub books: Vec<Book>,
    pub skipped: Vec<SkippedLine>,
}

/// Read every record from `path` in file order. A missing file is an empty
/// catalog; blank lines are ignored and malformed lines are skipped.
pub fn load_books(path: &Path) -> Result<LoadReport> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "storage file missing, starting empty");
            return Ok(LoadReport::default());
        }
        Err(err) => return Err(CatalogError::storage(path, err)),
    };

    let mut report = LoadReport::default();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|err| CatalogError::storage(path, err))?;
        if line.trim().is_empty() {
            continue;
        }

        match Book::decode(&line) {
            Ok(book) => report.books.push(book),
            Err(err) => {
                let line_number = idx + 1;
                warn!(path = %path.display(), line_number, error = %err, "skipping stored line");
                report.skipped.push(SkippedLine {
                    line_number,
                    reason: err.to_string(),
                });
            }
        }
    }

    debug!(
        path = %path.display(),
        books = report.books.len(),
        skipped = report.skipped.len(),
        "loaded catalog"
    );
    Ok(report)
}

/// Truncate `path` and write one encoded line per book, in order.
pub fn save_books(path: &Path, books: &[Book]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| CatalogError::storage(parent, err))?;
    }

    let file = File::create(path).map_err(|err| CatalogError::storage(path, err))?;
    let mut writer = BufWriter::new(file);
    for book in books {
        writeln!(writer, "{}", book.encode()).map_err(|err| CatalogError::storage(path, err))?;
    }
    writer
        .flush()
        .map_err(|err| CatalogError::storage(path, err))?;

    debug!(path = %path.display(), books = books.len(), "saved catalog");
    Ok(())
}
