//! Persistence module split across logical submodules.

pub mod codec;
mod file;

pub use codec::FIELD_DELIMITER;
pub use file::{load_books, save_books, LoadReport, SkippedLine};
