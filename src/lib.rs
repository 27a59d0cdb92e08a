//! Core library surface for the library catalog manager.
//!
//! The catalog itself (records, codec, write-through persistence) is usable on
//! its own; the `console` and `ui` modules are two front ends over the same
//! `Catalog` value, and `main.rs` only picks one of them.
pub mod catalog;
pub mod config;
pub mod console;
pub mod error;
pub mod menu;
pub mod models;
pub mod store;
pub mod ui;

pub use catalog::{AddOutcome, Catalog};
pub use error::CatalogError;
pub use models::Book;

/// The interactive front ends.
pub use console::run_console;
pub use ui::{run_app, App};
