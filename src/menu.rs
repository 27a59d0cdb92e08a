//! Vocabulary shared by both front ends: the six menu entries, input parsing,
//! and the user-facing wording of every catalog outcome.

use anyhow::{anyhow, Context, Result};

use crate::catalog::AddOutcome;
use crate::error::CatalogError;

pub const MENU_TITLE: &str = "Library Management System";
pub const EMPTY_CATALOG: &str = "No books available.";
pub const INVALID_CHOICE: &str = "Invalid choice.";
pub const ADDED: &str = "Book added successfully.";
pub const ISSUED: &str = "Book issued successfully.";
pub const RETURNED: &str = "Book returned successfully.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Display,
    Issue,
    Return,
    Search,
    Exit,
}

impl MenuChoice {
    /// Menu order; entry `n` in the list is selected by typing `n + 1`.
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::Add,
        MenuChoice::Display,
        MenuChoice::Issue,
        MenuChoice::Return,
        MenuChoice::Search,
        MenuChoice::Exit,
    ];

    /// Map the typed menu number to an entry.
    pub fn from_input(raw: &str) -> Option<Self> {
        let number = raw.trim().parse::<usize>().ok()?;
        Self::ALL.get(number.checked_sub(1)?).copied()
    }

    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|choice| *choice == self)
            .map_or(0, |idx| idx + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Add => "Add Book",
            MenuChoice::Display => "Display Books",
            MenuChoice::Issue => "Issue Book",
            MenuChoice::Return => "Return Book",
            MenuChoice::Search => "Search Book",
            MenuChoice::Exit => "Exit",
        }
    }

    /// Prompt used when the entry asks for a single book id.
    pub fn id_prompt(self) -> Option<&'static str> {
        match self {
            MenuChoice::Issue => Some("Enter Book ID to issue"),
            MenuChoice::Return => Some("Enter Book ID to return"),
            MenuChoice::Search => Some("Enter Book ID to search"),
            _ => None,
        }
    }
}

/// Parse a book id typed by the user.
pub fn parse_book_id(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Book ID is required."));
    }
    trimmed
        .parse::<i64>()
        .context("Book ID must be an integer.")
}

/// Turn the three add-book inputs into typed values. Only the id is checked;
/// title and author are stored exactly as typed.
pub fn parse_new_book(id: &str, title: &str, author: &str) -> Result<(i64, String, String)> {
    let id = parse_book_id(id)?;
    Ok((id, title.to_string(), author.to_string()))
}

/// Wording for a successful add, including the duplicate-id warning.
pub fn add_message(id: i64, outcome: AddOutcome) -> String {
    match outcome {
        AddOutcome::Added => ADDED.to_string(),
        AddOutcome::Duplicate => format!(
            "{ADDED} Note: ID {id} was already in use; lookups by this ID find the earlier book."
        ),
    }
}

/// Whether an error is an expected outcome of the request rather than a
/// storage or data failure.
pub fn is_expected_outcome(err: &CatalogError) -> bool {
    matches!(
        err,
        CatalogError::NotFound(_) | CatalogError::AlreadyIssued(_) | CatalogError::NotIssued(_)
    )
}
