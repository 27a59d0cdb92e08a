use anyhow::Result;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::menu::{parse_book_id, parse_new_book, MenuChoice};

/// Input state of the "Add Book" popup.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

/// Fields of the add form, in tab order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum BookField {
    #[default]
    Id,
    Title,
    Author,
}

impl BookField {
    pub(crate) const ORDER: [BookField; 3] = [BookField::Id, BookField::Title, BookField::Author];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Id => "Book ID",
            BookField::Title => "Title",
            BookField::Author => "Author",
        }
    }

    fn row(self) -> usize {
        match self {
            BookField::Id => 0,
            BookField::Title => 1,
            BookField::Author => 2,
        }
    }
}

impl BookForm {
    /// Move focus forward (`step > 0`) or backward through the fields.
    pub(crate) fn cycle_field(&mut self, step: isize) {
        let len = BookField::ORDER.len() as isize;
        let next = (self.active.row() as isize + step).rem_euclid(len) as usize;
        self.active = BookField::ORDER[next];
    }

    /// Append a character to the active field. Returns false when the
    /// character is not accepted there.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            BookField::Id => push_id_char(&mut self.id, ch),
            BookField::Title => push_text_char(&mut self.title, ch),
            BookField::Author => push_text_char(&mut self.author, ch),
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    /// Validate the inputs and return typed values ready for the catalog.
    pub(crate) fn parse_inputs(&self) -> Result<(i64, String, String)> {
        parse_new_book(&self.id, &self.title, &self.author)
    }

    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        field_line(field.label(), self.value(field), self.active == field)
    }

    /// Cursor column offset and row for the active field.
    pub(crate) fn cursor(&self) -> (u16, u16) {
        let field = self.active;
        let column = field_prefix(field.label()).len() + self.value(field).chars().count();
        (column as u16, field.row() as u16)
    }

    fn value(&self, field: BookField) -> &str {
        match field {
            BookField::Id => &self.id,
            BookField::Title => &self.title,
            BookField::Author => &self.author,
        }
    }

    fn value_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Id => &mut self.id,
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
        }
    }
}

/// Single-field prompt used by Issue, Return and Search.
#[derive(Clone)]
pub(crate) struct IdForm {
    pub(crate) choice: MenuChoice,
    pub(crate) id: String,
    pub(crate) error: Option<String>,
}

impl IdForm {
    pub(crate) fn new(choice: MenuChoice) -> Self {
        Self {
            choice,
            id: String::new(),
            error: None,
        }
    }

    pub(crate) fn prompt(&self) -> &'static str {
        self.choice.id_prompt().unwrap_or("Book ID")
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        push_id_char(&mut self.id, ch)
    }

    pub(crate) fn backspace(&mut self) {
        self.id.pop();
    }

    pub(crate) fn parse_id(&self) -> Result<i64> {
        parse_book_id(&self.id)
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        field_line(self.prompt(), &self.id, true)
    }

    pub(crate) fn cursor(&self) -> (u16, u16) {
        let column = field_prefix(self.prompt()).len() + self.id.chars().count();
        (column as u16, 0)
    }
}

/// Ids accept digits plus a single leading minus sign.
fn push_id_char(value: &mut String, ch: char) -> bool {
    if ch.is_ascii_digit() || (ch == '-' && value.is_empty()) {
        value.push(ch);
        true
    } else {
        false
    }
}

fn push_text_char(value: &mut String, ch: char) -> bool {
    if ch.is_control() {
        return false;
    }
    value.push(ch);
    true
}

fn field_prefix(name: &str) -> String {
    format!("{name}: ")
}

fn field_line(name: &str, value: &str, is_active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        "<required>".to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![Span::raw(field_prefix(name)), Span::styled(display, style)])
}
