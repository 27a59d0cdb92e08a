use crate::models::Book;

/// Scrollable table of books, used both for the full listing and for a
/// single search hit.
pub(crate) struct BookTable {
    pub(crate) title: String,
    pub(crate) books: Vec<Book>,
    pub(crate) selected: usize,
}

impl BookTable {
    pub(crate) fn new(title: impl Into<String>, books: Vec<Book>) -> Self {
        Self {
            title: title.into(),
            books,
            selected: 0,
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            return;
        }
        let last = self.books.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.books.len().saturating_sub(1);
    }
}
