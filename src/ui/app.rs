use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, error};

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::menu::{
    add_message, is_expected_outcome, MenuChoice, EMPTY_CATALOG, INVALID_CHOICE, ISSUED,
    MENU_TITLE, RETURNED,
};
use crate::models::table_header;

use super::forms::{BookField, BookForm, IdForm};
use super::helpers::{centered_rect, key_hints, surface_error};
use super::screens::BookTable;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows scrolled by PageUp/PageDown in the book table.
const PAGE_STEP: isize = 10;

/// Which full-screen view is showing.
enum Screen {
    Menu,
    Books(BookTable),
}

/// Popup state layered over the current screen.
enum Mode {
    Normal,
    AddingBook(BookForm),
    EnteringId(IdForm),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    catalog: Catalog,
    selected: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        let mut app = Self {
            catalog,
            selected: 0,
            screen: Screen::Menu,
            mode: Mode::Normal,
            status: None,
        };

        let skipped = app.catalog.skipped().len();
        if skipped > 0 {
            let text = format!(
                "Skipped {skipped} unreadable line(s) in {}.",
                app.catalog.path().display()
            );
            app.set_status(text, StatusKind::Error);
        }
        app
    }

    /// Process one key press. Returns `true` when the user asked to exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form),
            Mode::EnteringId(form) => self.handle_enter_id(code, form),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Menu => match code {
                KeyCode::Char('q') | KeyCode::Esc => *exit = true,
                KeyCode::Up => self.move_menu(-1),
                KeyCode::Down => self.move_menu(1),
                KeyCode::Enter => {
                    let choice = MenuChoice::ALL[self.selected];
                    return Ok(self.activate(choice, exit));
                }
                KeyCode::Char(ch) => match MenuChoice::from_input(ch.encode_utf8(&mut [0; 4])) {
                    Some(choice) => {
                        self.selected = choice.number() - 1;
                        return Ok(self.activate(choice, exit));
                    }
                    None => self.set_status(INVALID_CHOICE, StatusKind::Error),
                },
                _ => {}
            },
            Screen::Books(ref mut table) => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => {
                    self.screen = Screen::Menu;
                    self.clear_status();
                }
                KeyCode::Up => table.move_selection(-1),
                KeyCode::Down => table.move_selection(1),
                KeyCode::PageUp => table.move_selection(-PAGE_STEP),
                KeyCode::PageDown => table.move_selection(PAGE_STEP),
                KeyCode::Home => table.select_first(),
                KeyCode::End => table.select_last(),
                _ => {}
            },
        }
        Ok(Mode::Normal)
    }

    /// Run a menu entry: open its popup or switch screens.
    fn activate(&mut self, choice: MenuChoice, exit: &mut bool) -> Mode {
        debug!(?choice, "menu choice");
        self.clear_status();
        match choice {
            MenuChoice::Add => Mode::AddingBook(BookForm::default()),
            MenuChoice::Display => {
                let books = self.catalog.list_all().to_vec();
                self.screen = Screen::Books(BookTable::new("All Books", books));
                Mode::Normal
            }
            MenuChoice::Issue | MenuChoice::Return | MenuChoice::Search => {
                Mode::EnteringId(IdForm::new(choice))
            }
            MenuChoice::Exit => {
                *exit = true;
                Mode::Normal
            }
        }
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.cycle_field(1),
            KeyCode::BackTab | KeyCode::Up => form.cycle_field(-1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_book(&form) {
                Ok(()) => return Mode::Normal,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingBook(form)
    }

    fn handle_enter_id(&mut self, code: KeyCode, mut form: IdForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                let id = match form.parse_id() {
                    Ok(id) => id,
                    Err(err) => {
                        form.error = Some(surface_error(&err));
                        return Mode::EnteringId(form);
                    }
                };
                match self.apply_id_action(form.choice, id) {
                    Ok(()) => return Mode::Normal,
                    Err(err) if is_expected_outcome(&err) => {
                        self.set_status(err.to_string(), StatusKind::Error);
                        return Mode::Normal;
                    }
                    Err(err) => {
                        error!(error = %err, "catalog operation failed");
                        let message = err.to_string();
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::EnteringId(form)
    }

    fn save_new_book(&mut self, form: &BookForm) -> Result<()> {
        let (id, title, author) = form.parse_inputs()?;
        let outcome = self.catalog.add(id, title, author)?;
        self.set_status(add_message(id, outcome), StatusKind::Info);
        Ok(())
    }

    fn apply_id_action(&mut self, choice: MenuChoice, id: i64) -> Result<(), CatalogError> {
        match choice {
            MenuChoice::Issue => {
                self.catalog.issue(id)?;
                self.set_status(ISSUED, StatusKind::Info);
            }
            MenuChoice::Return => {
                self.catalog.return_book(id)?;
                self.set_status(RETURNED, StatusKind::Info);
            }
            MenuChoice::Search => {
                let book = self.catalog.search(id)?.clone();
                self.screen = Screen::Books(BookTable::new("Book Found", vec![book]));
            }
            MenuChoice::Add | MenuChoice::Display | MenuChoice::Exit => {}
        }
        Ok(())
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);
        let [content_area, footer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(footer_height)]).areas(area);

        match &self.screen {
            Screen::Menu => self.draw_menu(frame, content_area),
            Screen::Books(table) => self.draw_books(frame, content_area, table),
        }
        self.draw_footer(frame, footer_area);

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, form),
            Mode::EnteringId(form) => self.draw_id_form(frame, area, form),
            Mode::Normal => {}
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = MenuChoice::ALL
            .iter()
            .map(|choice| ListItem::new(format!("{}. {}", choice.number(), choice.label())))
            .collect();
        let title = format!("{MENU_TITLE} ({} books)", self.catalog.len());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_books(&self, frame: &mut Frame, area: Rect, table: &BookTable) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(table.title.clone());

        if table.books.is_empty() {
            let message = Paragraph::new(EMPTY_CATALOG)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);
        let [header_area, rows_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                table_header(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("-".repeat(header_area.width as usize)),
        ]);
        frame.render_widget(header, header_area);

        let items: Vec<ListItem> = table
            .books
            .iter()
            .map(|book| {
                let style = if book.issued {
                    Style::default().fg(Color::Gray)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(book.table_row(), style)))
            })
            .collect();
        let list = List::new(items).highlight_style(Style::default().fg(Color::Yellow));
        let mut state = ListState::default().with_selected(Some(table.selected));
        frame.render_stateful_widget(list, rows_area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let status_line = match &self.status {
            Some(status) => Line::from(Span::styled(status.text.clone(), status.kind.style())),
            None => Line::from(""),
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.screen, &self.mode) {
            (_, Mode::AddingBook(_)) => key_hints(&[
                ("Tab", "Next field"),
                ("Enter", "Save"),
                ("Esc", "Cancel"),
            ]),
            (_, Mode::EnteringId(_)) => key_hints(&[("Enter", "Submit"), ("Esc", "Cancel")]),
            (Screen::Menu, Mode::Normal) => key_hints(&[
                ("1-6", "Choose"),
                ("↑↓", "Navigate"),
                ("Enter", "Select"),
                ("q", "Quit"),
            ]),
            (Screen::Books(_), Mode::Normal) => key_hints(&[
                ("↑↓", "Scroll"),
                ("PgUp/PgDn", "Page"),
                ("Esc", "Menu"),
                ("q", "Quit"),
            ]),
        }
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(60, 8, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Book").borders(Borders::ALL);
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let mut lines: Vec<Line> = BookField::ORDER
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        lines.push(form_hint(form.error.as_deref()));

        frame.render_widget(Paragraph::new(lines), inner);

        let (column, row) = form.cursor();
        frame.set_cursor_position((inner.x + column, inner.y + row));
    }

    fn draw_id_form(&self, frame: &mut Frame, area: Rect, form: &IdForm) {
        let popup_area = centered_rect(50, 5, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(form.choice.label())
            .borders(Borders::ALL);
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let lines = vec![form.build_line(), form_hint(form.error.as_deref())];
        frame.render_widget(Paragraph::new(lines), inner);

        let (column, row) = form.cursor();
        frame.set_cursor_position((inner.x + column, inner.y + row));
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn move_menu(&mut self, offset: isize) {
        let len = MenuChoice::ALL.len() as isize;
        self.selected = (self.selected as isize + offset).rem_euclid(len) as usize;
    }
}

/// Error text when present, otherwise the usual key reminder.
fn form_hint(error: Option<&str>) -> Line<'static> {
    match error {
        Some(error) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            "Enter to confirm • Esc to cancel",
            Style::default().fg(Color::Gray),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    fn app_with(books: &[(i64, &str, &str)]) -> (TempDir, App) {
        let tmp = TempDir::new().unwrap();
        let mut catalog = Catalog::open(tmp.path().join("library.txt")).unwrap();
        for (id, title, author) in books {
            catalog.add(*id, *title, *author).unwrap();
        }
        (tmp, App::new(catalog))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn status_text(app: &App) -> Option<(&str, StatusKind)> {
        app.status.as_ref().map(|s| (s.text.as_str(), s.kind))
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn add_book_through_form() {
        let (_tmp, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Char('1')).unwrap();
        assert!(matches!(app.mode, Mode::AddingBook(_)));

        type_text(&mut app, "7");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Dune");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Herbert");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(
            status_text(&app),
            Some(("Book added successfully.", StatusKind::Info))
        );
        assert_eq!(app.catalog.list_all().len(), 1);
        assert_eq!(app.catalog.list_all()[0].title, "Dune");
    }

    #[test]
    fn form_without_id_stays_open() {
        let (_tmp, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Char('1')).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Dune");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::AddingBook(form) => {
                assert_eq!(form.error.as_deref(), Some("Book ID is required."))
            }
            _ => panic!("form should stay open"),
        }
        assert!(app.catalog.is_empty());
    }

    #[test]
    fn form_stores_text_as_typed() {
        let (_tmp, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Char('1')).unwrap();
        type_text(&mut app, "7");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "  Dune  ");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        let book = app.catalog.search(7).unwrap();
        assert_eq!(book.title, "  Dune  ");
        assert_eq!(book.author, "");
    }

    #[test]
    fn issue_then_issue_again() {
        let (_tmp, mut app) = app_with(&[(7, "Dune", "Herbert")]);

        app.handle_key(KeyCode::Char('3')).unwrap();
        type_text(&mut app, "7");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(
            status_text(&app),
            Some(("Book issued successfully.", StatusKind::Info))
        );

        app.handle_key(KeyCode::Char('3')).unwrap();
        type_text(&mut app, "7");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(
            status_text(&app),
            Some(("Book already issued.", StatusKind::Error))
        );
        assert!(app.catalog.search(7).unwrap().issued);
    }

    #[test]
    fn return_unknown_id_reports_not_found() {
        let (_tmp, mut app) = app_with(&[(7, "Dune", "Herbert")]);
        app.handle_key(KeyCode::Char('4')).unwrap();
        type_text(&mut app, "99");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(
            status_text(&app),
            Some(("Book not found.", StatusKind::Error))
        );
    }

    #[test]
    fn search_opens_single_row_table() {
        let (_tmp, mut app) = app_with(&[(1, "Emma", "Austen"), (2, "Dune", "Herbert")]);
        app.handle_key(KeyCode::Char('5')).unwrap();
        type_text(&mut app, "2");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.screen {
            Screen::Books(table) => {
                assert_eq!(table.title, "Book Found");
                assert_eq!(table.books.len(), 1);
                assert_eq!(table.books[0].title, "Dune");
            }
            Screen::Menu => panic!("search should show the result table"),
        }
        assert!(render(&app).contains("Dune"));

        app.handle_key(KeyCode::Esc).unwrap();
        assert!(matches!(app.screen, Screen::Menu));
    }

    #[test]
    fn display_empty_catalog_shows_message() {
        let (_tmp, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Char('2')).unwrap();
        assert!(render(&app).contains(EMPTY_CATALOG));
    }

    #[test]
    fn display_lists_books_with_status() {
        let (_tmp, mut app) = app_with(&[(1, "Emma", "Austen")]);
        app.handle_key(KeyCode::Char('2')).unwrap();
        let screen = render(&app);
        assert!(screen.contains("Title"));
        assert!(screen.contains("Available"));
    }

    #[test]
    fn unknown_key_is_invalid_choice() {
        let (_tmp, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Char('9')).unwrap();
        assert_eq!(status_text(&app), Some((INVALID_CHOICE, StatusKind::Error)));
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn exit_entry_and_quit_key_end_loop() {
        let (_tmp, mut app) = app_with(&[]);
        assert!(app.handle_key(KeyCode::Char('6')).unwrap());
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn menu_navigation_wraps_and_activates() {
        let (_tmp, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Up).unwrap();
        assert_eq!(app.selected, 5);
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.screen, Screen::Books(_)));
    }
}
