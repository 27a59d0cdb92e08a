//! Line-oriented front end: prints the numbered menu, reads one answer per
//! line and reports each outcome as plain text. Generic over the reader and
//! writer so scripts and tests can drive it without a terminal.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, error};

use crate::catalog::Catalog;
use crate::menu::{
    add_message, is_expected_outcome, parse_book_id, parse_new_book, MenuChoice, EMPTY_CATALOG,
    INVALID_CHOICE, ISSUED, MENU_TITLE, RETURNED,
};
use crate::models::{table_header, Book};

const RULE_WIDTH: usize = 60;

/// Drive the menu until the user picks Exit or input runs out.
pub fn run_console<R: BufRead, W: Write>(catalog: &mut Catalog, input: R, output: W) -> Result<()> {
    let mut console = Console {
        catalog,
        input,
        output,
    };
    console.run()
}

struct Console<'a, R, W> {
    catalog: &'a mut Catalog,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<'_, R, W> {
    fn run(&mut self) -> Result<()> {
        self.report_skipped()?;

        loop {
            self.print_menu()?;
            let Some(answer) = self.read_line()? else {
                writeln!(self.output)?;
                break;
            };

            match MenuChoice::from_input(&answer) {
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "Exiting program.")?;
                    break;
                }
                Some(choice) => {
                    debug!(?choice, "menu choice");
                    self.dispatch(choice)?;
                }
                None => writeln!(self.output, "{INVALID_CHOICE}")?,
            }
        }

        self.output.flush().context("failed to flush output")
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::Add => self.add_book(),
            MenuChoice::Display => self.display_books(),
            MenuChoice::Issue => self.with_book_id(choice, |console, id| {
                let result = console.catalog.issue(id).map(|_| ISSUED);
                console.report(result)
            }),
            MenuChoice::Return => self.with_book_id(choice, |console, id| {
                let result = console.catalog.return_book(id).map(|_| RETURNED);
                console.report(result)
            }),
            MenuChoice::Search => self.with_book_id(choice, |console, id| {
                match console.catalog.search(id) {
                    Ok(book) => {
                        let book = book.clone();
                        writeln!(console.output, "Book Found:")?;
                        console.print_table(std::slice::from_ref(&book))
                    }
                    Err(err) => console.report::<&str>(Err(err)),
                }
            }),
            MenuChoice::Exit => Ok(()),
        }
    }

    fn add_book(&mut self) -> Result<()> {
        let id = self.prompt("Enter Book ID: ")?;
        let title = self.prompt("Enter Title: ")?;
        let author = self.prompt("Enter Author: ")?;

        let (id, title, author) = match parse_new_book(&id, &title, &author) {
            Ok(values) => values,
            Err(err) => {
                writeln!(self.output, "{err}")?;
                return Ok(());
            }
        };

        let result = self
            .catalog
            .add(id, title, author)
            .map(|outcome| add_message(id, outcome));
        self.report(result)
    }

    fn display_books(&mut self) -> Result<()> {
        if self.catalog.is_empty() {
            writeln!(self.output, "{EMPTY_CATALOG}")?;
            return Ok(());
        }
        let books = self.catalog.list_all().to_vec();
        self.print_table(&books)
    }

    /// Prompt for a book id and hand it to `action`, or explain why the id
    /// was rejected.
    fn with_book_id<F>(&mut self, choice: MenuChoice, action: F) -> Result<()>
    where
        F: FnOnce(&mut Self, i64) -> Result<()>,
    {
        let prompt = format!("{}: ", choice.id_prompt().unwrap_or("Enter Book ID"));
        let raw = self.prompt(&prompt)?;
        match parse_book_id(&raw) {
            Ok(id) => action(self, id),
            Err(err) => {
                writeln!(self.output, "{err}")?;
                Ok(())
            }
        }
    }

    fn report<S: AsRef<str>>(&mut self, result: crate::error::Result<S>) -> Result<()> {
        match result {
            Ok(message) => writeln!(self.output, "{}", message.as_ref())?,
            Err(err) if is_expected_outcome(&err) => writeln!(self.output, "{err}")?,
            Err(err) => {
                error!(error = %err, "catalog operation failed");
                writeln!(self.output, "Error: {err}")?;
            }
        }
        Ok(())
    }

    fn print_table(&mut self, books: &[Book]) -> Result<()> {
        writeln!(self.output, "{}", table_header())?;
        writeln!(self.output, "{}", "-".repeat(RULE_WIDTH))?;
        for book in books {
            writeln!(self.output, "{book}")?;
        }
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "===== {MENU_TITLE} =====")?;
        for choice in MenuChoice::ALL {
            writeln!(self.output, "{}. {}", choice.number(), choice.label())?;
        }
        write!(self.output, "Enter choice: ")?;
        self.output.flush().context("failed to flush output")
    }

    fn report_skipped(&mut self) -> Result<()> {
        let skipped = self.catalog.skipped().len();
        if skipped > 0 {
            writeln!(
                self.output,
                "Warning: skipped {skipped} unreadable line(s) in {}.",
                self.catalog.path().display()
            )?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<String> {
        write!(self.output, "{text}")?;
        self.output.flush().context("failed to flush output")?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    /// Next line without its terminator, or `None` at end of input. Bytes that
    /// are not valid UTF-8 become U+FFFD instead of ending the session.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut raw = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut raw)
            .context("failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&raw);
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }
}
