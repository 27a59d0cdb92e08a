//! Ratatui front end: a numbered main menu, popups for entering books and
//! ids, and a scrollable book table.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
