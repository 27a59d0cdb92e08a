use anyhow::Error;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Produce a rectangle centered within `area` that spans the requested
/// percentage of its width and a fixed number of rows. Used for popups.
pub(crate) fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

/// Message shown to the user for a failed action. Only the outermost context
/// is used; inner causes such as `ParseIntError` go to the log instead.
pub(crate) fn surface_error(err: &Error) -> String {
    tracing::debug!(error = ?err, "action failed");
    err.to_string()
}

/// `[key] description` pairs rendered as one footer hint line.
pub(crate) fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (idx, (key, description)) in hints.iter().enumerate() {
        spans.push(Span::styled(format!("[{key}]"), key_style));
        let gap = if idx + 1 < hints.len() { "   " } else { "" };
        spans.push(Span::raw(format!(" {description}{gap}")));
    }
    Line::from(spans)
}
