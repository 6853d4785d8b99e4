use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::store::Backend;
use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the status row (bottom of screen)
pub fn render_status_row<B: Backend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (text, text_style) = match app.mode {
        Mode::Navigate => (
            app.stats().suggestion(),
            Style::default().fg(app.theme.text).bg(bg),
        ),
        Mode::Add => (
            "New task".to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Mode::Edit => (
            "Edit title".to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Mode::Confirm => (
            "Confirm delete".to_string(),
            Style::default().fg(app.theme.red).bg(bg),
        ),
    };
    let hint = match app.mode {
        Mode::Navigate => "a add  x toggle  d delete  ? help",
        Mode::Add => "Tab next field  Enter save  Esc cancel",
        Mode::Edit => "Enter save  Esc cancel",
        Mode::Confirm => "y delete  n keep",
    };

    let left = truncate_to_width(&format!(" {}", text), width);
    let mut spans = vec![Span::styled(left, text_style)];
    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint) + 1;
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            format!("{} ", hint),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
