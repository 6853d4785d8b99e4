pub mod popup;
pub mod status_row;
pub mod tab_bar;
pub mod task_list;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::store::Backend;
use crate::tui::app::{App, Mode};

/// Main render function, dispatches to sub-renderers
pub fn render<B: Backend>(frame: &mut Frame, app: &mut App<B>) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // task list
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);
    task_list::render_task_list(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);

    match app.mode {
        Mode::Add => popup::render_add_form(frame, app, area),
        Mode::Edit => popup::render_edit(frame, app, area),
        Mode::Confirm => popup::render_confirm(frame, app, area),
        Mode::Navigate => {}
    }

    if app.show_help {
        popup::render_help(frame, app, area);
    }

    // Toasts sit above the status row, on top of everything else
    popup::render_toasts(frame, app, chunks[1]);
}

/// A `width` x `height` rect centered in `area`, clamped to fit
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
