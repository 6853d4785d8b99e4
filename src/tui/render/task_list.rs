use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::store::Backend;
use crate::tui::app::App;
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};
use crate::view::rows::{ListView, TaskRow};

/// Cells reserved for the due column
const DUE_WIDTH: usize = 16;

/// Render the filtered task list, keeping the cursor row in view
pub fn render_task_list<B: Backend>(frame: &mut Frame, app: &mut App<B>, area: Rect) {
    let bg = app.theme.background;
    let height = area.height as usize;
    if height == 0 {
        return;
    }

    let rows = match app.list_view() {
        ListView::Empty(placeholder) => {
            let line = Line::from(Span::styled(
                format!("  {}", placeholder),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
            frame.render_widget(Paragraph::new(vec![Line::from(""), line]), area);
            return;
        }
        ListView::Rows(rows) => rows,
    };

    // Adjust scroll so the cursor stays visible
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }
    app.scroll_offset = app.scroll_offset.min(rows.len().saturating_sub(1));

    let width = area.width as usize;
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
        .map(|(i, row)| row_line(app, row, i == app.cursor, width))
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn row_line<'a, B: Backend>(app: &App<B>, row: &TaskRow, selected: bool, width: usize) -> Line<'a> {
    let theme = &app.theme;
    let bg = if selected { theme.selection_bg } else { theme.background };
    let base = Style::default().bg(bg);

    let marker = if selected { "\u{258E}" } else { " " };
    let check_style = if row.checked {
        base.fg(theme.green)
    } else {
        base.fg(theme.text)
    };
    let mut title_style = if row.checked {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else {
        base.fg(theme.text_bright)
    };
    if selected {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }

    let tag = row.category_tag();
    let tag_width = display_width(&tag);
    // marker + checkbox + spaces around title + due + tag
    let fixed = 1 + 3 + 1 + 2 + DUE_WIDTH + 2 + tag_width;
    let title_width = width.saturating_sub(fixed).max(1);

    let title = pad_to_width(&row.title, title_width);
    let due = pad_to_width(&truncate_to_width(&row.due, DUE_WIDTH), DUE_WIDTH);

    let mut spans = vec![
        Span::styled(marker, base.fg(theme.highlight)),
        Span::styled(row.checkbox(), check_style),
        Span::styled(" ", base),
        Span::styled(title, title_style),
        Span::styled("  ", base),
        Span::styled(due, base.fg(theme.cyan)),
        Span::styled("  ", base),
        Span::styled(tag, base.fg(theme.category_color(row.category))),
    ];

    // Fill the rest of a selected row with the selection background
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    if selected && used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use super::*;
    use crate::view::rows::EMPTY_STATE;

    #[test]
    fn empty_list_shows_placeholder() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = empty_app(&dir);
        let out = render_to_string(TERM_W, 5, |frame, area| {
            render_task_list(frame, &mut app, area);
        });
        assert!(out.contains(EMPTY_STATE));
    }

    #[test]
    fn rows_show_checkbox_title_due_and_category() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app_with_titles(&dir, &["Buy milk", "Call mom"], &["Call mom"]);
        let out = render_to_string(TERM_W, 5, |frame, area| {
            render_task_list(frame, &mut app, area);
        });
        let milk = out.lines().find(|l| l.contains("Buy milk")).unwrap();
        assert!(milk.contains("[ ]"));
        assert!(milk.contains("No due date"));
        assert!(milk.contains("Personal"));
        let mom = out.lines().find(|l| l.contains("Call mom")).unwrap();
        assert!(mom.contains("[x]"));
    }

    #[test]
    fn long_titles_are_truncated() {
        let dir = tempfile::TempDir::new().unwrap();
        let long = "a very long task title that will never fit in a narrow terminal";
        let mut app = app_with_titles(&dir, &[long], &[]);
        let out = render_to_string(50, 3, |frame, area| {
            render_task_list(frame, &mut app, area);
        });
        assert!(!out.contains(long));
        assert!(out.contains('\u{2026}'));
    }

    #[test]
    fn scroll_follows_cursor() {
        let dir = tempfile::TempDir::new().unwrap();
        let titles: Vec<String> = (0..10).map(|i| format!("task {}", i)).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let mut app = app_with_titles(&dir, &refs, &[]);
        app.cursor = 9;
        render_to_string(TERM_W, 4, |frame, area| {
            render_task_list(frame, &mut app, area);
        });
        assert_eq!(app.scroll_offset, 6);
    }
}
