use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::store::Backend;
use crate::tui::app::{App, FormField};
use crate::tui::input::text::LineEditor;
use crate::util::unicode::{display_width, truncate_to_width};
use crate::view::toast::ToastKind;

use super::centered_rect_fixed;

const FORM_WIDTH: u16 = 56;
const LABEL_WIDTH: usize = 10;

/// Render the add-task form
pub fn render_add_form<B: Backend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let bg = app.theme.background;
    let overlay_area = centered_rect_fixed(FORM_WIDTH, 8, area);
    frame.render_widget(Clear, overlay_area);

    let inner_w = overlay_area.width.saturating_sub(2) as usize;
    let field_w = inner_w.saturating_sub(LABEL_WIDTH + 1);
    let notify = if form.notify { "[x] remind me" } else { "[ ] remind me" };
    let category = format!("< {} {} >", form.category.icon(), form.category.label());

    let lines = vec![
        field_line(app, "Title", form.title.text(), field_w, form.focus == FormField::Title),
        field_line(
            app,
            "Due",
            if form.due.text().is_empty() && form.focus != FormField::Due {
                "YYYY-MM-DD HH:MM"
            } else {
                form.due.text()
            },
            field_w,
            form.focus == FormField::Due,
        ),
        field_line(app, "Category", &category, field_w, form.focus == FormField::Category),
        field_line(app, "Notify", notify, field_w, form.focus == FormField::Notify),
        Line::from(""),
        Line::from(Span::styled(
            " Enter save  Esc cancel",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];

    let block = Block::default()
        .title(Span::styled(
            " Add Task ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);

    // Terminal cursor in the focused text field
    let editor = match form.focus {
        FormField::Title => Some((&form.title, 0u16)),
        FormField::Due => Some((&form.due, 1u16)),
        _ => None,
    };
    if let Some((editor, row)) = editor {
        place_cursor(frame, editor, overlay_area, row, field_w);
    }
}

fn field_line<'a, B: Backend>(
    app: &App<B>,
    label: &str,
    value: &str,
    width: usize,
    focused: bool,
) -> Line<'a> {
    let bg = app.theme.background;
    let label_style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let value_bg = if focused { app.theme.selection_bg } else { bg };
    let value = truncate_to_width(value, width);
    let pad = width.saturating_sub(display_width(&value));
    Line::from(vec![
        Span::styled(format!(" {:<w$}", label, w = LABEL_WIDTH), label_style),
        Span::styled(
            format!("{}{}", value, " ".repeat(pad)),
            Style::default().fg(app.theme.text_bright).bg(value_bg),
        ),
    ])
}

fn place_cursor(frame: &mut Frame, editor: &LineEditor, area: Rect, row: u16, field_w: usize) {
    let col = editor.cursor_col().min(field_w.saturating_sub(1)) as u16;
    let x = area.x + 1 + 1 + LABEL_WIDTH as u16 + col;
    let y = area.y + 1 + row;
    frame.set_cursor_position(Position::new(x, y));
}

/// Render the inline title editor
pub fn render_edit<B: Backend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let Some(edit) = app.edit.as_ref() else {
        return;
    };
    let bg = app.theme.background;
    let overlay_area = centered_rect_fixed(FORM_WIDTH, 3, area);
    frame.render_widget(Clear, overlay_area);

    let field_w = overlay_area.width.saturating_sub(2) as usize;
    let text = truncate_to_width(edit.editor.text(), field_w);
    let block = Block::default()
        .title(Span::styled(
            " Edit Task ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let line = Line::from(Span::styled(
        text,
        Style::default().fg(app.theme.text_bright).bg(bg),
    ));
    frame.render_widget(Paragraph::new(line).block(block), overlay_area);

    let col = edit.editor.cursor_col().min(field_w.saturating_sub(1)) as u16;
    frame.set_cursor_position(Position::new(overlay_area.x + 1 + col, overlay_area.y + 1));
}

/// Render the delete confirmation
pub fn render_confirm<B: Backend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let Some(confirm) = app.confirm.as_ref() else {
        return;
    };
    let bg = app.theme.background;
    let overlay_area = centered_rect_fixed(FORM_WIDTH, 4, area);
    frame.render_widget(Clear, overlay_area);

    let inner_w = overlay_area.width.saturating_sub(2) as usize;
    // Room for the surrounding ` Delete "` and `"?`
    let title = truncate_to_width(&confirm.title, inner_w.saturating_sub(11));
    let lines = vec![
        Line::from(vec![
            Span::styled(" Delete \"", Style::default().fg(app.theme.text).bg(bg)),
            Span::styled(
                title,
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("\"?", Style::default().fg(app.theme.text).bg(bg)),
        ]),
        Line::from(vec![
            Span::styled(
                " y",
                Style::default()
                    .fg(app.theme.red)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" delete  ", Style::default().fg(app.theme.dim).bg(bg)),
            Span::styled(
                "n",
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" keep", Style::default().fg(app.theme.dim).bg(bg)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

/// Render the help overlay (toggled with ?)
pub fn render_help<B: Backend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let bindings: [(&str, &str); 12] = [
        ("\u{2191}\u{2193}/jk", "Move cursor up/down"),
        ("g/G", "Jump to top/bottom"),
        ("Tab/S-Tab", "Next/previous filter"),
        ("1 2 3", "All / Active / Completed"),
        ("a", "Add task"),
        ("space/x", "Toggle completed"),
        ("e/Enter", "Edit title"),
        ("d", "Delete task"),
        ("r", "Reload"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
        ("Esc", "Close"),
    ];

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(" Key Bindings", header_style)),
        Line::from(""),
    ];
    for (key, desc) in bindings {
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<12}", key), key_style),
            Span::styled(desc, desc_style),
        ]));
    }

    let height = lines.len() as u16 + 2;
    let overlay_area = centered_rect_fixed(44, height, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

/// Stack live toasts in the bottom-right corner of `area`, newest lowest
pub fn render_toasts<B: Backend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    if app.toasts.is_empty() || area.width < 4 {
        return;
    }
    let bg = app.theme.background;
    let max_w = (area.width as usize).min(60);
    let toasts: Vec<_> = app.toasts.iter().collect();
    let visible = toasts.len().min(area.height as usize);

    for (i, toast) in toasts[toasts.len() - visible..].iter().enumerate() {
        let color = match toast.kind {
            ToastKind::Success => app.theme.green,
            ToastKind::Error => app.theme.red,
            ToastKind::Alert => app.theme.yellow,
        };
        let text = truncate_to_width(&format!(" {} ", toast.text), max_w);
        let w = display_width(&text) as u16;
        let y = area.y + area.height - visible as u16 + i as u16;
        let rect = Rect::new(area.x + area.width - w, y, w, 1);
        frame.render_widget(Clear, rect);
        let line = Line::from(Span::styled(
            text,
            Style::default()
                .fg(bg)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line), rect);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use crate::tui::app::{AddForm, ConfirmState, Mode};
    use std::time::Instant;

    #[test]
    fn add_form_lists_fields() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = empty_app(&dir);
        app.mode = Mode::Add;
        app.form = Some(AddForm::default());
        let out = render_app(&mut app);
        assert!(out.contains("Add Task"));
        assert!(out.contains("Title"));
        assert!(out.contains("YYYY-MM-DD HH:MM"));
        assert!(out.contains("Personal"));
        assert!(out.contains("[ ] remind me"));
    }

    #[test]
    fn confirm_names_the_task() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app_with_titles(&dir, &["Buy milk"], &[]);
        let id = app.store.list()[0].id.clone();
        app.mode = Mode::Confirm;
        app.confirm = Some(ConfirmState {
            id,
            title: "Buy milk".into(),
        });
        let out = render_app(&mut app);
        assert!(out.contains("Delete \"Buy milk\"?"));
        assert!(out.contains("y delete"));
    }

    #[test]
    fn toasts_render_bottom_right() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = empty_app(&dir);
        app.toasts.success("Task added successfully!", Instant::now());
        let out = render_app(&mut app);
        let line = out
            .lines()
            .find(|l| l.contains("Task added successfully!"))
            .unwrap();
        assert!(line.ends_with("Task added successfully!"));
    }

    #[test]
    fn help_overlay_lists_bindings() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = empty_app(&dir);
        app.show_help = true;
        let out = render_app(&mut app);
        assert!(out.contains("Key Bindings"));
        assert!(out.contains("Toggle completed"));
    }
}
