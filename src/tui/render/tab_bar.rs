use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::filter::Filter;
use crate::store::Backend;
use crate::tui::app::App;

/// Render the filter tabs with counts, with a separator line below
pub fn render_tab_bar<B: Backend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));
    let stats = app.stats();
    let current = app.store.filter();

    let mut spans: Vec<Span> = vec![
        Span::styled(" ", bg_style),
        Span::styled("[x]", Style::default().fg(app.theme.purple).bg(bg)),
        Span::styled(" ", bg_style),
    ];
    for filter in Filter::ALL {
        let count = match filter {
            Filter::All => stats.total,
            Filter::Active => stats.remaining,
            Filter::Completed => stats.completed,
        };
        let style = tab_style(app, filter == current);
        spans.push(Span::styled(format!(" {} {} ", filter.label(), count), style));
        spans.push(sep.clone());
    }

    let tabs = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(tabs, chunks[0]);

    let rule = "\u{2500}".repeat(chunks[1].width as usize);
    let separator = Paragraph::new(Line::from(Span::styled(
        rule,
        Style::default().fg(app.theme.dim).bg(bg),
    )));
    frame.render_widget(separator, chunks[1]);
}

fn tab_style<B: Backend>(app: &App<B>, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use super::*;

    #[test]
    fn tabs_show_counts() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = app_with_titles(&dir, &["a", "b", "c"], &["c"]);
        let out = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        let first = out.lines().next().unwrap();
        assert!(first.contains("All 3"));
        assert!(first.contains("Active 2"));
        assert!(first.contains("Completed 1"));
    }
}
