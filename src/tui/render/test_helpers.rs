use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::model::config::AlertConfig;
use crate::model::task::TaskDraft;
use crate::store::{LocalBackend, TaskStore};
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over an empty local store in `dir`.
pub fn empty_app(dir: &TempDir) -> App<LocalBackend> {
    let store = TaskStore::open(LocalBackend::open(dir.path())).unwrap();
    App::new(
        store,
        Theme::default(),
        Duration::from_secs(3),
        &AlertConfig::default(),
    )
}

/// An App with one task per title; titles listed in `done` are completed.
pub fn app_with_titles(dir: &TempDir, titles: &[&str], done: &[&str]) -> App<LocalBackend> {
    let mut app = empty_app(dir);
    for title in titles {
        let task = app.store.add(TaskDraft::new(*title)).unwrap();
        if done.contains(title) {
            app.store.toggle(&task.id).unwrap();
        }
    }
    app
}

/// Render the whole screen for `app`.
pub fn render_app(app: &mut App<LocalBackend>) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _area| {
        super::render(frame, app);
    })
}
