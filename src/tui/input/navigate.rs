use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::filter::Filter;
use crate::store::Backend;
use crate::tui::app::{AddForm, App, ConfirmState, EditState, Mode};
use crate::view::actions::RowAction;

use super::text::LineEditor;

pub(super) fn handle_navigate<B: Backend>(app: &mut App<B>, key: KeyEvent) {
    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('?')) => app.show_help = true,

        // Movement
        (KeyModifiers::NONE, KeyCode::Char('j')) | (_, KeyCode::Down) => app.move_cursor(1),
        (KeyModifiers::NONE, KeyCode::Char('k')) | (_, KeyCode::Up) => app.move_cursor(-1),
        (KeyModifiers::NONE, KeyCode::Char('g')) | (_, KeyCode::Home) => app.cursor = 0,
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('G')) | (_, KeyCode::End) => {
            app.cursor = app.row_count().saturating_sub(1);
        }

        // Filter tabs
        (_, KeyCode::Tab) => {
            let next = app.store.filter().next();
            app.set_filter(next);
        }
        (_, KeyCode::BackTab) => {
            let prev = app.store.filter().next().next();
            app.set_filter(prev);
        }
        (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
            let idx = c as usize - '1' as usize;
            app.set_filter(Filter::ALL[idx]);
        }

        // Row actions
        (KeyModifiers::NONE, KeyCode::Char('a')) => {
            app.form = Some(AddForm::default());
            app.mode = Mode::Add;
        }
        (KeyModifiers::NONE, KeyCode::Char(' ') | KeyCode::Char('x')) => {
            app.act_on_selected(RowAction::Toggle);
        }
        (KeyModifiers::NONE, KeyCode::Char('e')) | (_, KeyCode::Enter) => begin_edit(app),
        (KeyModifiers::NONE, KeyCode::Char('d')) => begin_delete(app),
        (KeyModifiers::NONE, KeyCode::Char('r')) => app.reload(),
        _ => {}
    }
}

fn begin_edit<B: Backend>(app: &mut App<B>) {
    let Some(task) = app.selected_id().and_then(|id| app.store.get(&id).cloned()) else {
        return;
    };
    app.edit = Some(EditState {
        id: task.id,
        editor: LineEditor::with_text(&task.title),
    });
    app.mode = Mode::Edit;
}

fn begin_delete<B: Backend>(app: &mut App<B>) {
    let Some(task) = app.selected_id().and_then(|id| app.store.get(&id).cloned()) else {
        return;
    };
    app.confirm = Some(ConfirmState {
        id: task.id,
        title: task.title,
    });
    app.mode = Mode::Confirm;
}
