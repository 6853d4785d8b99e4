use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::store::Backend;
use crate::tui::app::{App, FormField, Mode};

pub(super) fn handle_add_form<B: Backend>(app: &mut App<B>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.form = None;
            app.mode = Mode::Navigate;
            return;
        }
        KeyCode::Enter => {
            app.submit_form();
            return;
        }
        _ => {}
    }

    let Some(form) = app.form.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    match (key.modifiers, key.code) {
        (_, KeyCode::Tab) | (_, KeyCode::Down) => form.focus = form.focus.next(),
        (_, KeyCode::BackTab) | (_, KeyCode::Up) => form.focus = form.focus.prev(),
        _ => match form.focus {
            FormField::Title => {
                form.title.handle_key(key);
            }
            FormField::Due => {
                form.due.handle_key(key);
            }
            FormField::Category => match key.code {
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                    form.category = form.category.next()
                }
                KeyCode::Left | KeyCode::Char('h') => form.category = form.category.prev(),
                _ => {}
            },
            FormField::Notify => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right)
                    && !key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    form.notify = !form.notify;
                }
            }
        },
    }
}

pub(super) fn handle_edit<B: Backend>(app: &mut App<B>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.edit = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => app.submit_edit(),
        _ => {
            if let Some(state) = app.edit.as_mut() {
                state.editor.handle_key(key);
            }
        }
    }
}
