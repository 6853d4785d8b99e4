mod confirm;
mod form;
mod navigate;
pub mod text;

use crossterm::event::{KeyCode, KeyEvent};

use crate::store::Backend;

use super::app::{App, Mode};

use confirm::handle_confirm;
use form::{handle_add_form, handle_edit};
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key<B: Backend>(app: &mut App<B>, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Add => handle_add_form(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}
