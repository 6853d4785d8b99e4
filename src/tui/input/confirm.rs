use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::store::Backend;
use crate::tui::app::App;

pub(super) fn handle_confirm<B: Backend>(app: &mut App<B>, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('y' | 'Y')) => {
            app.resolve_confirm(true);
        }
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.resolve_confirm(false);
        }
        _ => {}
    }
}
