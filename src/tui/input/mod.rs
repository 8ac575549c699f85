mod navigate;
mod prompt;
pub mod text;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};
use crate::io::storage::KeyValueStorage;

use navigate::handle_navigate;
use prompt::{handle_add, handle_confirm_clear, handle_edit};

/// Handle a key event in the current mode
pub fn handle_key<S: KeyValueStorage + 'static>(app: &mut App<S>, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Add => handle_add(app, key),
        Mode::Edit(id) => handle_edit(app, id, key),
        Mode::ConfirmClear => handle_confirm_clear(app, key),
    }
}


#[cfg(test)]
mod tests {
    use super::test_keys::*;
    use super::*;

    #[test]
    fn test_ctrl_c_quits_from_any_mode() {
        let mut app = test_app(&[]);
        handle_key(&mut app, ch('a'));
        assert_eq!(app.mode, Mode::Add);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_modifier_keys_ignored() {
        let mut app = test_app(&[]);
        handle_key(
            &mut app,
            key(KeyCode::Modifier(crossterm::event::ModifierKeyCode::LeftShift)),
        );
        assert_eq!(app.mode, Mode::Navigate);
        assert!(!app.should_quit);
    }
}
