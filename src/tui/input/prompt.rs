use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::storage::KeyValueStorage;
use crate::model::task::TaskId;
use crate::sync::UiEvent;
use crate::tui::app::{AddField, App, Mode};

use super::text::TextInput;

/// Apply an editing key to a buffer. Returns false for keys it ignores.
fn edit_buffer(input: &mut TextInput, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            input.kill_to_start()
        }
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => input.move_home(),
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => input.move_end(),
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => return false,
    }
    true
}

pub(super) fn handle_add<S: KeyValueStorage + 'static>(app: &mut App<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Navigate;
            app.message = None;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.add_field = match app.add_field {
                AddField::Title => AddField::Category,
                AddField::Category => AddField::Title,
            };
        }
        KeyCode::Enter => {
            let event = UiEvent::Submit {
                text: app.title_input.as_str().to_string(),
                category: app.category_input.as_str().to_string(),
            };
            // on a validation error the prompt stays open with its text
            if app.apply(event) {
                app.title_input.clear();
                app.category_input.clear();
                app.add_field = AddField::Title;
                app.mode = Mode::Navigate;
            }
        }
        _ => {
            let input = match app.add_field {
                AddField::Title => &mut app.title_input,
                AddField::Category => &mut app.category_input,
            };
            if edit_buffer(input, key) {
                app.message = None;
            }
        }
    }
}

pub(super) fn handle_edit<S: KeyValueStorage + 'static>(
    app: &mut App<S>,
    id: TaskId,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            app.title_input.clear();
            app.mode = Mode::Navigate;
            app.message = None;
        }
        KeyCode::Enter => {
            let event = UiEvent::Edit {
                id,
                text: app.title_input.as_str().to_string(),
            };
            let changed = app.apply(event);
            // a task deleted underneath the prompt also closes it
            if changed || app.sync.store().get_by_id(id).is_none() {
                app.title_input.clear();
                app.mode = Mode::Navigate;
            }
        }
        _ => {
            if edit_buffer(&mut app.title_input, key) {
                app.message = None;
            }
        }
    }
}

pub(super) fn handle_confirm_clear<S: KeyValueStorage + 'static>(app: &mut App<S>, key: KeyEvent) {
    if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
        app.apply(UiEvent::ClearAll);
    }
    app.mode = Mode::Navigate;
}
