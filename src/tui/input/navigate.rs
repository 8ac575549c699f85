use crossterm::event::{KeyCode, KeyEvent};

use crate::io::storage::KeyValueStorage;
use crate::render::RendererKind;
use crate::sync::UiEvent;
use crate::tui::app::{AddField, App, Mode};

use super::text::TextInput;

pub(super) fn handle_navigate<S: KeyValueStorage + 'static>(app: &mut App<S>, key: KeyEvent) {
    // Any key dismisses the last message
    app.message = None;

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Movement
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.jump_to(true),
        KeyCode::Char('G') | KeyCode::End => app.jump_to(false),

        // Task actions
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let Some(id) = app.selected_id() {
                app.apply(UiEvent::Toggle { id });
            }
        }
        KeyCode::Char('a') => {
            app.title_input.clear();
            app.category_input.clear();
            app.add_field = AddField::Title;
            app.mode = Mode::Add;
        }
        KeyCode::Char('e') => {
            if let Some(task) = app.selected_id().and_then(|id| app.sync.store().get_by_id(id)) {
                app.title_input = TextInput::with_text(task.title());
                app.mode = Mode::Edit(task.id());
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.selected_id() {
                app.apply(UiEvent::Delete { id });
            }
        }
        KeyCode::Char('X') => {
            if !app.sync.store().is_empty() {
                app.mode = Mode::ConfirmClear;
            }
        }

        // Views
        KeyCode::Char('v') | KeyCode::Tab => app.cycle_view(),
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            app.set_view(RendererKind::ALL[idx]);
        }
        _ => {}
    }
}
