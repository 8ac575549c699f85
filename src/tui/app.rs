use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::cli::handlers::{load_workspace_at, open_sync};
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::storage::{FileStorage, KeyValueStorage};
use crate::model::task::TaskId;
use crate::render::{RendererKind, Theme};
use crate::sync::{EventOutcome, SyncError, Synchronizer, UiEvent};

use super::input;
use super::input::text::TextInput;
use super::render;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task into the title/category prompt
    Add,
    /// Editing the title of an existing task
    Edit(TaskId),
    /// Waiting for y/n before clearing every task
    ConfirmClear,
}

/// Which add-prompt field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Title,
    Category,
}

/// Transient message shown in the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App<S: KeyValueStorage + 'static> {
    pub sync: Synchronizer<S>,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    pub show_key_hints: bool,
    /// Index into the surface's task units
    pub cursor: usize,
    /// First visible content row
    pub scroll: usize,
    pub title_input: TextInput,
    pub category_input: TextInput,
    pub add_field: AddField,
    pub message: Option<StatusMessage>,
}

impl<S: KeyValueStorage + 'static> App<S> {
    pub fn new(sync: Synchronizer<S>, theme: Theme, show_key_hints: bool) -> Self {
        App {
            sync,
            theme,
            mode: Mode::Navigate,
            should_quit: false,
            show_key_hints,
            cursor: 0,
            scroll: 0,
            title_input: TextInput::new(),
            category_input: TextInput::new(),
            add_field: AddField::Title,
            message: None,
        }
    }

    pub fn task_count(&self) -> usize {
        self.sync.surface().units().len()
    }

    /// Id of the task under the cursor
    pub fn selected_id(&self) -> Option<TaskId> {
        self.sync.surface().units().get(self.cursor).map(|u| u.id)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.task_count();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, count as isize - 1) as usize;
    }

    pub fn jump_to(&mut self, first: bool) {
        self.cursor = if first {
            0
        } else {
            self.task_count().saturating_sub(1)
        };
    }

    /// Put the cursor on `id`; returns false if it is not shown
    pub fn select_id(&mut self, id: TaskId) -> bool {
        let surface = self.sync.surface();
        match surface.units().iter().position(|u| u.id == id) {
            Some(pos) => {
                self.cursor = pos;
                true
            }
            None => false,
        }
    }

    fn clamp_cursor(&mut self) {
        let count = self.task_count();
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
    }

    pub fn set_view(&mut self, kind: RendererKind) {
        let selected = self.selected_id();
        self.sync.set_renderer(kind);
        self.scroll = 0;
        if let Some(id) = selected {
            self.select_id(id);
        }
    }

    pub fn cycle_view(&mut self) {
        let next = self.sync.renderer_kind().next();
        self.set_view(next);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    /// Forward an event to the synchronizer and update cursor and status
    /// from its outcome. Returns true when the store changed.
    pub fn apply(&mut self, event: UiEvent) -> bool {
        match self.sync.handle(event) {
            Ok(outcome) => {
                let changed = !matches!(outcome, EventOutcome::NotFound(_));
                match outcome {
                    EventOutcome::Added(task) => {
                        self.select_id(task.id());
                        self.info(format!("added #{}", task.id()));
                    }
                    EventOutcome::Updated(id) => self.info(format!("updated #{}", id)),
                    EventOutcome::Deleted(id) => {
                        self.clamp_cursor();
                        self.info(format!("deleted #{}", id));
                    }
                    EventOutcome::Toggled(_) => {}
                    EventOutcome::Cleared => {
                        self.cursor = 0;
                        self.scroll = 0;
                        self.info("cleared all tasks");
                    }
                    EventOutcome::NotFound(id) => self.error(format!("task not found: {}", id)),
                }
                changed
            }
            Err(SyncError::Validation(e)) => {
                self.error(e.to_string());
                false
            }
            Err(e @ SyncError::Storage(_)) => {
                // the store already holds the change; only the write failed
                self.error(e.to_string());
                true
            }
        }
    }

    /// Snapshot for `.state.json`
    pub fn ui_state(&self) -> UiState {
        UiState {
            renderer: Some(self.sync.renderer_kind()),
            selected: self.selected_id(),
        }
    }

    pub fn restore_ui_state(&mut self, state: &UiState) {
        if let Some(kind) = state.renderer {
            self.sync.set_renderer(kind);
        }
        if let Some(id) = state.selected {
            self.select_id(id);
        }
    }
}

fn save_ui_state<S: KeyValueStorage + 'static>(app: &App<S>, data_dir: &Path) {
    if let Err(e) = write_ui_state(data_dir, &app.ui_state()) {
        tracing::warn!(error = %e, "failed to save ui state");
    }
}

/// Launch the interactive view over the workspace found from `dir`
pub fn run(dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let ws = load_workspace_at(dir)?;
    let sync = open_sync(&ws, ws.config.ui.renderer)?;
    let theme = Theme::from_config(&ws.config.ui);
    let mut app = App::new(sync, theme, ws.config.ui.show_key_hints);

    // Restore saved UI state
    if let Some(state) = read_ui_state(&ws.data_dir) {
        app.restore_ui_state(&state);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &ws.data_dir);

    save_ui_state(&app, &ws.data_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<FileStorage>,
    data_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app, data_dir);
                save_counter = 0;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStorage;

    fn app_with(titles: &[(&str, &str)]) -> App<MemoryStorage> {
        let sync = Synchronizer::open(
            MemoryStorage::new(),
            "todos",
            RendererKind::List,
            Theme::default(),
        )
        .unwrap();
        let mut app = App::new(sync, Theme::default(), true);
        for (title, category) in titles {
            app.apply(UiEvent::Submit {
                text: title.to_string(),
                category: category.to_string(),
            });
        }
        app.cursor = 0;
        app.message = None;
        app
    }

    #[test]
    fn test_cursor_clamps() {
        let mut app = app_with(&[("a", ""), ("b", ""), ("c", "")]);
        app.move_cursor(-1);
        assert_eq!(app.cursor, 0);
        app.move_cursor(10);
        assert_eq!(app.cursor, 2);
        assert_eq!(app.selected_id(), Some(3));
        app.jump_to(true);
        assert_eq!(app.selected_id(), Some(1));
    }

    #[test]
    fn test_add_selects_new_task() {
        let mut app = app_with(&[("a", ""), ("b", "")]);
        assert!(app.apply(UiEvent::Submit {
            text: "c".into(),
            category: "Work".into(),
        }));
        assert_eq!(app.selected_id(), Some(3));
        assert_eq!(app.message.as_ref().unwrap().text, "added #3");
    }

    #[test]
    fn test_validation_error_sets_message() {
        let mut app = app_with(&[]);
        assert!(!app.apply(UiEvent::Submit {
            text: "   ".into(),
            category: String::new(),
        }));
        let msg = app.message.clone().unwrap();
        assert!(msg.is_error);
        assert_eq!(app.task_count(), 0);
    }

    #[test]
    fn test_delete_last_moves_cursor_up() {
        let mut app = app_with(&[("a", ""), ("b", "")]);
        app.cursor = 1;
        app.apply(UiEvent::Delete { id: 2 });
        assert_eq!(app.cursor, 0);
        assert_eq!(app.selected_id(), Some(1));
    }

    #[test]
    fn test_view_switch_keeps_selection() {
        let mut app = app_with(&[("a", ""), ("b", ""), ("c", "")]);
        app.cursor = 1;
        app.cycle_view();
        assert_eq!(app.sync.renderer_kind(), RendererKind::Card);
        assert_eq!(app.selected_id(), Some(2));
        app.set_view(RendererKind::Table);
        assert_eq!(app.selected_id(), Some(2));
    }

    #[test]
    fn test_ui_state_round_trip() {
        let mut app = app_with(&[("a", ""), ("b", "")]);
        app.cursor = 1;
        app.set_view(RendererKind::Compact);
        let state = app.ui_state();
        assert_eq!(state.renderer, Some(RendererKind::Compact));
        assert_eq!(state.selected, Some(2));

        let mut fresh = app_with(&[("a", ""), ("b", "")]);
        fresh.restore_ui_state(&state);
        assert_eq!(fresh.sync.renderer_kind(), RendererKind::Compact);
        assert_eq!(fresh.selected_id(), Some(2));
    }

    #[test]
    fn test_restore_ignores_missing_task() {
        let mut app = app_with(&[("a", "")]);
        app.restore_ui_state(&UiState {
            renderer: None,
            selected: Some(42),
        });
        assert_eq!(app.cursor, 0);
        assert_eq!(app.sync.renderer_kind(), RendererKind::List);
    }
}
