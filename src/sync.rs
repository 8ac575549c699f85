//! Glue between the view, the task store, storage and the active renderer.
//!
//! The [`Synchronizer`] owns the store and registers one observer on it.
//! Every notification serializes the list, writes it under the storage key
//! and redraws the surface with the active [`TaskRenderer`]. The hydration
//! notification from `open` only redraws; stored text is rewritten by the
//! first real mutation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::io::storage::{KeyValueStorage, StorageError};
use crate::model::record::{TaskRecord, decode_records, encode_records};
use crate::model::task::{Task, TaskId, ValidationError};
use crate::ops::store::TaskStore;
use crate::render::{RendererKind, Surface, TaskRenderer, Theme};

/// Error type for synchronized operations
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Input produced by a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Submit { text: String, category: String },
    Edit { id: TaskId, text: String },
    Delete { id: TaskId },
    Toggle { id: TaskId },
    ClearAll,
}

/// Result of handling a [`UiEvent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Added(Task),
    Updated(TaskId),
    Deleted(TaskId),
    Toggled(Task),
    Cleared,
    NotFound(TaskId),
}

/// Active renderer, its surface and the last list it was given
struct Display {
    renderer: Box<dyn TaskRenderer>,
    theme: Theme,
    surface: Surface,
    records: Vec<TaskRecord>,
}

impl Display {
    fn show(&mut self, records: Vec<TaskRecord>) {
        self.records = records;
        self.renderer.render(&self.records, &mut self.surface);
    }
}

pub struct Synchronizer<S: KeyValueStorage + 'static> {
    store: TaskStore,
    storage: Rc<RefCell<S>>,
    display: Rc<RefCell<Display>>,
    /// Storage failure raised inside the observer, reported by the next
    /// `take_storage_error`
    storage_error: Rc<RefCell<Option<StorageError>>>,
    /// Off while hydrating so reads never rewrite storage
    persist: Rc<Cell<bool>>,
    key: String,
}

impl<S: KeyValueStorage + 'static> Synchronizer<S> {
    /// Read persisted tasks, wire the observer and hydrate the store.
    ///
    /// Stored entries whose title fails validation are skipped.
    pub fn open(storage: S, key: &str, kind: RendererKind, theme: Theme) -> Result<Self, SyncError> {
        let stored = storage.get(key)?;
        let tasks = match stored {
            Some(text) => hydrate(&text),
            None => Vec::new(),
        };

        let mut sync = Synchronizer {
            store: TaskStore::new(),
            storage: Rc::new(RefCell::new(storage)),
            display: Rc::new(RefCell::new(Display {
                renderer: kind.build(&theme),
                theme,
                surface: Surface::new(),
                records: Vec::new(),
            })),
            storage_error: Rc::new(RefCell::new(None)),
            persist: Rc::new(Cell::new(false)),
            key: key.to_string(),
        };
        sync.attach_observer();
        sync.store.load_all(tasks);
        sync.persist.set(true);
        Ok(sync)
    }

    fn attach_observer(&mut self) {
        let storage = Rc::clone(&self.storage);
        let display = Rc::clone(&self.display);
        let error_slot = Rc::clone(&self.storage_error);
        let persist = Rc::clone(&self.persist);
        let key = self.key.clone();

        self.store.subscribe(move |tasks| {
            let records: Vec<TaskRecord> = tasks.iter().map(Task::to_record).collect();
            if persist.get() {
                let written = encode_records(&records)
                    .map_err(StorageError::from)
                    .and_then(|json| storage.borrow_mut().set(&key, &json));
                if let Err(e) = written {
                    tracing::error!(key = %key, error = %e, "failed to persist tasks");
                    *error_slot.borrow_mut() = Some(e);
                }
            }
            display.borrow_mut().show(records);
        });
    }

    fn take_storage_error(&self) -> Result<(), SyncError> {
        match self.storage_error.borrow_mut().take() {
            Some(e) => Err(SyncError::Storage(e)),
            None => Ok(()),
        }
    }

    /// Apply a view event to the store.
    ///
    /// Validation failures are returned as errors; a missing id is the
    /// `NotFound` outcome and changes nothing.
    pub fn handle(&mut self, event: UiEvent) -> Result<EventOutcome, SyncError> {
        tracing::debug!(?event, "handling ui event");
        let outcome = match event {
            UiEvent::Submit { text, category } => {
                EventOutcome::Added(self.store.add_task(&text, &category)?)
            }
            UiEvent::Edit { id, text } => {
                if self.store.update_task(id, &text)? {
                    EventOutcome::Updated(id)
                } else {
                    EventOutcome::NotFound(id)
                }
            }
            UiEvent::Delete { id } => {
                if self.store.delete_task(id) {
                    EventOutcome::Deleted(id)
                } else {
                    EventOutcome::NotFound(id)
                }
            }
            UiEvent::Toggle { id } => {
                if self.store.toggle_task(id) {
                    match self.store.get_by_id(id) {
                        Some(task) => EventOutcome::Toggled(task),
                        None => EventOutcome::NotFound(id),
                    }
                } else {
                    EventOutcome::NotFound(id)
                }
            }
            UiEvent::ClearAll => {
                self.store.clear_all();
                EventOutcome::Cleared
            }
        };
        self.take_storage_error()?;
        Ok(outcome)
    }

    /// Swap the presentation strategy and redraw the last list.
    /// Neither the store nor storage is touched.
    pub fn set_renderer(&mut self, kind: RendererKind) {
        let mut display = self.display.borrow_mut();
        if display.renderer.kind() == kind {
            return;
        }
        let renderer = kind.build(&display.theme);
        display.renderer = renderer;
        let records = std::mem::take(&mut display.records);
        display.show(records);
        tracing::debug!(view = %kind, "renderer switched");
    }

    pub fn renderer_kind(&self) -> RendererKind {
        self.display.borrow().renderer.kind()
    }

    /// Snapshot of the current surface
    pub fn surface(&self) -> Surface {
        self.display.borrow().surface.clone()
    }

    /// The list last forwarded to the renderer
    pub fn records(&self) -> Vec<TaskRecord> {
        self.display.borrow().records.clone()
    }

    /// Read-only access to the store for queries
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Give back the storage backend
    pub fn into_storage(self) -> Option<S> {
        let Synchronizer { store, storage, .. } = self;
        // the observer holds the other reference
        drop(store);
        Rc::try_unwrap(storage).ok().map(RefCell::into_inner)
    }
}

/// Decode stored text into valid tasks, skipping invalid titles
fn hydrate(text: &str) -> Vec<Task> {
    decode_records(text)
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            match Task::from_record(record) {
                Ok(task) => Some(task),
                Err(e) => {
                    tracing::warn!(id, error = %e, "skipping stored task with invalid title");
                    None
                }
            }
        })
        .collect()
}
