use std::collections::HashSet;

use crate::model::category::Category;
use crate::model::task::{Task, TaskId, ValidationError};
use crate::ops::stats::Statistics;

/// Handle returned by [`TaskStore::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&[Task])>;

/// Authoritative owner of the in-memory task list.
///
/// Every successful mutation notifies all observers synchronously with the
/// full current list. Failed lookups and rejected titles never notify.
#[derive(Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all tasks and observers without notifying anyone
    pub fn reset(&mut self) {
        self.tasks.clear();
        self.observers.clear();
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&[Task]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.tasks);
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// `max + 1`, or the lowest unused id once `max` is `TaskId::MAX`
    fn next_id(&self) -> TaskId {
        match self.tasks.iter().map(Task::id).max() {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .unwrap_or_else(|| lowest_free_id(self.tasks.iter().map(Task::id))),
        }
    }

    /// Append a new task. A category is attached when `category_title` is
    /// not blank.
    pub fn add_task(&mut self, title: &str, category_title: &str) -> Result<Task, ValidationError> {
        let category = if category_title.trim().is_empty() {
            None
        } else {
            Some(Category::new(category_title))
        };
        let task = match Task::new(self.next_id(), title, false, category) {
            Ok(task) => task,
            Err(e) => {
                tracing::error!(error = %e, "failed to add task");
                return Err(e);
            }
        };
        self.tasks.push(task.clone());
        self.notify();
        tracing::info!(id = task.id(), title = task.title(), "task added");
        Ok(task)
    }

    /// Rename a task. `Ok(false)` when no task has this id.
    pub fn update_task(&mut self, id: TaskId, new_title: &str) -> Result<bool, ValidationError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id() == id) else {
            tracing::warn!(id, "task not found");
            return Ok(false);
        };
        if let Err(e) = task.set_title(new_title) {
            tracing::error!(id, error = %e, "failed to update task");
            return Err(e);
        }
        self.notify();
        tracing::info!(id, "task updated");
        Ok(true)
    }

    /// Remove a task. Returns whether anything was removed.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id() != id);
        if self.tasks.len() == before {
            tracing::warn!(id, "task not found");
            return false;
        }
        self.notify();
        tracing::info!(id, "task deleted");
        true
    }

    /// Flip a task's completion flag. Returns false when not found.
    pub fn toggle_task(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id() == id) else {
            tracing::warn!(id, "task not found");
            return false;
        };
        task.toggle();
        let complete = task.is_complete();
        self.notify();
        tracing::info!(id, complete, "task toggled");
        true
    }

    /// Replace the whole collection (startup hydration).
    ///
    /// Ids must stay unique: a task whose id was already seen is moved to
    /// the next free id.
    pub fn load_all(&mut self, tasks: Vec<Task>) {
        let mut max = tasks.iter().map(Task::id).max().unwrap_or(0);
        let mut seen = HashSet::with_capacity(tasks.len());
        let mut loaded = Vec::with_capacity(tasks.len());
        for mut task in tasks {
            if !seen.insert(task.id()) {
                let new = match max.checked_add(1) {
                    Some(next) => {
                        max = next;
                        next
                    }
                    None => lowest_free_id(seen.iter().copied()),
                };
                tracing::warn!(old = task.id(), new, "duplicate task id reassigned");
                task.reassign_id(new);
                seen.insert(new);
            }
            loaded.push(task);
        }
        self.tasks = loaded;
        self.notify();
        tracing::info!(count = self.tasks.len(), "tasks loaded");
    }

    pub fn clear_all(&mut self) {
        self.tasks.clear();
        self.notify();
        tracing::info!("all tasks cleared");
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Copy of the current list
    pub fn get_all(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn get_by_id(&self, id: TaskId) -> Option<Task> {
        self.tasks.iter().find(|t| t.id() == id).cloned()
    }

    pub fn get_completed(&self) -> Vec<Task> {
        self.filtered(|t| t.is_complete())
    }

    pub fn get_pending(&self) -> Vec<Task> {
        self.filtered(|t| !t.is_complete())
    }

    /// Tasks whose category title matches exactly
    pub fn get_by_category(&self, title: &str) -> Vec<Task> {
        self.filtered(|t| t.category().is_some_and(|c| c.title() == title))
    }

    pub fn get_statistics(&self) -> Statistics {
        Statistics::from_tasks(&self.tasks)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn filtered(&self, pred: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.tasks.iter().filter(|t| pred(t)).cloned().collect()
    }
}

/// Smallest id from 1 not in `used`
fn lowest_free_id(used: impl Iterator<Item = TaskId>) -> TaskId {
    let used: HashSet<TaskId> = used.collect();
    (1..=TaskId::MAX).find(|id| !used.contains(id)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::category::HOUSE_COLOR;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Store with a counting observer attached
    fn counted_store() -> (TaskStore, Rc<Cell<usize>>) {
        let mut store = TaskStore::new();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        store.subscribe(move |_| c.set(c.get() + 1));
        (store, count)
    }

    fn ids(tasks: &[Task]) -> Vec<TaskId> {
        tasks.iter().map(Task::id).collect()
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut store = TaskStore::new();
        for i in 0..5 {
            store.add_task(&format!("task {}", i), "").unwrap();
        }
        assert_eq!(ids(&store.get_all()), vec![1, 2, 3, 4, 5]);

        // next id follows the max, not the count
        store.delete_task(2);
        store.delete_task(5);
        let task = store.add_task("later", "").unwrap();
        assert_eq!(task.id(), 5);
    }

    #[test]
    fn test_next_id_after_delete_all_starts_at_one() {
        let mut store = TaskStore::new();
        store.add_task("a", "").unwrap();
        store.delete_task(1);
        assert_eq!(store.add_task("b", "").unwrap().id(), 1);
    }

    #[test]
    fn test_add_invalid_title_leaves_store_unchanged() {
        let (mut store, count) = counted_store();
        store.add_task("keep", "").unwrap();
        assert_eq!(count.get(), 1);

        assert_eq!(store.add_task("   ", "Work"), Err(ValidationError::EmptyTitle));
        let long = "x".repeat(201);
        assert!(matches!(
            store.add_task(&long, ""),
            Err(ValidationError::TitleTooLong { .. })
        ));

        assert_eq!(store.len(), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_blank_category_is_not_attached() {
        let mut store = TaskStore::new();
        let task = store.add_task("Clean", "   ").unwrap();
        assert!(task.category().is_none());
    }

    #[test]
    fn test_update_task() {
        let (mut store, count) = counted_store();
        store.add_task("Old", "").unwrap();

        assert_eq!(store.update_task(1, "New"), Ok(true));
        assert_eq!(store.get_by_id(1).unwrap().title(), "New");
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_update_empty_title_fails_and_keeps_title() {
        let (mut store, count) = counted_store();
        store.add_task("Original", "").unwrap();

        assert_eq!(store.update_task(1, ""), Err(ValidationError::EmptyTitle));
        assert_eq!(store.get_by_id(1).unwrap().title(), "Original");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_update_missing_does_not_notify() {
        let (mut store, count) = counted_store();
        assert_eq!(store.update_task(42, "whatever"), Ok(false));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_delete_task() {
        let (mut store, count) = counted_store();
        store.add_task("a", "").unwrap();
        store.add_task("b", "").unwrap();

        assert!(store.delete_task(1));
        assert!(store.get_by_id(1).is_none());
        assert_eq!(count.get(), 3);

        assert!(!store.delete_task(1));
        assert!(!store.delete_task(99));
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let (mut store, count) = counted_store();
        store.add_task("a", "").unwrap();
        let t0 = store.get_by_id(1).unwrap().updated_at();

        assert!(store.toggle_task(1));
        let after_first = store.get_by_id(1).unwrap();
        assert!(after_first.is_complete());
        assert!(after_first.updated_at() > t0);

        assert!(store.toggle_task(1));
        let after_second = store.get_by_id(1).unwrap();
        assert!(!after_second.is_complete());
        assert!(after_second.updated_at() > after_first.updated_at());

        assert!(!store.toggle_task(7));
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_get_all_is_a_copy() {
        let mut store = TaskStore::new();
        store.add_task("a", "").unwrap();
        let mut copy = store.get_all();
        copy.clear();
        copy.push(Task::new(50, "intruder", false, None).unwrap());
        assert_eq!(ids(&store.get_all()), vec![1]);
    }

    #[test]
    fn test_queries() {
        let mut store = TaskStore::new();
        store.add_task("Report", "Work").unwrap();
        store.add_task("Dishes", "House").unwrap();
        store.add_task("Email", "Work").unwrap();
        store.toggle_task(2);

        assert_eq!(ids(&store.get_completed()), vec![2]);
        assert_eq!(ids(&store.get_pending()), vec![1, 3]);
        assert_eq!(ids(&store.get_by_category("Work")), vec![1, 3]);
        // exact match
        assert!(store.get_by_category("work").is_empty());
        assert!(store.get_by_id(4).is_none());
    }

    #[test]
    fn test_scenario() {
        let mut store = TaskStore::new();

        let milk = store.add_task("Buy milk", "House").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(milk.id(), 1);
        assert_eq!(milk.category().unwrap().color(), HOUSE_COLOR);

        let clean = store.add_task("Clean", "").unwrap();
        assert_eq!(clean.id(), 2);
        assert!(clean.category().is_none());

        assert!(store.toggle_task(1));
        assert!(store.get_by_id(1).unwrap().is_complete());
        assert_eq!(ids(&store.get_completed()), vec![1]);

        assert!(store.delete_task(2));
        assert_eq!(ids(&store.get_all()), vec![1]);
    }

    #[test]
    fn test_observers_receive_full_list() {
        let mut store = TaskStore::new();
        let seen: Rc<RefCell<Vec<Vec<TaskId>>>> = Rc::default();
        let s = Rc::clone(&seen);
        store.subscribe(move |tasks| s.borrow_mut().push(ids(tasks)));

        store.add_task("a", "").unwrap();
        store.add_task("b", "").unwrap();
        store.delete_task(1);
        store.clear_all();

        assert_eq!(
            *seen.borrow(),
            vec![vec![1], vec![1, 2], vec![2], vec![]]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let (mut store, count) = counted_store();
        let other = Rc::new(Cell::new(0));
        let o = Rc::clone(&other);
        let sub = store.subscribe(move |_| o.set(o.get() + 1));

        store.add_task("a", "").unwrap();
        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.add_task("b", "").unwrap();

        assert_eq!(count.get(), 2);
        assert_eq!(other.get(), 1);
    }

    #[test]
    fn test_load_all_replaces_and_notifies() {
        let (mut store, count) = counted_store();
        store.add_task("old", "").unwrap();

        let loaded = vec![
            Task::new(10, "ten", true, None).unwrap(),
            Task::new(4, "four", false, None).unwrap(),
        ];
        store.load_all(loaded);

        assert_eq!(ids(&store.get_all()), vec![10, 4]);
        assert_eq!(count.get(), 2);
        assert_eq!(store.add_task("next", "").unwrap().id(), 11);
    }

    #[test]
    fn test_load_all_reassigns_duplicate_ids() {
        let mut store = TaskStore::new();
        store.load_all(vec![
            Task::new(0, "a", false, None).unwrap(),
            Task::new(0, "b", false, None).unwrap(),
            Task::new(3, "c", false, None).unwrap(),
            Task::new(3, "d", false, None).unwrap(),
        ]);
        assert_eq!(ids(&store.get_all()), vec![0, 4, 3, 5]);
        let titles: Vec<String> = store.get_all().iter().map(|t| t.title().to_string()).collect();
        assert_eq!(titles, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_ids_past_the_maximum_reuse_the_lowest_free_id() {
        let mut store = TaskStore::new();
        store.load_all(vec![
            Task::new(TaskId::MAX, "last", false, None).unwrap(),
            Task::new(1, "one", false, None).unwrap(),
        ]);
        assert_eq!(store.add_task("next", "").unwrap().id(), 2);
        assert_eq!(store.add_task("after", "").unwrap().id(), 3);
        assert_eq!(ids(&store.get_all()), vec![TaskId::MAX, 1, 2, 3]);
    }

    #[test]
    fn test_duplicate_of_the_maximum_id_is_reassigned_without_overflow() {
        let mut store = TaskStore::new();
        store.load_all(vec![
            Task::new(TaskId::MAX, "a", false, None).unwrap(),
            Task::new(TaskId::MAX, "b", false, None).unwrap(),
        ]);
        assert_eq!(ids(&store.get_all()), vec![TaskId::MAX, 1]);
    }

    #[test]
    fn test_clear_all() {
        let (mut store, count) = counted_store();
        store.add_task("a", "").unwrap();
        store.clear_all();
        assert!(store.is_empty());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_reset_drops_observers() {
        let (mut store, count) = counted_store();
        store.add_task("a", "").unwrap();
        store.reset();
        assert!(store.is_empty());

        store.add_task("b", "").unwrap();
        assert_eq!(count.get(), 1);
        assert_eq!(store.get_by_id(1).unwrap().title(), "b");
    }
}
