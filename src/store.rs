use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::io::persist::{self, FirstRun};
use crate::io::storage::Storage;
use crate::model::action::Action;
use crate::model::config::{Config, DEFAULT_STORAGE_KEY};
use crate::model::state::StoreState;
use crate::ops::reducer::reduce;

/// Where and how a store persists its state
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub key: String,
    pub first_run: FirstRun,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            key: DEFAULT_STORAGE_KEY.to_string(),
            first_run: FirstRun::Seed,
        }
    }
}

impl From<&Config> for StoreOptions {
    fn from(config: &Config) -> Self {
        StoreOptions {
            key: config.storage.key.clone(),
            first_run: if config.seed.sample_data {
                FirstRun::Seed
            } else {
                FirstRun::Empty
            },
        }
    }
}

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreState)>;

/// The session's state container. Holds the current state, runs every
/// mutation through the reducer, tells subscribers, and writes each new
/// state through to storage.
///
/// Navigation (`SetView`) is not written, since its fields are never stored.
/// If hydration could not read the stored record or move it aside, the
/// session stays in memory and nothing is written at all.
///
/// State is replaced wholesale on each dispatch, so an `Arc<StoreState>`
/// obtained from [`Store::state`] is never modified underneath its holder.
pub struct Store<S: Storage> {
    state: Arc<StoreState>,
    storage: S,
    options: StoreOptions,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    saving: bool,
}

impl<S: Storage> Store<S> {
    /// An empty store. Nothing is read from storage until [`Store::hydrate`].
    pub fn new(storage: S, options: StoreOptions) -> Self {
        Store {
            state: Arc::new(StoreState::default()),
            storage,
            options,
            listeners: Vec::new(),
            next_subscription: 0,
            saving: true,
        }
    }

    /// Create a store and hydrate it from storage
    pub fn open(storage: S, options: StoreOptions) -> Self {
        let mut store = Store::new(storage, options);
        store.hydrate();
        store
    }

    /// Load the persisted record (or seed data) and merge it into state.
    /// Seed or recovered data is saved right away; a record read back
    /// intact is not rewritten.
    pub fn hydrate(&mut self) {
        let loaded = persist::load(&self.storage, &self.options.key, self.options.first_run);
        self.saving = loaded.writable;
        self.apply(Action::Load(loaded.snapshot), self.saving && !loaded.stored);
    }

    /// Apply one action: reduce, publish, then save
    pub fn dispatch(&mut self, action: Action) {
        let save = self.saving && action.touches_record();
        self.apply(action, save);
    }

    fn apply(&mut self, action: Action, save: bool) {
        debug!(action = action.kind(), save, "dispatch");
        let next = reduce(StoreState::clone(&self.state), action);
        self.state = Arc::new(next);

        let state: &StoreState = &self.state;
        for (_, listener) in &mut self.listeners {
            listener(state);
        }
        if save {
            persist::save(&self.storage, &self.options.key, &self.state);
        }
    }

    /// False once hydration found a record it could neither read nor back up
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// The current state snapshot
    pub fn state(&self) -> Arc<StoreState> {
        Arc::clone(&self.state)
    }

    /// Call `listener` with the new state after every dispatch
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Call `on_change` with the new value whenever `darkMode` flips. This is
    /// where a front end hooks its theme switch.
    pub fn on_dark_mode(&mut self, mut on_change: impl FnMut(bool) + 'static) -> SubscriptionId {
        let mut last = self.state.dark_mode;
        self.subscribe(move |state| {
            if state.dark_mode != last {
                last = state.dark_mode;
                on_change(last);
            }
        })
    }
}

impl<S: Storage> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("options", &self.options)
            .field("listeners", &self.listeners.len())
            .field("saving", &self.saving)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStorage;
    use crate::model::{NewProject, NewTask, Snapshot, View};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn new_store_starts_empty_without_touching_storage() {
        let storage = MemoryStorage::new();
        let store = Store::new(&storage, StoreOptions::default());
        assert_eq!(*store.state(), StoreState::default());
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn open_seeds_and_saves_on_first_run() {
        let storage = MemoryStorage::new();
        let store = Store::open(&storage, StoreOptions::default());
        assert_eq!(store.state().projects.len(), 3);
        assert_eq!(store.state().tasks.len(), 7);
        assert!(storage.contains("dashboard_data"));
    }

    #[test]
    fn reopening_does_not_rewrite_the_record() {
        let storage = MemoryStorage::new();
        Store::open(&storage, StoreOptions::default());
        assert_eq!(storage.write_count(), 1);
        let reopened = Store::open(&storage, StoreOptions::default());
        assert_eq!(reopened.state().projects.len(), 3);
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn every_dispatch_writes_once() {
        let storage = MemoryStorage::new();
        let mut store = Store::open(&storage, StoreOptions::default());
        let after_open = storage.write_count();

        store.dispatch(Action::ToggleDarkMode);
        store.dispatch(Action::AddProject(NewProject::named("Launch")));
        assert_eq!(storage.write_count(), after_open + 2);
    }

    #[test]
    fn navigation_is_not_written() {
        let storage = MemoryStorage::new();
        let mut store = Store::open(&storage, StoreOptions::default());
        let after_open = storage.write_count();
        let pid = store.state().projects[0].id.clone();

        store.dispatch(Action::SetView {
            view: View::ProjectDetail,
            project_id: Some(pid.clone()),
        });
        assert_eq!(store.state().selected_project_id, Some(pid));
        assert_eq!(storage.write_count(), after_open);
    }

    #[test]
    fn unreadable_record_is_never_overwritten() {
        let storage = MemoryStorage::with_entry("dashboard_data", r#"{"darkMode":true}"#);
        storage.set_fail_reads(true);
        let mut store = Store::open(&storage, StoreOptions::default());
        assert!(!store.is_saving());
        assert_eq!(store.state().projects.len(), 3);

        store.dispatch(Action::AddProject(NewProject::named("Launch")));
        assert_eq!(store.state().projects.len(), 4);
        assert_eq!(storage.write_count(), 0);

        storage.set_fail_reads(false);
        assert_eq!(
            storage.get("dashboard_data").unwrap().as_deref(),
            Some(r#"{"darkMode":true}"#)
        );
    }

    #[test]
    fn old_snapshots_are_not_mutated() {
        let storage = MemoryStorage::new();
        let mut store = Store::new(&storage, StoreOptions::default());
        let before = store.state();
        store.dispatch(Action::AddProject(NewProject::named("Launch")));
        assert!(before.projects.is_empty());
        assert_eq!(store.state().projects.len(), 1);
    }

    #[test]
    fn subscribers_see_each_new_state() {
        let storage = MemoryStorage::new();
        let mut store = Store::new(&storage, StoreOptions::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |s| sink.borrow_mut().push(s.projects.len()));

        store.dispatch(Action::AddProject(NewProject::named("A")));
        store.dispatch(Action::AddProject(NewProject::named("B")));
        assert!(store.unsubscribe(id));
        store.dispatch(Action::AddProject(NewProject::named("C")));

        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn dark_mode_hook_fires_only_on_change() {
        let storage = MemoryStorage::new();
        let mut store = Store::new(&storage, StoreOptions::default());
        let flips = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&flips);
        store.on_dark_mode(move |on| sink.borrow_mut().push(on));

        store.dispatch(Action::ToggleDarkMode);
        store.dispatch(Action::AddProject(NewProject::named("A")));
        store.dispatch(Action::Load(Snapshot {
            dark_mode: Some(true),
            ..Default::default()
        }));
        store.dispatch(Action::ToggleDarkMode);

        assert_eq!(*flips.borrow(), vec![true, false]);
    }

    #[test]
    fn write_failure_does_not_stop_the_session() {
        let storage = MemoryStorage::new();
        let mut store = Store::open(&storage, StoreOptions::default());
        storage.set_fail_writes(true);

        let pid = store.state().projects[0].id.clone();
        store.dispatch(Action::AddTask(NewTask::new(pid, "Offline task")));
        assert_eq!(store.state().tasks.len(), 8);

        storage.set_fail_writes(false);
        store.dispatch(Action::ToggleDarkMode);

        let reopened = Store::open(&storage, StoreOptions::default());
        assert_eq!(reopened.state().tasks.len(), 8);
        assert!(reopened.state().dark_mode);
    }

    #[test]
    fn options_from_config() {
        let mut config = Config::default();
        config.storage.key = "work".into();
        config.seed.sample_data = false;
        let options = StoreOptions::from(&config);
        assert_eq!(options.key, "work");
        assert_eq!(options.first_run, FirstRun::Empty);

        let storage = MemoryStorage::new();
        let store = Store::open(&storage, options);
        assert!(store.state().projects.is_empty());
        assert!(storage.contains("work"));
    }
}
