//! Table/card view preference, persisted across page loads.

use crate::config::PREFERRED_VIEW_KEY;
use crate::error::UiError;
use crate::events::{EventEmitter, PageEvent};
use crate::ViewPreference;
use gloo_storage::{LocalStorage, Storage};
use log::warn;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Raw string key/value storage.
pub trait PreferenceStorage {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> Result<(), UiError>;
}

/// `window.localStorage`, read and written as plain strings so values stay
/// compatible with pages that store `table`/`card` without JSON quoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl PreferenceStorage for BrowserStorage {
    fn read(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), UiError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| UiError::Storage(format!("{:?}", e)))
    }
}

/// In-memory storage; clones share contents, which lets a test "reload" by
/// building a new store over the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl PreferenceStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), UiError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Visual state derived from a preference: which container is shown and
/// which toggle button is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLayout {
    pub table_visible: bool,
    pub card_visible: bool,
    pub table_button_active: bool,
    pub card_button_active: bool,
}

impl From<ViewPreference> for ViewLayout {
    fn from(pref: ViewPreference) -> Self {
        let table = pref == ViewPreference::Table;
        ViewLayout {
            table_visible: table,
            card_visible: !table,
            table_button_active: table,
            card_button_active: !table,
        }
    }
}

impl ViewLayout {
    pub fn container_class(visible: bool) -> &'static str {
        if visible {
            ""
        } else {
            "d-none"
        }
    }

    pub fn button_class(active: bool) -> &'static str {
        if active {
            "btn btn-outline-secondary view-toggle-btn active"
        } else {
            "btn btn-outline-secondary view-toggle-btn"
        }
    }
}

pub struct ViewPreferenceStore<S> {
    storage: S,
    current: Cell<ViewPreference>,
    events: Option<EventEmitter<PageEvent>>,
}

impl<S: PreferenceStorage> ViewPreferenceStore<S> {
    /// Build the store and restore the persisted preference.
    pub fn load(storage: S) -> Self {
        let store = Self {
            storage,
            current: Cell::new(ViewPreference::default()),
            events: None,
        };
        store.get();
        store
    }

    /// Emit [`PageEvent::ViewChanged`] on `events` whenever the view switches.
    pub fn with_events(mut self, events: EventEmitter<PageEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Read the persisted preference and make it current. Absent or
    /// unrecognized values yield `Table`.
    pub fn get(&self) -> ViewPreference {
        let stored = self.storage.read(PREFERRED_VIEW_KEY);
        let pref = ViewPreference::from_stored(stored.as_deref());
        self.current.set(pref);
        pref
    }

    /// Persist and apply `pref`. A failed write is logged; the view still
    /// switches.
    pub fn set(&self, pref: ViewPreference) -> ViewLayout {
        if let Err(e) = self.storage.write(PREFERRED_VIEW_KEY, pref.as_str()) {
            warn!("could not persist view preference: {}", e);
        }
        let changed = self.current.replace(pref) != pref;
        if changed {
            if let Some(events) = &self.events {
                events.emit(&PageEvent::ViewChanged(pref));
            }
        }
        self.layout()
    }

    pub fn current(&self) -> ViewPreference {
        self.current.get()
    }

    pub fn layout(&self) -> ViewLayout {
        self.current().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReadOnlyStorage;

    impl PreferenceStorage for ReadOnlyStorage {
        fn read(&self, _: &str) -> Option<String> {
            None
        }

        fn write(&self, _: &str, _: &str) -> Result<(), UiError> {
            Err(UiError::Storage("quota exceeded".into()))
        }
    }

    #[test]
    fn defaults_to_table_when_absent() {
        let store = ViewPreferenceStore::load(MemoryStorage::default());
        assert_eq!(store.current(), ViewPreference::Table);
        assert!(store.layout().table_visible);
        assert!(!store.layout().card_visible);
    }

    #[test]
    fn card_survives_reload() {
        let storage = MemoryStorage::default();
        let store = ViewPreferenceStore::load(storage.clone());
        let layout = store.set(ViewPreference::Card);
        assert!(layout.card_visible && layout.card_button_active);
        assert!(!layout.table_visible && !layout.table_button_active);

        let reloaded = ViewPreferenceStore::load(storage);
        assert_eq!(reloaded.get(), ViewPreference::Card);
    }

    #[test]
    fn unrecognized_value_is_table() {
        let storage = MemoryStorage::default();
        storage.write(PREFERRED_VIEW_KEY, "grid").unwrap();
        let store = ViewPreferenceStore::load(storage);
        assert_eq!(store.current(), ViewPreference::Table);
    }

    #[test]
    fn failed_write_still_applies() {
        let store = ViewPreferenceStore::load(ReadOnlyStorage);
        let layout = store.set(ViewPreference::Card);
        assert_eq!(store.current(), ViewPreference::Card);
        assert!(layout.card_visible);
    }

    #[test]
    fn switching_view_emits_once() {
        let events = EventEmitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            events.subscribe(move |e: &PageEvent| seen.borrow_mut().push(e.clone()))
        };
        let store = ViewPreferenceStore::load(MemoryStorage::default()).with_events(events);

        store.set(ViewPreference::Card);
        store.set(ViewPreference::Card);
        assert_eq!(*seen.borrow(), vec![PageEvent::ViewChanged(ViewPreference::Card)]);
    }
}
