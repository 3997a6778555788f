//! Typed event registration with disposer handles.

use crate::ViewPreference;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Change notifications emitted by the page session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    DropdownChanged,
    NotificationsChanged,
    BusyChanged,
    UrlValidityChanged,
    ViewChanged(ViewPreference),
}

type Handler<E> = Rc<dyn Fn(&E)>;

struct Registry<E> {
    next_id: u64,
    handlers: Vec<(u64, Handler<E>)>,
}

/// Single-threaded event emitter. Cloning shares the same handler list.
pub struct EventEmitter<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E> Clone for EventEmitter<E> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<E: 'static> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventEmitter<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Register `handler`. It stays registered until the returned
    /// [`Subscription`] is dropped or disposed.
    pub fn subscribe(&self, handler: impl Fn(&E) + 'static) -> Subscription {
        let id = {
            let mut reg = self.registry.borrow_mut();
            reg.next_id += 1;
            let id = reg.next_id;
            reg.handlers.push((id, Rc::new(handler)));
            id
        };
        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        Subscription {
            disposer: Some(Box::new(move || {
                if let Some(reg) = weak.upgrade() {
                    reg.borrow_mut().handlers.retain(|(h, _)| *h != id);
                }
            })),
        }
    }

    /// Call every registered handler in registration order.
    ///
    /// Handlers run against a snapshot, so they may subscribe or dispose
    /// re-entrantly.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Handler<E>> = self
            .registry
            .borrow()
            .handlers
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in snapshot {
            handler(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

/// Disposer for a registered handler.
#[must_use = "dropping a Subscription unregisters its handler"]
pub struct Subscription {
    disposer: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn dispose(mut self) {
        if let Some(d) = self.disposer.take() {
            d();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(d) = self.disposer.take() {
            d();
        }
    }
}
