// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Named-event publish/subscribe used for change notification.
//!
//! An [`EventHub`] delivers events synchronously, in subscription order.
//! Subscribing returns a [`Subscription`] handle that unsubscribes when it is
//! cancelled or dropped, so owners release their listeners simply by letting
//! go of the handles.
//!
//! # Dispatch rules
//!
//! * Listeners are snapshotted when an event starts dispatching. A listener
//!   added during dispatch is not called for that event.
//! * A listener removed during dispatch is skipped, even if it was part of
//!   the snapshot. Disposed bindings and computed properties never run.
//! * The first listener error stops dispatch and is returned to the caller
//!   of [`EventHub::trigger`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::errors::EpoxyResult;

/// An event as seen by a listener.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Full event name, e.g. `change:firstName`
    pub name: &'a str,
    /// Payload; the new value for `change:<name>`, `Null` for `change`
    pub value: &'a Value,
}

/// Listener callback signature.
pub type EventCallback = Rc<dyn Fn(&Event<'_>) -> EpoxyResult<()>>;

struct Listener {
    id: u64,
    event: String,
    callback: EventCallback,
}

#[derive(Default)]
struct HubInner {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<Listener>>,
}

impl HubInner {
    fn remove(&self, id: u64) {
        self.listeners.borrow_mut().retain(|l| l.id != id);
    }

    fn contains(&self, id: u64) -> bool {
        self.listeners.borrow().iter().any(|l| l.id == id)
    }
}

/// Shared handle to an event source. Cloning shares the same listeners.
#[derive(Clone, Default)]
pub struct EventHub(Rc<HubInner>);

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `callback` to `event`.
    pub fn on<F>(&self, event: &str, callback: F) -> Subscription
    where
        F: Fn(&Event<'_>) -> EpoxyResult<()> + 'static,
    {
        let id = self.0.next_id.get();
        self.0.next_id.set(id + 1);
        self.0.listeners.borrow_mut().push(Listener {
            id,
            event: event.to_string(),
            callback: Rc::new(callback),
        });
        Subscription {
            hub: Rc::downgrade(&self.0),
            id,
            event: event.to_string(),
        }
    }

    /// Deliver `event` to every listener subscribed to it.
    pub fn trigger(&self, event: &str, value: &Value) -> EpoxyResult<()> {
        let snapshot: Vec<(u64, EventCallback)> = self
            .0
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.event == event)
            .map(|l| (l.id, Rc::clone(&l.callback)))
            .collect();

        let payload = Event { name: event, value };
        for (id, callback) in snapshot {
            if !self.0.contains(id) {
                continue;
            }
            callback(&payload)?;
        }
        Ok(())
    }

    /// Total number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.0.listeners.borrow().len()
    }

    /// Number of listeners registered for one event name.
    pub fn listener_count_for(&self, event: &str) -> usize {
        self.0
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.event == event)
            .count()
    }

    /// True when both handles point at the same hub.
    pub fn same_hub(&self, other: &EventHub) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle to one registered listener. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    hub: Weak<HubInner>,
    id: u64,
    event: String,
}

impl Subscription {
    /// Event name this subscription listens to.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// False once cancelled or once the hub is gone.
    pub fn is_active(&self) -> bool {
        self.hub.upgrade().is_some_and(|hub| hub.contains(self.id))
    }

    /// Unsubscribe now.
    pub fn cancel(self) {
        drop(self)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("active", &self.is_active())
            .finish()
    }
}
