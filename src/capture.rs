// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency capture for capturing evaluations.
//!
//! A [`DependencyCollector`] is handed, as `Option<&DependencyCollector>`, to
//! every read that should be observed. Reads made with a collector record
//! the event that announces a change of the value they read; reads made
//! with `None` are plain reads. Because the collector travels with the
//! call instead of living in a shared slot, two captures can never observe
//! each other.

use std::cell::RefCell;

use crate::events::EventHub;

/// Prefix of per-attribute change events.
pub const CHANGE_EVENT: &str = "change";

/// Event name announcing a change of `attribute`.
pub fn change_event(attribute: &str) -> String {
    format!("{}:{}", CHANGE_EVENT, attribute)
}

/// One recorded dependency: an event on a source hub.
#[derive(Debug, Clone)]
pub struct Dependency {
    pub source: EventHub,
    pub event: String,
}

/// Accumulates dependencies, deduplicated, in first-seen order.
#[derive(Debug, Default)]
pub struct DependencyCollector {
    entries: RefCell<Vec<Dependency>>,
}

impl DependencyCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event` on `source`. Repeats are ignored.
    pub fn record(&self, source: &EventHub, event: &str) {
        let mut entries = self.entries.borrow_mut();
        let known = entries
            .iter()
            .any(|d| d.event == event && d.source.same_hub(source));
        if !known {
            entries.push(Dependency {
                source: source.clone(),
                event: event.to_string(),
            });
        }
    }

    /// Record a read of `attribute` on `source`.
    pub fn record_read(&self, source: &EventHub, attribute: &str) {
        self.record(source, &change_event(attribute));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Event names recorded so far, in order.
    pub fn events(&self) -> Vec<String> {
        self.entries.borrow().iter().map(|d| d.event.clone()).collect()
    }

    /// Consume the collector, yielding its dependencies.
    pub fn into_dependencies(self) -> Vec<Dependency> {
        self.entries.into_inner()
    }
}
