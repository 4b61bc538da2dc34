// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for computed property events.
//!
//! This module contains message types for logging events related to:
//! * Dependency capture during a property's first evaluation
//! * Re-evaluation after a dependency fired
//! * Releasing computed properties

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A computed property captured its dependencies and subscribed to them.
///
/// # Log Level
/// `debug!` - Per-property lifecycle detail
///
/// # Example
/// ```
/// use epoxy_bind::observability::messages::computed::ComputedBound;
///
/// let events = vec!["change:firstName".to_string(), "change:lastName".to_string()];
/// let msg = ComputedBound {
///     name: "fullName",
///     dependencies: &events,
///     is_virtual: true,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ComputedBound<'a> {
    pub name: &'a str,
    pub dependencies: &'a [String],
    pub is_virtual: bool,
}

impl Display for ComputedBound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Computed property '{}' bound to {} dependencies [{}]",
            self.name,
            self.dependencies.len(),
            self.dependencies.join(", ")
        )
    }
}

impl StructuredLog for ComputedBound<'_> {
    fn log(&self) {
        tracing::debug!(
            property = self.name,
            dependency_count = self.dependencies.len(),
            is_virtual = self.is_virtual,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "computed_bound",
            span_name = name,
            property = self.name,
            dependency_count = self.dependencies.len(),
        )
    }
}

/// A computed property re-evaluated to a new value.
///
/// # Log Level
/// `debug!` - Fires on every effective change
pub struct ComputedUpdated<'a> {
    pub name: &'a str,
    pub is_virtual: bool,
}

impl Display for ComputedUpdated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let target = if self.is_virtual { "broadcast" } else { "written through" };
        write!(f, "Computed property '{}' changed, {}", self.name, target)
    }
}

impl StructuredLog for ComputedUpdated<'_> {
    fn log(&self) {
        tracing::debug!(property = self.name, is_virtual = self.is_virtual, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("computed_update", span_name = name, property = self.name)
    }
}

/// Computed properties released their subscriptions.
///
/// # Log Level
/// `debug!`
pub struct ComputedUnbound {
    pub property_count: usize,
}

impl Display for ComputedUnbound {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Unbound {} computed properties", self.property_count)
    }
}

impl StructuredLog for ComputedUnbound {
    fn log(&self) {
        tracing::debug!(property_count = self.property_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "computed_unbound",
            span_name = name,
            property_count = self.property_count,
        )
    }
}
