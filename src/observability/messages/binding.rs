// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for view binding events.
//!
//! This module contains message types for logging events related to:
//! * Binding and unbinding views
//! * Selectors that matched no element
//! * Operator application and re-application
//! * Two-way writes from the DOM back into the model

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A view finished binding its declarations.
///
/// # Log Level
/// `info!` - Lifecycle event
///
/// # Example
/// ```
/// use epoxy_bind::observability::messages::binding::ViewBound;
///
/// let msg = ViewBound {
///     selector_count: 4,
///     binding_count: 3,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ViewBound {
    pub selector_count: usize,
    pub binding_count: usize,
}

impl Display for ViewBound {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "View bound: {} of {} selectors matched an element",
            self.binding_count, self.selector_count
        )
    }
}

impl StructuredLog for ViewBound {
    fn log(&self) {
        tracing::info!(
            selector_count = self.selector_count,
            binding_count = self.binding_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "view_bound",
            span_name = name,
            selector_count = self.selector_count,
            binding_count = self.binding_count,
        )
    }
}

/// A view released all of its bindings.
///
/// # Log Level
/// `info!` - Lifecycle event
pub struct ViewUnbound {
    pub binding_count: usize,
}

impl Display for ViewUnbound {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "View unbound: {} bindings disposed", self.binding_count)
    }
}

impl StructuredLog for ViewUnbound {
    fn log(&self) {
        tracing::info!(binding_count = self.binding_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("view_unbound", span_name = name, binding_count = self.binding_count)
    }
}

/// A selector matched nothing; its declaration was skipped.
///
/// # Log Level
/// `debug!` - Optional markup is expected, this is not a failure
pub struct SelectorSkipped<'a> {
    pub selector: &'a str,
}

impl Display for SelectorSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Selector '{}' matched no element, binding skipped", self.selector)
    }
}

impl StructuredLog for SelectorSkipped<'_> {
    fn log(&self) {
        tracing::debug!(selector = self.selector, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("selector_skipped", span_name = name, selector = self.selector)
    }
}

/// An operator was applied to its element.
///
/// # Log Level
/// `debug!`
pub struct OperatorApplied<'a> {
    pub selector: &'a str,
    pub operator: &'a str,
    pub dirty: bool,
    pub dependency_count: usize,
}

impl Display for OperatorApplied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Applied '{}' on '{}' ({} dependencies{})",
            self.operator,
            self.selector,
            self.dependency_count,
            if self.dirty { ", dirty" } else { "" }
        )
    }
}

impl StructuredLog for OperatorApplied<'_> {
    fn log(&self) {
        tracing::debug!(
            selector = self.selector,
            operator = self.operator,
            dirty = self.dirty,
            dependency_count = self.dependency_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "operator_applied",
            span_name = name,
            selector = self.selector,
            operator = self.operator,
        )
    }
}

/// A dependency fired and an operator was re-applied.
///
/// # Log Level
/// `debug!`
pub struct OperatorReapplied<'a> {
    pub selector: &'a str,
    pub operator: &'a str,
    pub event: &'a str,
    pub recompiled: bool,
}

impl Display for OperatorReapplied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Re-applied '{}' on '{}' after {}{}",
            self.operator,
            self.selector,
            self.event,
            if self.recompiled { " (recompiled)" } else { "" }
        )
    }
}

impl StructuredLog for OperatorReapplied<'_> {
    fn log(&self) {
        tracing::debug!(
            selector = self.selector,
            operator = self.operator,
            event = self.event,
            recompiled = self.recompiled,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "operator_reapplied",
            span_name = name,
            selector = self.selector,
            operator = self.operator,
            event = self.event,
        )
    }
}

/// An editable element pushed its value back into the model.
///
/// # Log Level
/// `debug!`
pub struct ViewValuePushed<'a> {
    pub selector: &'a str,
    pub attribute: &'a str,
}

impl Display for ViewValuePushed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Element '{}' wrote attribute '{}'", self.selector, self.attribute)
    }
}

impl StructuredLog for ViewValuePushed<'_> {
    fn log(&self) {
        tracing::debug!(selector = self.selector, attribute = self.attribute, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "view_value_pushed",
            span_name = name,
            selector = self.selector,
            attribute = self.attribute,
        )
    }
}
