// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! DOM adapter seam.
//!
//! Bindings never touch a concrete document. Everything they need, from
//! element lookup to property writes and native change events, goes
//! through [`DomAdapter`]. [`MemoryDom`] is a self-contained implementation
//! used by the tests and the command line renderer.

mod memory;

pub use memory::MemoryDom;

use std::rc::Rc;

use serde_json::Value;

use crate::errors::EpoxyResult;

/// Opaque handle to an element owned by a [`DomAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// Handle to a registered native change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Callback run when an element reports a native value change.
pub type ChangeListener = Rc<dyn Fn() -> EpoxyResult<()>>;

/// Everything the binding engine needs from a document.
pub trait DomAdapter {
    /// First descendant of `root` matching `selector`, if any.
    fn query(&self, root: ElementId, selector: &str) -> Option<ElementId>;

    /// Lower-case tag name.
    fn tag_name(&self, element: ElementId) -> String;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Set an attribute, or remove it with `None`.
    fn set_attribute(&self, element: ElementId, name: &str, value: Option<&str>);

    /// DOM property such as `checked` or `disabled`. Unset reads as `null`.
    fn property(&self, element: ElementId, name: &str) -> Value;

    fn set_property(&self, element: ElementId, name: &str, value: Value);

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    fn toggle_class(&self, element: ElementId, class: &str, enabled: bool);

    fn style(&self, element: ElementId, name: &str) -> Option<String>;

    fn set_style(&self, element: ElementId, name: &str, value: &str);

    fn html(&self, element: ElementId) -> String;

    fn set_html(&self, element: ElementId, html: &str);

    fn text(&self, element: ElementId) -> String;

    fn set_text(&self, element: ElementId, text: &str);

    fn is_visible(&self, element: ElementId) -> bool;

    fn set_visible(&self, element: ElementId, visible: bool);

    /// Current form value.
    fn value(&self, element: ElementId) -> Value;

    fn set_value(&self, element: ElementId, value: &Value);

    fn add_change_listener(&self, element: ElementId, listener: ChangeListener) -> ListenerId;

    fn remove_change_listener(&self, element: ElementId, listener: ListenerId);

    /// Detach an element (and its subtree) from the document.
    fn remove(&self, element: ElementId);
}
