// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Binding operators and the catalog they are looked up in.
//!
//! Built-in operators:
//!
//! | Name        | Reads back | Effect                                          |
//! |-------------|------------|-------------------------------------------------|
//! | `attr`      | no         | sets each attribute of an object; `null`/`false` removes it |
//! | `checked`   | yes        | `checked` property                              |
//! | `className` | no         | toggles each class of an object by truthiness   |
//! | `css`       | no         | sets each style of an object                    |
//! | `enabled`   | no         | `disabled` property, inverted                   |
//! | `html`      | no         | inner HTML                                      |
//! | `text`      | no         | text content                                    |
//! | `toggle`    | no         | visibility                                      |
//! | `value`     | yes        | form value                                      |

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::binding::value::{display_text, is_truthy};
use crate::dom::{DomAdapter, ElementId};

/// A named binding behaviour against one element.
///
/// Operators are stateless and shared between bindings.
pub trait BindingOperator {
    /// Push `value` into the element.
    fn set(&self, dom: &dyn DomAdapter, element: ElementId, value: &Value);

    /// Extract the element's current value, for two-way bindings.
    fn get(&self, _dom: &dyn DomAdapter, _element: ElementId) -> Option<Value> {
        None
    }

    /// True when [`BindingOperator::get`] is implemented.
    fn is_readable(&self) -> bool {
        false
    }
}

pub struct AttrOperator;

impl BindingOperator for AttrOperator {
    fn set(&self, dom: &dyn DomAdapter, element: ElementId, value: &Value) {
        let Value::Object(attributes) = value else {
            return;
        };
        for (name, value) in attributes {
            match value {
                Value::Null | Value::Bool(false) => dom.set_attribute(element, name, None),
                other => dom.set_attribute(element, name, Some(&display_text(other))),
            }
        }
    }
}

pub struct CheckedOperator;

impl BindingOperator for CheckedOperator {
    fn set(&self, dom: &dyn DomAdapter, element: ElementId, value: &Value) {
        dom.set_property(element, "checked", Value::Bool(is_truthy(value)));
    }

    fn get(&self, dom: &dyn DomAdapter, element: ElementId) -> Option<Value> {
        Some(Value::Bool(is_truthy(&dom.property(element, "checked"))))
    }

    fn is_readable(&self) -> bool {
        true
    }
}

pub struct ClassNameOperator;

impl BindingOperator for ClassNameOperator {
    fn set(&self, dom: &dyn DomAdapter, element: ElementId, value: &Value) {
        if let Value::Object(classes) = value {
            for (class, enabled) in classes {
                dom.toggle_class(element, class, is_truthy(enabled));
            }
        }
    }
}

pub struct CssOperator;

impl BindingOperator for CssOperator {
    fn set(&self, dom: &dyn DomAdapter, element: ElementId, value: &Value) {
        if let Value::Object(styles) = value {
            for (name, style) in styles {
                dom.set_style(element, name, &display_text(style));
            }
        }
    }
}

pub struct EnabledOperator;

impl BindingOperator for EnabledOperator {
    fn set(&self, dom: &dyn DomAdapter, element: ElementId, value: &Value) {
        dom.set_property(element, "disabled", Value::Bool(!is_truthy(value)));
    }
}

pub struct HtmlOperator;

impl BindingOperator for HtmlOperator {
    fn set(&self, dom: &dyn DomAdapter, element: ElementId, value: &Value) {
        dom.set_html(element, &display_text(value));
    }
}

pub struct TextOperator;

impl BindingOperator for TextOperator {
    fn set(&self, dom: &dyn DomAdapter, element: ElementId, value: &Value) {
        dom.set_text(element, &display_text(value));
    }
}

pub struct ToggleOperator;

impl BindingOperator for ToggleOperator {
    fn set(&self, dom: &dyn DomAdapter, element: ElementId, value: &Value) {
        dom.set_visible(element, is_truthy(value));
    }
}

pub struct ValueOperator;

impl BindingOperator for ValueOperator {
    fn set(&self, dom: &dyn DomAdapter, element: ElementId, value: &Value) {
        dom.set_value(element, value);
    }

    fn get(&self, dom: &dyn DomAdapter, element: ElementId) -> Option<Value> {
        Some(dom.value(element))
    }

    fn is_readable(&self) -> bool {
        true
    }
}

/// Operators by name.
#[derive(Clone, Default)]
pub struct OperatorCatalog {
    operators: BTreeMap<String, Rc<dyn BindingOperator>>,
}

impl OperatorCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The nine built-in operators.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog
            .register("attr", AttrOperator)
            .register("checked", CheckedOperator)
            .register("className", ClassNameOperator)
            .register("css", CssOperator)
            .register("enabled", EnabledOperator)
            .register("html", HtmlOperator)
            .register("text", TextOperator)
            .register("toggle", ToggleOperator)
            .register("value", ValueOperator);
        catalog
    }

    /// Add or replace an operator.
    pub fn register<O>(&mut self, name: &str, operator: O) -> &mut Self
    where
        O: BindingOperator + 'static,
    {
        self.insert(name, Rc::new(operator))
    }

    /// Add or replace an already shared operator.
    pub fn insert(&mut self, name: &str, operator: Rc<dyn BindingOperator>) -> &mut Self {
        self.operators.insert(name.to_string(), operator);
        self
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn BindingOperator>> {
        self.operators.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// This catalog overlaid with `overrides`; entries of `overrides` win.
    pub fn merged(&self, overrides: &OperatorCatalog) -> Self {
        let mut operators = self.operators.clone();
        for (name, operator) in &overrides.operators {
            operators.insert(name.clone(), Rc::clone(operator));
        }
        Self { operators }
    }
}

impl fmt::Debug for OperatorCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.operators.keys()).finish()
    }
}
