// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::capture::{Dependency, DependencyCollector};
use crate::events::EventHub;
use crate::model::Model;

/// Derives a value from the attributes visible through a [`Reader`].
pub type Getter = Rc<dyn Fn(&Reader<'_>) -> anyhow::Result<Value>>;

/// Maps an incoming value onto real attributes.
pub type Setter = Rc<dyn Fn(Value) -> anyhow::Result<Map<String, Value>>>;

/// Read access handed to getters.
///
/// During a property's first evaluation the reader carries a collector and
/// every read is recorded as a dependency. Afterwards it reads plainly.
pub struct Reader<'a> {
    model: &'a Model,
    collector: Option<&'a DependencyCollector>,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(model: &'a Model, collector: Option<&'a DependencyCollector>) -> Self {
        Self { model, collector }
    }

    /// Read an attribute of the owning model.
    pub fn get(&self, name: &str) -> Value {
        self.model.read(name, self.collector)
    }

    /// Read an attribute as display text. `null` reads as an empty string.
    pub fn get_str(&self, name: &str) -> String {
        match self.get(name) {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Read an attribute of another model, recording it on that model.
    pub fn get_from(&self, other: &Model, name: &str) -> Value {
        other.read(name, self.collector)
    }

    pub fn model(&self) -> &Model {
        self.model
    }

    /// True while dependencies are being captured.
    pub fn is_capturing(&self) -> bool {
        self.collector.is_some()
    }
}

/// How one computed property is derived.
///
/// A bare getter ([`ComputedDefinition::getter`]) is read-only and
/// virtual. The builder form defaults to a non-virtual property whose
/// value is written through to the attribute store.
///
/// ```
/// use epoxy_bind::computed::ComputedDefinition;
/// use epoxy_bind::{json, Value};
///
/// let full_name = ComputedDefinition::new()
///     .get(|r| Ok(json!(format!("{} {}", r.get_str("firstName"), r.get_str("lastName")))))
///     .set(|value| {
///         let text = value.as_str().unwrap_or_default().to_string();
///         let (first, last) = text.split_once(' ').unwrap_or((text.as_str(), ""));
///         let mut attrs = serde_json::Map::new();
///         attrs.insert("firstName".into(), json!(first));
///         attrs.insert("lastName".into(), json!(last));
///         Ok(attrs)
///     });
/// # let _ = full_name;
/// ```
#[derive(Clone, Default)]
pub struct ComputedDefinition {
    pub(crate) getter: Option<Getter>,
    pub(crate) setter: Option<Setter>,
    pub(crate) is_virtual: bool,
    pub(crate) events: Vec<Dependency>,
}

impl ComputedDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only virtual property from a bare getter.
    pub fn getter<F>(getter: F) -> Self
    where
        F: Fn(&Reader<'_>) -> anyhow::Result<Value> + 'static,
    {
        Self::new().get(getter).as_virtual(true)
    }

    pub fn get<F>(mut self, getter: F) -> Self
    where
        F: Fn(&Reader<'_>) -> anyhow::Result<Value> + 'static,
    {
        self.getter = Some(Rc::new(getter));
        self
    }

    pub fn set<F>(mut self, setter: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Map<String, Value>> + 'static,
    {
        self.setter = Some(Rc::new(setter));
        self
    }

    /// Virtual properties are broadcast but never stored.
    pub fn as_virtual(mut self, is_virtual: bool) -> Self {
        self.is_virtual = is_virtual;
        self
    }

    /// Declare a dependency that reads cannot reveal, e.g. a collection event.
    pub fn listen_to(mut self, source: &EventHub, event: &str) -> Self {
        self.events.push(Dependency {
            source: source.clone(),
            event: event.to_string(),
        });
        self
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }
}

impl fmt::Debug for ComputedDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedDefinition")
            .field("has_getter", &self.getter.is_some())
            .field("has_setter", &self.setter.is_some())
            .field("is_virtual", &self.is_virtual)
            .field("events", &self.events.iter().map(|d| &d.event).collect::<Vec<_>>())
            .finish()
    }
}
