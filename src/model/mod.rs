// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Models: an attribute store, a change-event hub and computed properties.
//!
//! [`Model`] is a cheap, clonable handle. Reads and writes go through the
//! model so computed properties can intercept them:
//!
//! * reading a computed property returns its cached value,
//! * writing a computed property runs its setter and writes the real
//!   attributes the setter returns instead.
//!
//! ```
//! use epoxy_bind::computed::ComputedDefinition;
//! use epoxy_bind::model::Model;
//! use epoxy_bind::json;
//!
//! let model = Model::from_value(json!({"firstName": "Ann", "lastName": "Lee"}));
//! model
//!     .bind_computed([(
//!         "fullName",
//!         ComputedDefinition::getter(|r| {
//!             Ok(json!(format!("{} {}", r.get_str("firstName"), r.get_str("lastName"))))
//!         }),
//!     )])
//!     .unwrap();
//!
//! model.set("firstName", json!("Amy")).unwrap();
//! assert_eq!(model.get("fullName"), json!("Amy Lee"));
//! ```

mod store;

pub use store::AttributeStore;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::{Map, Value};

use crate::capture::{change_event, DependencyCollector, CHANGE_EVENT};
use crate::computed::{self, ComputedDefinition, ComputedEngine};
use crate::errors::EpoxyResult;
use crate::events::{Event, EventHub, Subscription};

struct ModelInner {
    store: RefCell<AttributeStore>,
    events: EventHub,
    computed: RefCell<ComputedEngine>,
}

/// Shared handle to a model.
#[derive(Clone)]
pub struct Model(Rc<ModelInner>);

/// Non-owning handle held by listeners so they never keep a model alive.
#[derive(Clone)]
pub struct WeakModel(Weak<ModelInner>);

impl WeakModel {
    pub fn upgrade(&self) -> Option<Model> {
        self.0.upgrade().map(Model)
    }
}

impl Model {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self(Rc::new(ModelInner {
            store: RefCell::new(AttributeStore::new(attributes)),
            events: EventHub::new(),
            computed: RefCell::new(ComputedEngine::default()),
        }))
    }

    /// Build from a JSON object. Anything else yields an empty model.
    pub fn from_value(attributes: Value) -> Self {
        match attributes {
            Value::Object(map) => Self::new(map),
            _ => Self::new(Map::new()),
        }
    }

    /// Build a model and bind its computed properties in one go.
    pub fn with_computed<I, S>(attributes: Map<String, Value>, definitions: I) -> EpoxyResult<Self>
    where
        I: IntoIterator<Item = (S, ComputedDefinition)>,
        S: Into<String>,
    {
        let model = Self::new(attributes);
        model.bind_computed(definitions)?;
        Ok(model)
    }

    pub fn downgrade(&self) -> WeakModel {
        WeakModel(Rc::downgrade(&self.0))
    }

    pub fn events(&self) -> &EventHub {
        &self.0.events
    }

    /// Subscribe to one of this model's events.
    pub fn on<F>(&self, event: &str, callback: F) -> Subscription
    where
        F: Fn(&Event<'_>) -> EpoxyResult<()> + 'static,
    {
        self.0.events.on(event, callback)
    }

    pub(crate) fn computed(&self) -> &RefCell<ComputedEngine> {
        &self.0.computed
    }

    /// Plain read. Absent attributes read as `null`.
    pub fn get(&self, name: &str) -> Value {
        self.read(name, None)
    }

    /// Read `name`, recording `change:<name>` into `collector` if given.
    pub fn read(&self, name: &str, collector: Option<&DependencyCollector>) -> Value {
        if let Some(collector) = collector {
            collector.record_read(&self.0.events, name);
        }
        if let Some(property) = self.0.computed.borrow().get(name) {
            return property.value().clone();
        }
        self.0
            .store
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Write one attribute (or computed property).
    pub fn set(&self, name: &str, value: Value) -> EpoxyResult<()> {
        let mut attributes = Map::new();
        attributes.insert(name.to_string(), value);
        self.set_many(attributes)
    }

    /// Write several attributes at once. Computed names are routed through
    /// their setters first; change events fire after every value is stored.
    pub fn set_many(&self, attributes: Map<String, Value>) -> EpoxyResult<()> {
        let pending = computed::route_write(self, attributes)?;
        self.write_store(pending)
    }

    /// Store `pending` and announce what changed: `change:<name>` per
    /// changed attribute, then a single `change`.
    pub(crate) fn write_store(&self, pending: Map<String, Value>) -> EpoxyResult<()> {
        let changed = self.0.store.borrow_mut().apply(pending);
        for (name, value) in &changed {
            self.0.events.trigger(&change_event(name), value)?;
        }
        if !changed.is_empty() {
            self.0.events.trigger(CHANGE_EVENT, &Value::Null)?;
        }
        Ok(())
    }

    /// (Re)bind computed properties, releasing any previous ones.
    pub fn bind_computed<I, S>(&self, definitions: I) -> EpoxyResult<()>
    where
        I: IntoIterator<Item = (S, ComputedDefinition)>,
        S: Into<String>,
    {
        computed::bind(self, definitions)
    }

    /// Release all computed properties. Safe to call repeatedly.
    pub fn unbind_computed(&self) {
        computed::unbind(self)
    }

    pub fn is_computed(&self, name: &str) -> bool {
        self.0.computed.borrow().contains(name)
    }

    /// Captured dependency events of a computed property.
    pub fn computed_dependencies(&self, name: &str) -> Option<Vec<String>> {
        self.0
            .computed
            .borrow()
            .get(name)
            .map(|p| p.dependency_events())
    }

    /// True if the attribute store holds `name`.
    pub fn has_stored(&self, name: &str) -> bool {
        self.0.store.borrow().contains(name)
    }

    /// Snapshot of the attribute store. Virtual properties never appear.
    pub fn attributes(&self) -> Map<String, Value> {
        self.0.store.borrow().to_map()
    }

    /// Every attribute name known to the model: stored keys, then computed
    /// names not already stored.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.0.store.borrow().keys().cloned().collect();
        for name in self.0.computed.borrow().names() {
            if !keys.iter().any(|k| k == name) {
                keys.push(name.to_string());
            }
        }
        keys
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("attributes", &self.0.store.borrow())
            .field("computed", &self.0.computed.borrow())
            .finish()
    }
}
