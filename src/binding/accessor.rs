// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Accessors: the values a compiled declaration resolves to.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::capture::DependencyCollector;
use crate::errors::EpoxyResult;
use crate::model::{Model, WeakModel};

/// Reads and writes one attribute of one model.
///
/// Holds the model weakly; once the model is gone reads yield `null` and
/// writes are ignored.
#[derive(Clone)]
pub struct Accessor {
    attribute: String,
    model: WeakModel,
}

impl Accessor {
    pub fn new(model: &Model, attribute: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
            model: model.downgrade(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Read the attribute, recording `change:<attribute>` into `collector`.
    pub fn get(&self, collector: Option<&DependencyCollector>) -> Value {
        match self.model.upgrade() {
            Some(model) => model.read(&self.attribute, collector),
            None => Value::Null,
        }
    }

    /// Write the attribute. An object value is written as a
    /// multi-attribute set instead.
    pub fn set(&self, value: Value) -> EpoxyResult<()> {
        let Some(model) = self.model.upgrade() else {
            return Ok(());
        };
        match value {
            Value::Object(attributes) => model.set_many(attributes),
            other => model.set(&self.attribute, other),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Accessor").field(&self.attribute).finish()
    }
}

/// Compiled right-hand side of one operator.
#[derive(Debug, Clone)]
pub enum AccessorKind {
    /// Live accessor bound to one attribute.
    Leaf(Accessor),
    /// Object literal of nested accessors.
    Composite(BTreeMap<String, AccessorKind>),
    /// Value fixed at compile time. Reading one marks the binding dirty.
    Constant(Value),
}

impl AccessorKind {
    /// Resolve to a value. Constants set `dirty`.
    pub fn read(&self, collector: Option<&DependencyCollector>, dirty: &mut bool) -> Value {
        match self {
            AccessorKind::Leaf(accessor) => accessor.get(collector),
            AccessorKind::Composite(entries) => {
                let mut resolved = Map::new();
                for (key, nested) in entries {
                    resolved.insert(key.clone(), nested.read(collector, dirty));
                }
                Value::Object(resolved)
            }
            AccessorKind::Constant(value) => {
                *dirty = true;
                value.clone()
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, AccessorKind::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&Accessor> {
        match self {
            AccessorKind::Leaf(accessor) => Some(accessor),
            _ => None,
        }
    }
}

/// Names visible to a declaration, each bound to an accessor.
#[derive(Debug, Clone, Default)]
pub struct AccessorEnv {
    accessors: BTreeMap<String, Accessor>,
}

impl AccessorEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// One accessor per attribute the model knows: stored keys and
    /// computed names.
    pub fn for_model(model: &Model) -> Self {
        let accessors = model
            .keys()
            .into_iter()
            .map(|name| {
                let accessor = Accessor::new(model, &name);
                (name, accessor)
            })
            .collect();
        Self { accessors }
    }

    pub fn insert(&mut self, accessor: Accessor) {
        self.accessors.insert(accessor.attribute.clone(), accessor);
    }

    pub fn get(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.accessors.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessor_reads_records_and_writes() {
        let model = Model::from_value(json!({"firstName": "Ann"}));
        let accessor = Accessor::new(&model, "firstName");
        let collector = DependencyCollector::new();

        assert_eq!(accessor.get(Some(&collector)), json!("Ann"));
        assert_eq!(collector.events(), vec!["change:firstName"]);

        accessor.set(json!("Amy")).unwrap();
        assert_eq!(model.get("firstName"), json!("Amy"));
    }

    #[test]
    fn test_object_write_sets_many() {
        let model = Model::from_value(json!({"a": 1, "b": 2}));
        let accessor = Accessor::new(&model, "a");

        accessor.set(json!({"a": 10, "b": 20})).unwrap();

        assert_eq!(model.get("a"), json!(10));
        assert_eq!(model.get("b"), json!(20));
    }

    #[test]
    fn test_accessor_outliving_model_is_inert() {
        let model = Model::from_value(json!({"a": 1}));
        let accessor = Accessor::new(&model, "a");
        drop(model);

        assert_eq!(accessor.get(None), Value::Null);
        assert!(accessor.set(json!(2)).is_ok());
    }

    #[test]
    fn test_read_marks_constants_dirty() {
        let model = Model::from_value(json!({"active": true}));
        let mut entries = BTreeMap::new();
        entries.insert("on".to_string(), AccessorKind::Leaf(Accessor::new(&model, "active")));
        let composite = AccessorKind::Composite(entries.clone());

        let mut dirty = false;
        assert_eq!(composite.read(None, &mut dirty), json!({"on": true}));
        assert!(!dirty);

        entries.insert("fixed".to_string(), AccessorKind::Constant(json!(false)));
        let mixed = AccessorKind::Composite(entries);
        assert_eq!(mixed.read(None, &mut dirty), json!({"fixed": false, "on": true}));
        assert!(dirty);
    }

    #[test]
    fn test_env_covers_stored_and_computed_names() {
        let model = Model::from_value(json!({"firstName": "Ann"}));
        model
            .bind_computed([(
                "shout",
                crate::computed::ComputedDefinition::getter(|r| {
                    Ok(json!(r.get_str("firstName").to_uppercase()))
                }),
            )])
            .unwrap();

        let env = AccessorEnv::for_model(&model);

        assert_eq!(env.names().collect::<Vec<_>>(), vec!["firstName", "shout"]);
        assert_eq!(env.get("shout").unwrap().get(None), json!("ANN"));
    }
}
