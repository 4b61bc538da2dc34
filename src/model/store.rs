// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{Map, Value};

/// Plain key/value attribute storage.
///
/// The store knows nothing about events; [`crate::model::Model`] wraps it and
/// announces the changes reported by [`AttributeStore::apply`].
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    attributes: Map<String, Value>,
}

impl AttributeStore {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.attributes.keys()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Write every entry, returning only the entries whose value changed.
    pub fn apply(&mut self, pending: Map<String, Value>) -> Vec<(String, Value)> {
        let mut changed = Vec::new();
        for (name, value) in pending {
            if self.attributes.get(&name) == Some(&value) {
                continue;
            }
            self.attributes.insert(name.clone(), value.clone());
            changed.push((name, value));
        }
        changed
    }

    /// Snapshot of all attributes.
    pub fn to_map(&self) -> Map<String, Value> {
        self.attributes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_apply_reports_only_changes() {
        let mut store = AttributeStore::new(map(json!({"a": 1, "b": "x"})));

        let changed = store.apply(map(json!({"a": 1, "b": "y", "c": null})));

        assert_eq!(
            changed,
            vec![("b".to_string(), json!("y")), ("c".to_string(), Value::Null)]
        );
        assert_eq!(store.get("b"), Some(&json!("y")));
        assert_eq!(store.len(), 3);
    }
}
