// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Computed properties: attributes derived from other attributes.
//!
//! Every property is evaluated once when bound. The reads its getter makes
//! during that evaluation become its static dependency set; the property then
//! re-evaluates whenever one of those dependencies fires.
//!
//! * **Virtual** properties keep their value to themselves and broadcast
//!   `change:<name>` followed by `change` when it moves. Scalars move when
//!   they differ; a getter returning an array or object always moves.
//! * **Non-virtual** properties write through the attribute store and let
//!   the store announce the change, so nothing is emitted twice.
//!
//! Dependencies between computed properties are checked for cycles when
//! the definitions are bound; a cyclic set is rejected as a whole.

mod definition;
mod graph;
mod property;

#[cfg(test)]
mod tests;

pub use definition::{ComputedDefinition, Getter, Reader, Setter};
pub use property::ComputedProperty;

use serde_json::{Map, Value};

use crate::capture::{change_event, CHANGE_EVENT};
use crate::errors::{EpoxyError, EpoxyResult};
use crate::model::Model;
use crate::observability::messages::{
    computed::{ComputedUnbound, ComputedUpdated},
    validation::CyclicDependencyDetected,
    StructuredLog,
};

/// Computed properties of one model, in definition order.
#[derive(Debug, Default)]
pub struct ComputedEngine {
    properties: Vec<ComputedProperty>,
}

impl ComputedEngine {
    pub fn get(&self, name: &str) -> Option<&ComputedProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut ComputedProperty> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn take_all(&mut self) -> Vec<ComputedProperty> {
        std::mem::take(&mut self.properties)
    }

    /// `(property, dependents)` edges between computed properties of the
    /// owning model.
    fn dependency_graph(&self, model: &Model) -> Vec<(String, Vec<String>)> {
        self.properties
            .iter()
            .map(|property| {
                let dependents = self
                    .properties
                    .iter()
                    .filter(|candidate| {
                        let event = change_event(&property.name);
                        candidate
                            .dependencies()
                            .iter()
                            .any(|d| d.event == event && d.source.same_hub(model.events()))
                    })
                    .map(|candidate| candidate.name.clone())
                    .collect();
                (property.name.clone(), dependents)
            })
            .collect()
    }
}

/// Replace the model's computed properties with `definitions`.
pub(crate) fn bind<I, S>(model: &Model, definitions: I) -> EpoxyResult<()>
where
    I: IntoIterator<Item = (S, ComputedDefinition)>,
    S: Into<String>,
{
    unbind(model);

    for (name, definition) in definitions {
        let name = name.into();
        let property = match ComputedProperty::build(model, &name, &definition) {
            Ok(property) => property,
            Err(e) => {
                unbind(model);
                return Err(e);
            }
        };
        model.computed().borrow_mut().properties.push(property);
    }

    let edges = model.computed().borrow().dependency_graph(model);
    let cycle = graph::find_cycle(&edges);
    if let Some(cycle) = cycle {
        CyclicDependencyDetected { cycle: &cycle }.log();
        unbind(model);
        return Err(EpoxyError::CyclicDependency { cycle });
    }

    let initial: Map<String, Value> = model
        .computed()
        .borrow()
        .properties
        .iter()
        .filter(|p| !p.is_virtual)
        .map(|p| (p.name.clone(), p.value.clone()))
        .collect();
    model.write_store(initial)
}

/// Release every computed property of the model. Safe to repeat.
pub(crate) fn unbind(model: &Model) {
    let released = model.computed().borrow_mut().take_all();
    if !released.is_empty() {
        ComputedUnbound {
            property_count: released.len(),
        }
        .log();
    }
    drop(released);
}

/// Re-evaluate `name` after one of its dependencies fired.
pub(crate) fn update(model: &Model, name: &str) -> EpoxyResult<()> {
    let current = model
        .computed()
        .borrow()
        .get(name)
        .map(|p| (p.getter.clone(), p.is_virtual, p.value.clone()));
    let Some((getter, is_virtual, previous)) = current else {
        return Ok(());
    };

    let value = getter(&Reader::new(model, None)).map_err(|source| EpoxyError::Computation {
        name: name.to_string(),
        source,
    })?;
    if is_same_value(&previous, &value) {
        return Ok(());
    }

    match model.computed().borrow_mut().get_mut(name) {
        Some(property) => property.value = value.clone(),
        None => return Ok(()),
    }
    let message = ComputedUpdated { name, is_virtual };
    message.log();
    // downstream updates triggered below nest under this span
    let _entered = message.span("computed_update").entered();

    if is_virtual {
        model.events().trigger(&change_event(name), &value)?;
        model.events().trigger(CHANGE_EVENT, &Value::Null)
    } else {
        let mut pending = Map::new();
        pending.insert(name.to_string(), value);
        model.write_store(pending)
    }
}

/// Strict comparison: scalars compare by value, while arrays and objects
/// are fresh on every evaluation and always count as changed.
fn is_same_value(previous: &Value, value: &Value) -> bool {
    match (previous, value) {
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
        _ => previous == value,
    }
}

/// Rewrite computed entries of a write into the real attributes their
/// setters map them to.
pub(crate) fn route_write(model: &Model, attributes: Map<String, Value>) -> EpoxyResult<Map<String, Value>> {
    let mut pending = Map::new();
    for (name, value) in attributes {
        let route = model
            .computed()
            .borrow()
            .get(&name)
            .map(|p| p.setter.clone());
        match route {
            None => {
                pending.insert(name, value);
            }
            Some(None) => return Err(EpoxyError::NoSetter { name }),
            Some(Some(setter)) => {
                let mapped = setter(value).map_err(|source| EpoxyError::Computation {
                    name: name.clone(),
                    source,
                })?;
                pending.extend(mapped);
            }
        }
    }
    Ok(pending)
}
