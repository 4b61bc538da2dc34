// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use serde_json::Value;

use crate::capture::{Dependency, DependencyCollector};
use crate::computed::definition::{ComputedDefinition, Getter, Reader, Setter};
use crate::errors::{EpoxyError, EpoxyResult};
use crate::events::Subscription;
use crate::model::Model;
use crate::observability::messages::{computed::ComputedBound, StructuredLog};

/// A live computed property owned by one model.
///
/// Its dependency set is captured once, while [`ComputedProperty::build`]
/// runs the getter, and never re-discovered.
pub struct ComputedProperty {
    pub(crate) name: String,
    pub(crate) getter: Getter,
    pub(crate) setter: Option<Setter>,
    pub(crate) is_virtual: bool,
    pub(crate) value: Value,
    dependencies: Vec<Dependency>,
    _subscriptions: Vec<Subscription>,
}

impl ComputedProperty {
    /// Evaluate the getter once, capture its dependencies and subscribe to them.
    ///
    /// The initial value is cached but not written anywhere; the engine
    /// writes non-virtual values once the whole graph has been validated.
    pub(crate) fn build(
        model: &Model,
        name: &str,
        definition: &ComputedDefinition,
    ) -> EpoxyResult<Self> {
        let getter = definition
            .getter
            .clone()
            .ok_or_else(|| EpoxyError::NoGetter {
                name: name.to_string(),
            })?;

        let collector = DependencyCollector::new();
        let value = getter(&Reader::new(model, Some(&collector))).map_err(|source| {
            EpoxyError::Computation {
                name: name.to_string(),
                source,
            }
        })?;
        for explicit in &definition.events {
            collector.record(&explicit.source, &explicit.event);
        }
        let dependencies = collector.into_dependencies();

        let subscriptions = dependencies
            .iter()
            .map(|dependency| {
                let model = model.downgrade();
                let property = name.to_string();
                dependency.source.on(&dependency.event, move |_| match model.upgrade() {
                    Some(model) => super::update(&model, &property),
                    None => Ok(()),
                })
            })
            .collect();

        let events: Vec<String> = dependencies.iter().map(|d| d.event.clone()).collect();
        ComputedBound {
            name,
            dependencies: &events,
            is_virtual: definition.is_virtual,
        }
        .log();

        Ok(Self {
            name: name.to_string(),
            getter,
            setter: definition.setter.clone(),
            is_virtual: definition.is_virtual,
            value,
            dependencies,
            _subscriptions: subscriptions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    /// Captured dependencies, in first-read order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Captured dependency event names, in first-read order.
    pub fn dependency_events(&self) -> Vec<String> {
        self.dependencies.iter().map(|d| d.event.clone()).collect()
    }
}

impl fmt::Debug for ComputedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedProperty")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("is_virtual", &self.is_virtual)
            .field("dependencies", &self.dependency_events())
            .finish()
    }
}
