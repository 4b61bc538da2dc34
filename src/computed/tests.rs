// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::{json, Map, Value};

use crate::computed::ComputedDefinition;
use crate::errors::EpoxyError;
use crate::events::EventHub;
use crate::model::Model;

fn attrs(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn full_name() -> ComputedDefinition {
    ComputedDefinition::getter(|r| {
        Ok(json!(format!("{} {}", r.get_str("firstName"), r.get_str("lastName"))))
    })
}

fn record_events(model: &Model, events: &[&str]) -> (Rc<RefCell<Vec<String>>>, Vec<crate::events::Subscription>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let subs = events
        .iter()
        .map(|event| {
            let s = seen.clone();
            model.on(event, move |e| {
                s.borrow_mut().push(format!("{}={}", e.name, e.value));
                Ok(())
            })
        })
        .collect();
    (seen, subs)
}

#[test]
fn test_virtual_full_name_broadcasts_without_storing() {
    let model = Model::with_computed(
        attrs(json!({"firstName": "Ann", "lastName": "Lee"})),
        [("fullName", full_name())],
    )
    .unwrap();
    let (seen, _subs) = record_events(&model, &["change:fullName"]);

    model.set("firstName", json!("Amy")).unwrap();

    assert_eq!(*seen.borrow(), vec!["change:fullName=\"Amy Lee\""]);
    assert_eq!(model.get("fullName"), json!("Amy Lee"));
    assert!(!model.has_stored("fullName"));
    assert!(!model.attributes().contains_key("fullName"));
}

#[test]
fn test_virtual_update_emits_attribute_event_then_change() {
    let model = Model::with_computed(
        attrs(json!({"firstName": "Ann", "lastName": "Lee"})),
        [("fullName", full_name())],
    )
    .unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let _sub = model.on("change", move |_| {
        s.borrow_mut().push("change");
        Ok(())
    });

    model.set("lastName", json!("Ray")).unwrap();

    // one for lastName itself, one for the virtual fullName
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_dependencies_are_captured_once() {
    let model = Model::with_computed(
        attrs(json!({"firstName": "Ann", "lastName": "Lee", "age": 30})),
        [("fullName", full_name())],
    )
    .unwrap();

    assert_eq!(
        model.computed_dependencies("fullName").unwrap(),
        vec!["change:firstName", "change:lastName"]
    );
}

#[test]
fn test_exactly_one_evaluation_per_dependency_change() {
    let evaluations = Rc::new(Cell::new(0));
    let e = evaluations.clone();
    let model = Model::with_computed(
        attrs(json!({"a": 1, "b": 2, "unrelated": 0})),
        [(
            "sum",
            ComputedDefinition::getter(move |r| {
                e.set(e.get() + 1);
                let a = r.get("a").as_i64().unwrap_or(0);
                let b = r.get("b").as_i64().unwrap_or(0);
                Ok(json!(a + b))
            }),
        )],
    )
    .unwrap();
    assert_eq!(evaluations.get(), 1);

    model.set("a", json!(5)).unwrap();
    assert_eq!(evaluations.get(), 2);

    model.set("unrelated", json!(9)).unwrap();
    assert_eq!(evaluations.get(), 2);
    assert_eq!(model.get("sum"), json!(7));
}

#[test]
fn test_virtual_collection_broadcasts_on_every_evaluation() {
    let model = Model::with_computed(
        attrs(json!({"a": 1, "b": 2})),
        [(
            "pair",
            ComputedDefinition::getter(|r| Ok(json!([r.get("a"), r.get("b").is_number()]))),
        )],
    )
    .unwrap();
    let (seen, _subs) = record_events(&model, &["change:pair"]);

    model.set("b", json!(3)).unwrap();

    assert_eq!(*seen.borrow(), vec!["change:pair=[1,true]"]);
}

#[test]
fn test_non_virtual_writes_through_store() {
    let model = Model::with_computed(
        attrs(json!({"price": 10, "qty": 2})),
        [(
            "total",
            ComputedDefinition::new().get(|r| {
                Ok(json!(r.get("price").as_i64().unwrap_or(0) * r.get("qty").as_i64().unwrap_or(0)))
            }),
        )],
    )
    .unwrap();
    assert_eq!(model.attributes().get("total"), Some(&json!(20)));

    let (seen, _subs) = record_events(&model, &["change:total"]);
    model.set("qty", json!(3)).unwrap();

    assert_eq!(*seen.borrow(), vec!["change:total=30"]);
    assert_eq!(model.attributes().get("total"), Some(&json!(30)));
}

#[test]
fn test_unchanged_value_produces_no_notification() {
    let model = Model::with_computed(
        attrs(json!({"count": 1})),
        [(
            "isPositive",
            ComputedDefinition::new().get(|r| Ok(json!(r.get("count").as_i64().unwrap_or(0) > 0))),
        )],
    )
    .unwrap();
    let (seen, _subs) = record_events(&model, &["change:isPositive"]);

    model.set("count", json!(2)).unwrap();

    assert!(seen.borrow().is_empty());
}

#[test]
fn test_setter_maps_onto_real_attributes() {
    let definition = full_name().set(|value| {
        let text = value.as_str().unwrap_or_default().to_string();
        let (first, last) = text.split_once(' ').unwrap_or((text.as_str(), ""));
        Ok(attrs(json!({"firstName": first, "lastName": last})))
    });
    let model = Model::with_computed(
        attrs(json!({"firstName": "Ann", "lastName": "Lee"})),
        [("fullName", definition)],
    )
    .unwrap();

    model.set("fullName", json!("Bob Cole")).unwrap();

    assert_eq!(model.get("firstName"), json!("Bob"));
    assert_eq!(model.get("lastName"), json!("Cole"));
    assert_eq!(model.get("fullName"), json!("Bob Cole"));
    assert!(!model.has_stored("fullName"));
}

#[test]
fn test_write_without_setter_fails() {
    let model = Model::with_computed(
        attrs(json!({"firstName": "Ann", "lastName": "Lee"})),
        [("fullName", full_name())],
    )
    .unwrap();

    let result = model.set("fullName", json!("x"));

    assert!(matches!(result, Err(EpoxyError::NoSetter { ref name }) if name == "fullName"));
    assert_eq!(model.get("firstName"), json!("Ann"));
}

#[test]
fn test_definition_without_getter_fails() {
    let model = Model::from_value(json!({}));
    let result = model.bind_computed([("broken", ComputedDefinition::new())]);
    assert!(matches!(result, Err(EpoxyError::NoGetter { ref name }) if name == "broken"));
    assert!(!model.is_computed("broken"));
}

#[test]
fn test_getter_errors_propagate_to_setter_caller() {
    let model = Model::with_computed(
        attrs(json!({"n": 1})),
        [(
            "checked",
            ComputedDefinition::getter(|r| {
                let n = r.get("n").as_i64().unwrap_or(0);
                anyhow::ensure!(n < 10, "n out of range: {}", n);
                Ok(json!(n))
            }),
        )],
    )
    .unwrap();

    let result = model.set("n", json!(11));

    assert!(matches!(result, Err(EpoxyError::Computation { ref name, .. }) if name == "checked"));
}

#[test]
fn test_chained_computed_properties_update_depth_first() {
    let model = Model::with_computed(
        attrs(json!({"price": 10})),
        [
            (
                "tax",
                ComputedDefinition::getter(|r| Ok(json!(r.get("price").as_i64().unwrap_or(0) / 10))),
            ),
            (
                "gross",
                ComputedDefinition::getter(|r| {
                    Ok(json!(r.get("price").as_i64().unwrap_or(0) + r.get("tax").as_i64().unwrap_or(0)))
                }),
            ),
        ],
    )
    .unwrap();
    assert_eq!(model.get("gross"), json!(11));

    model.set("price", json!(20)).unwrap();

    assert_eq!(model.get("tax"), json!(2));
    assert_eq!(model.get("gross"), json!(22));
}

#[test]
fn test_cycle_is_rejected_at_bind_time() {
    let model = Model::from_value(json!({}));
    let result = model.bind_computed([
        ("a", ComputedDefinition::getter(|r| Ok(r.get("b")))),
        ("b", ComputedDefinition::getter(|r| Ok(r.get("a")))),
    ]);

    match result {
        Err(EpoxyError::CyclicDependency { cycle }) => {
            assert_eq!(cycle.first(), cycle.last());
            assert!(cycle.contains(&"a".to_string()));
            assert!(cycle.contains(&"b".to_string()));
        }
        other => panic!("expected a cycle, got {:?}", other),
    }
    assert!(!model.is_computed("a"));
    assert_eq!(model.events().listener_count(), 0);
}

#[test]
fn test_explicit_events_on_another_source() {
    let cart = EventHub::new();
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    let model = Model::with_computed(
        attrs(json!({})),
        [(
            "stamp",
            ComputedDefinition::getter(move |_| {
                h.set(h.get() + 1);
                Ok(json!(h.get()))
            })
            .listen_to(&cart, "reset"),
        )],
    )
    .unwrap();

    cart.trigger("reset", &Value::Null).unwrap();

    assert_eq!(hits.get(), 2);
    assert_eq!(model.get("stamp"), json!(2));
}

#[test]
fn test_reads_of_other_models_are_discovered() {
    let settings = Model::from_value(json!({"currency": "EUR"}));
    let other = settings.clone();
    let model = Model::with_computed(
        attrs(json!({"amount": 5})),
        [(
            "label",
            ComputedDefinition::getter(move |r| {
                Ok(json!(format!("{} {}", r.get("amount"), r.get_from(&other, "currency").as_str().unwrap_or(""))))
            }),
        )],
    )
    .unwrap();

    settings.set("currency", json!("USD")).unwrap();

    assert_eq!(model.get("label"), json!("5 USD"));
}

#[test]
fn test_unbind_releases_subscriptions_and_is_idempotent() {
    let model = Model::with_computed(
        attrs(json!({"firstName": "Ann", "lastName": "Lee"})),
        [("fullName", full_name())],
    )
    .unwrap();
    assert_eq!(model.events().listener_count(), 2);

    model.unbind_computed();
    model.unbind_computed();

    assert_eq!(model.events().listener_count(), 0);
    assert!(!model.is_computed("fullName"));
    assert_eq!(model.get("fullName"), Value::Null);
}

#[test]
fn test_rebinding_replaces_previous_properties() {
    let model = Model::with_computed(
        attrs(json!({"firstName": "Ann", "lastName": "Lee"})),
        [("fullName", full_name())],
    )
    .unwrap();

    model
        .bind_computed([(
            "initials",
            ComputedDefinition::getter(|r| {
                let first = r.get_str("firstName").chars().next().unwrap_or(' ');
                let last = r.get_str("lastName").chars().next().unwrap_or(' ');
                Ok(json!(format!("{}{}", first, last)))
            }),
        )])
        .unwrap();

    assert!(!model.is_computed("fullName"));
    assert_eq!(model.get("initials"), json!("AL"));
    assert_eq!(model.events().listener_count(), 2);
}
