// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-memory document.
//!
//! Supports simple selectors: `tag`, `#id`, `.class` and compounds of them
//! (`input.name`), optionally chained as descendants (`form .name`).

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::Value;

use crate::binding::value::display_text;
use crate::dom::{ChangeListener, DomAdapter, ElementId, ListenerId};
use crate::errors::EpoxyResult;

const DOCUMENT_TAG: &str = "#document";

struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    properties: BTreeMap<String, Value>,
    styles: BTreeMap<String, String>,
    html: String,
    text: String,
    value: String,
    visible: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    listeners: Vec<(ListenerId, ChangeListener)>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            properties: BTreeMap::new(),
            styles: BTreeMap::new(),
            html: String::new(),
            text: String::new(),
            value: String::new(),
            visible: true,
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

/// One compound selector part, e.g. `input#name.wide`.
#[derive(Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(part: &str) -> Self {
        let mut compound = Compound::default();
        let mut kind = ' ';
        let mut current = String::new();
        let flush = |kind: char, current: &mut String, compound: &mut Compound| {
            if current.is_empty() {
                return;
            }
            let token = std::mem::take(current);
            match kind {
                '#' => compound.id = Some(token),
                '.' => compound.classes.push(token),
                _ => compound.tag = Some(token.to_ascii_lowercase()),
            }
        };
        for c in part.chars() {
            if c == '#' || c == '.' {
                flush(kind, &mut current, &mut compound);
                kind = c;
            } else {
                current.push(c);
            }
        }
        flush(kind, &mut current, &mut compound);
        compound
    }

    fn matches(&self, node: &Node) -> bool {
        if self.tag.as_deref().is_some_and(|tag| tag != "*" && tag != node.tag) {
            return false;
        }
        if self.id.is_some() && self.id != node.id {
            return false;
        }
        self.classes.iter().all(|c| node.classes.contains(c))
    }
}

/// A small, single-threaded document tree.
pub struct MemoryDom {
    nodes: RefCell<Vec<Node>>,
    next_listener: Cell<u64>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Empty document holding only its root node.
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![Node::new(DOCUMENT_TAG)]),
            next_listener: Cell::new(0),
        }
    }

    /// The document root.
    pub fn document(&self) -> ElementId {
        ElementId(0)
    }

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> ElementId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node::new(tag));
        ElementId(nodes.len() - 1)
    }

    /// Create an element and append it to `parent`.
    pub fn append(&self, parent: ElementId, tag: &str) -> ElementId {
        let child = self.create_element(tag);
        self.append_child(parent, child);
        child
    }

    pub fn append_child(&self, parent: ElementId, child: ElementId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(previous) = nodes[child.0].parent.take() {
            nodes[previous.0].children.retain(|c| *c != child);
        }
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
    }

    pub fn set_id(&self, element: ElementId, id: &str) {
        self.nodes.borrow_mut()[element.0].id = Some(id.to_string());
    }

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.borrow()[element.0].parent
    }

    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.nodes.borrow()[element.0].children.clone()
    }

    /// Simulate the user editing a form field: set the value, then fire
    /// the native change event.
    pub fn type_into(&self, element: ElementId, value: &str) -> EpoxyResult<()> {
        self.set_value(element, &Value::String(value.to_string()));
        self.dispatch_change(element)
    }

    /// Fire the native change event on `element`.
    pub fn dispatch_change(&self, element: ElementId) -> EpoxyResult<()> {
        let snapshot: Vec<(ListenerId, ChangeListener)> = self.nodes.borrow()[element.0]
            .listeners
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect();
        for (id, listener) in snapshot {
            let registered = self.nodes.borrow()[element.0]
                .listeners
                .iter()
                .any(|(known, _)| *known == id);
            if registered {
                listener()?;
            }
        }
        Ok(())
    }

    /// Native listeners registered on one element.
    pub fn listener_count(&self, element: ElementId) -> usize {
        self.nodes.borrow()[element.0].listeners.len()
    }

    /// Native listeners registered anywhere in the document.
    pub fn total_listener_count(&self) -> usize {
        self.nodes.borrow().iter().map(|n| n.listeners.len()).sum()
    }

    /// Render `element` and its subtree as markup-like text.
    pub fn outer_html(&self, element: ElementId) -> String {
        let mut out = String::new();
        self.render(element, 0, &mut out);
        out
    }

    fn render(&self, element: ElementId, depth: usize, out: &mut String) {
        let (open, children, inner) = {
            let nodes = self.nodes.borrow();
            let node = &nodes[element.0];
            let mut open = format!("{}<{}", "  ".repeat(depth), node.tag);
            if let Some(id) = &node.id {
                let _ = write!(open, " id=\"{}\"", id);
            }
            if !node.classes.is_empty() {
                let _ = write!(open, " class=\"{}\"", node.classes.join(" "));
            }
            for (name, value) in &node.attributes {
                let _ = write!(open, " {}=\"{}\"", name, value);
            }
            if !node.styles.is_empty() {
                let styles: Vec<String> = node
                    .styles
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                let _ = write!(open, " style=\"{}\"", styles.join("; "));
            }
            for (name, value) in &node.properties {
                let _ = write!(open, " [{}={}]", name, value);
            }
            if !node.value.is_empty() {
                let _ = write!(open, " value=\"{}\"", node.value);
            }
            if !node.visible {
                open.push_str(" hidden");
            }
            open.push('>');
            let inner = if node.html.is_empty() { node.text.clone() } else { node.html.clone() };
            (open, node.children.clone(), inner)
        };

        out.push_str(&open);
        if children.is_empty() {
            out.push_str(&inner);
        } else {
            out.push('\n');
            for child in children {
                self.render(child, depth + 1, out);
            }
            out.push_str(&"  ".repeat(depth));
        }
        let tag = self.tag_name(element);
        let _ = writeln!(out, "</{}>", tag);
    }

    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let nodes = self.nodes.borrow();
        let mut found = Vec::new();
        let mut stack: Vec<ElementId> = nodes[root.0].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            found.push(next);
            stack.extend(nodes[next.0].children.iter().rev().copied());
        }
        found
    }

    fn matches_path(&self, element: ElementId, root: ElementId, path: &[Compound]) -> bool {
        let nodes = self.nodes.borrow();
        let Some((last, ancestors)) = path.split_last() else {
            return false;
        };
        if !last.matches(&nodes[element.0]) {
            return false;
        }
        let mut remaining = ancestors.iter().rev().peekable();
        let mut cursor = nodes[element.0].parent;
        while let Some(wanted) = remaining.peek() {
            match cursor {
                Some(ancestor) if ancestor != root => {
                    if wanted.matches(&nodes[ancestor.0]) {
                        remaining.next();
                    }
                    cursor = nodes[ancestor.0].parent;
                }
                _ => return false,
            }
        }
        true
    }

    fn strip_tags(html: &str) -> String {
        let mut text = String::with_capacity(html.len());
        let mut in_tag = false;
        for c in html.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }
        text
    }
}

impl DomAdapter for MemoryDom {
    fn query(&self, root: ElementId, selector: &str) -> Option<ElementId> {
        let path: Vec<Compound> = selector.split_whitespace().map(Compound::parse).collect();
        if path.is_empty() {
            return None;
        }
        self.descendants(root)
            .into_iter()
            .find(|candidate| self.matches_path(*candidate, root, &path))
    }

    fn tag_name(&self, element: ElementId) -> String {
        self.nodes.borrow()[element.0].tag.clone()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.nodes.borrow()[element.0].attributes.get(name).cloned()
    }

    fn set_attribute(&self, element: ElementId, name: &str, value: Option<&str>) {
        let mut nodes = self.nodes.borrow_mut();
        let attributes = &mut nodes[element.0].attributes;
        match value {
            Some(value) => {
                attributes.insert(name.to_string(), value.to_string());
            }
            None => {
                attributes.remove(name);
            }
        }
    }

    fn property(&self, element: ElementId, name: &str) -> Value {
        self.nodes.borrow()[element.0]
            .properties
            .get(name)
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn set_property(&self, element: ElementId, name: &str, value: Value) {
        self.nodes.borrow_mut()[element.0]
            .properties
            .insert(name.to_string(), value);
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.nodes.borrow()[element.0].classes.iter().any(|c| c == class)
    }

    fn toggle_class(&self, element: ElementId, class: &str, enabled: bool) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[element.0].classes;
        let present = classes.iter().any(|c| c == class);
        if enabled && !present {
            classes.push(class.to_string());
        } else if !enabled && present {
            classes.retain(|c| c != class);
        }
    }

    fn style(&self, element: ElementId, name: &str) -> Option<String> {
        self.nodes.borrow()[element.0].styles.get(name).cloned()
    }

    fn set_style(&self, element: ElementId, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let styles = &mut nodes[element.0].styles;
        if value.is_empty() {
            styles.remove(name);
        } else {
            styles.insert(name.to_string(), value.to_string());
        }
    }

    fn html(&self, element: ElementId) -> String {
        self.nodes.borrow()[element.0].html.clone()
    }

    fn set_html(&self, element: ElementId, html: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let node = &mut nodes[element.0];
        node.html = html.to_string();
        node.text = Self::strip_tags(html);
    }

    fn text(&self, element: ElementId) -> String {
        self.nodes.borrow()[element.0].text.clone()
    }

    fn set_text(&self, element: ElementId, text: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let node = &mut nodes[element.0];
        node.text = text.to_string();
        node.html = text
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
    }

    fn is_visible(&self, element: ElementId) -> bool {
        self.nodes.borrow()[element.0].visible
    }

    fn set_visible(&self, element: ElementId, visible: bool) {
        self.nodes.borrow_mut()[element.0].visible = visible;
    }

    fn value(&self, element: ElementId) -> Value {
        Value::String(self.nodes.borrow()[element.0].value.clone())
    }

    fn set_value(&self, element: ElementId, value: &Value) {
        self.nodes.borrow_mut()[element.0].value = display_text(value);
    }

    fn add_change_listener(&self, element: ElementId, listener: ChangeListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.nodes.borrow_mut()[element.0].listeners.push((id, listener));
        id
    }

    fn remove_change_listener(&self, element: ElementId, listener: ListenerId) {
        self.nodes.borrow_mut()[element.0]
            .listeners
            .retain(|(id, _)| *id != listener);
    }

    fn remove(&self, element: ElementId) {
        let subtree: Vec<ElementId> = std::iter::once(element)
            .chain(self.descendants(element))
            .collect();
        let released: Vec<(ListenerId, ChangeListener)> = {
            let mut nodes = self.nodes.borrow_mut();
            if let Some(parent) = nodes[element.0].parent.take() {
                nodes[parent.0].children.retain(|c| *c != element);
            }
            subtree
                .iter()
                .flat_map(|id| std::mem::take(&mut nodes[id.0].listeners))
                .collect()
        };
        drop(released);
    }
}
