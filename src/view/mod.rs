// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Views: a root element, a model and the bindings between them.
//!
//! ```
//! use std::rc::Rc;
//! use epoxy_bind::dom::{DomAdapter, MemoryDom};
//! use epoxy_bind::model::Model;
//! use epoxy_bind::view::View;
//! use epoxy_bind::json;
//!
//! let dom = Rc::new(MemoryDom::new());
//! let root = dom.append(dom.document(), "div");
//! let name = dom.append(root, "span");
//! dom.set_id(name, "name");
//!
//! let model = Model::from_value(json!({"firstName": "Ann"}));
//! let mut view = View::new(dom.clone(), root, model.clone())
//!     .with_binding("#name", "text: firstName");
//! view.bind_view().unwrap();
//!
//! model.set("firstName", json!("Amy")).unwrap();
//! assert_eq!(dom.text(name), "Amy");
//! ```


use std::rc::Rc;

use serde::Deserialize;

use crate::binding::{
    parse, AccessorEnv, Binding, BindingOperator, BindingScope, OperatorCatalog, ResolvedDeclaration,
};
use crate::dom::{DomAdapter, ElementId};
use crate::errors::EpoxyResult;
use crate::model::Model;
use crate::observability::messages::{
    binding::{SelectorSkipped, ViewBound, ViewUnbound},
    StructuredLog,
};

/// Tunables for a view.
///
/// # Example
/// ```yaml
/// options:
///   editable_tags: [input, select, textarea]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Tags whose elements write user edits back into the model.
    pub editable_tags: Vec<String>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            editable_tags: vec!["input".into(), "select".into(), "textarea".into()],
        }
    }
}

impl ViewOptions {
    pub fn is_editable(&self, tag: &str) -> bool {
        self.editable_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Binds a model to the elements under one root.
pub struct View {
    dom: Rc<dyn DomAdapter>,
    root: ElementId,
    model: Model,
    declarations: Vec<(String, String)>,
    operators: OperatorCatalog,
    options: ViewOptions,
    bindings: Vec<Binding>,
}

impl View {
    pub fn new(dom: Rc<dyn DomAdapter>, root: ElementId, model: Model) -> Self {
        Self {
            dom,
            root,
            model,
            declarations: Vec::new(),
            operators: OperatorCatalog::new(),
            options: ViewOptions::default(),
            bindings: Vec::new(),
        }
    }

    /// Add `selector -> declaration` pairs, bound in the order given.
    pub fn with_bindings<I, S, T>(mut self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        for (selector, declaration) in bindings {
            self = self.with_binding(selector, declaration);
        }
        self
    }

    /// Add one declaration. A repeated selector replaces the earlier one.
    pub fn with_binding(mut self, selector: impl Into<String>, declaration: impl Into<String>) -> Self {
        let selector = selector.into();
        let declaration = declaration.into();
        match self.declarations.iter_mut().find(|(s, _)| *s == selector) {
            Some(entry) => entry.1 = declaration,
            None => self.declarations.push((selector, declaration)),
        }
        self
    }

    /// Register a custom operator. It shadows a built-in of the same name.
    pub fn with_operator<O>(mut self, name: &str, operator: O) -> Self
    where
        O: BindingOperator + 'static,
    {
        self.operators.register(name, operator);
        self
    }

    pub fn with_options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }

    /// (Re)bind every declaration.
    ///
    /// Selectors matching nothing are skipped. Every matched declaration is
    /// parsed and resolved before any element is touched, so an error
    /// leaves both the DOM and the model untouched.
    pub fn bind_view(&mut self) -> EpoxyResult<()> {
        self.unbind_view();
        if self.declarations.is_empty() {
            return Ok(());
        }

        let catalog = OperatorCatalog::with_defaults().merged(&self.operators);
        let env = Rc::new(AccessorEnv::for_model(&self.model));

        let mut resolved = Vec::with_capacity(self.declarations.len());
        for (selector, text) in &self.declarations {
            let Some(element) = self.dom.query(self.root, selector) else {
                SelectorSkipped { selector }.log();
                continue;
            };
            let declaration = parse(selector, text)?;
            resolved.push((element, ResolvedDeclaration::resolve(declaration, &catalog, &env)?));
        }

        let mut created = Vec::with_capacity(resolved.len());
        for (element, declaration) in resolved {
            let scope = BindingScope {
                dom: &self.dom,
                env: &env,
                catalog: &catalog,
                editable: self.options.is_editable(&self.dom.tag_name(element)),
            };
            // dropping `created` on error disposes what was built so far
            created.push(Binding::attach(&scope, element, declaration)?);
        }

        ViewBound {
            selector_count: self.declarations.len(),
            binding_count: created.len(),
        }
        .log();
        self.bindings = created;
        Ok(())
    }

    /// Dispose every binding. Safe to repeat.
    pub fn unbind_view(&mut self) {
        if self.bindings.is_empty() {
            return;
        }
        let binding_count = self.bindings.len();
        for mut binding in self.bindings.drain(..) {
            binding.dispose();
        }
        ViewUnbound { binding_count }.log();
    }

    /// Unbind, then detach the root element from the document.
    pub fn remove(&mut self) {
        self.unbind_view();
        self.dom.remove(self.root);
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn dom(&self) -> &Rc<dyn DomAdapter> {
        &self.dom
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn binding(&self, selector: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.selector() == selector)
    }

    pub fn is_bound(&self) -> bool {
        !self.bindings.is_empty()
    }
}

impl Drop for View {
    fn drop(&mut self) {
        self.unbind_view();
    }
}
