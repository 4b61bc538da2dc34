// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Live bindings between one element and a model.
//!
//! Building a [`Binding`] applies every operator once with a fresh
//! [`DependencyCollector`]. The collected events decide when the operator
//! is re-applied:
//!
//! * a **clean** operator (its read met no constant) keeps its compiled
//!   accessor and simply re-reads it,
//! * a **dirty** operator recompiles its expression on every fire, since a
//!   constant baked in at compile time can only be re-derived.
//!
//! Editable elements with a readable operator bound to a plain attribute
//! also get a native change listener that writes the element's value back.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::binding::accessor::{AccessorEnv, AccessorKind};
use crate::binding::operators::{BindingOperator, OperatorCatalog};
use crate::binding::parser::BindingDeclaration;
use crate::capture::DependencyCollector;
use crate::dom::{DomAdapter, ElementId, ListenerId};
use crate::errors::{EpoxyError, EpoxyResult};
use crate::events::Subscription;
use crate::observability::messages::{
    binding::{OperatorApplied, OperatorReapplied, ViewValuePushed},
    StructuredLog,
};

/// Lifecycle of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Applied and listening. `dirty` is set if any operator recompiles.
    Compiled { dirty: bool },
    Disposed,
}

/// What a binding is built against.
pub struct BindingScope<'a> {
    pub dom: &'a Rc<dyn DomAdapter>,
    pub env: &'a Rc<AccessorEnv>,
    pub catalog: &'a OperatorCatalog,
    /// Whether the bound element accepts user edits.
    pub editable: bool,
}

/// Pieces shared between a binding and its listeners.
struct Target {
    selector: String,
    element: ElementId,
    declaration: BindingDeclaration,
    env: Rc<AccessorEnv>,
    dom: Weak<dyn DomAdapter>,
}

struct OperatorSlot {
    name: String,
    operator: Rc<dyn BindingOperator>,
    accessor: RefCell<Rc<AccessorKind>>,
    dirty: bool,
    dependencies: Vec<String>,
    recompilations: Cell<usize>,
}

impl OperatorSlot {
    fn reapply(&self, target: &Target, event: &str) -> EpoxyResult<()> {
        let Some(dom) = target.dom.upgrade() else {
            return Ok(());
        };
        let message = OperatorReapplied {
            selector: &target.selector,
            operator: &self.name,
            event,
            recompiled: self.dirty,
        };
        let _entered = message.span("operator_reapply").entered();
        if self.dirty {
            let fresh = target
                .declaration
                .compile_operator(&self.name, &target.env, None)?;
            *self.accessor.borrow_mut() = Rc::new(fresh);
            self.recompilations.set(self.recompilations.get() + 1);
        }

        let accessor = self.accessor.borrow().clone();
        let mut dirty = false;
        let value = accessor.read(None, &mut dirty);
        self.operator.set(dom.as_ref(), target.element, &value);

        message.log();
        Ok(())
    }
}

/// One element wired to the model through its declaration.
pub struct Binding {
    target: Rc<Target>,
    slots: Vec<Rc<OperatorSlot>>,
    subscriptions: Vec<Subscription>,
    listeners: Vec<ListenerId>,
    disposed: bool,
}

/// A declaration whose operators and identifiers have all been resolved.
/// Attaching it is the first point at which the element is touched.
pub struct ResolvedDeclaration {
    declaration: BindingDeclaration,
    operators: Vec<(String, Rc<dyn BindingOperator>)>,
}

impl ResolvedDeclaration {
    /// Check every operator name against `catalog`, then every identifier
    /// against `env`.
    pub fn resolve(
        declaration: BindingDeclaration,
        catalog: &OperatorCatalog,
        env: &AccessorEnv,
    ) -> EpoxyResult<Self> {
        let mut operators = Vec::with_capacity(declaration.operators().len());
        for name in declaration.operator_names() {
            let operator = catalog.get(name).ok_or_else(|| EpoxyError::UnknownOperator {
                selector: declaration.selector().to_string(),
                operator: name.to_string(),
            })?;
            operators.push((name.to_string(), operator));
        }
        declaration.check_identifiers(env)?;
        Ok(Self {
            declaration,
            operators,
        })
    }

    pub fn selector(&self) -> &str {
        self.declaration.selector()
    }
}

impl Binding {
    /// Apply `declaration` to `element` and start listening.
    ///
    /// Every operator name is checked against the catalog, and every
    /// identifier against the environment, before the element is touched.
    pub fn build(
        scope: &BindingScope<'_>,
        element: ElementId,
        declaration: BindingDeclaration,
    ) -> EpoxyResult<Self> {
        let resolved = ResolvedDeclaration::resolve(declaration, scope.catalog, scope.env)?;
        Self::attach(scope, element, resolved)
    }

    /// Apply an already resolved declaration to `element`.
    pub fn attach(
        scope: &BindingScope<'_>,
        element: ElementId,
        resolved: ResolvedDeclaration,
    ) -> EpoxyResult<Self> {
        let ResolvedDeclaration {
            declaration,
            operators,
        } = resolved;
        let mut binding = Binding {
            target: Rc::new(Target {
                selector: declaration.selector().to_string(),
                element,
                declaration,
                env: Rc::clone(scope.env),
                dom: Rc::downgrade(scope.dom),
            }),
            slots: Vec::new(),
            subscriptions: Vec::new(),
            listeners: Vec::new(),
            disposed: false,
        };
        for (name, operator) in operators {
            binding.apply(scope, name, operator)?;
        }
        Ok(binding)
    }

    fn apply(
        &mut self,
        scope: &BindingScope<'_>,
        name: String,
        operator: Rc<dyn BindingOperator>,
    ) -> EpoxyResult<()> {
        let target = Rc::clone(&self.target);
        let collector = DependencyCollector::new();
        let accessor = target
            .declaration
            .compile_operator(&name, &target.env, Some(&collector))?;
        let mut dirty = false;
        let value = accessor.read(Some(&collector), &mut dirty);
        operator.set(scope.dom.as_ref(), target.element, &value);

        if scope.editable && operator.is_readable() {
            if let Some(leaf) = accessor.as_leaf() {
                let leaf = leaf.clone();
                let reader = Rc::clone(&operator);
                let dom = Rc::downgrade(scope.dom);
                let listener_target = Rc::clone(&target);
                let id = scope.dom.add_change_listener(
                    target.element,
                    Rc::new(move || {
                        let Some(dom) = dom.upgrade() else {
                            return Ok(());
                        };
                        let Some(value) = reader.get(dom.as_ref(), listener_target.element) else {
                            return Ok(());
                        };
                        ViewValuePushed {
                            selector: &listener_target.selector,
                            attribute: leaf.attribute(),
                        }
                        .log();
                        leaf.set(value)
                    }),
                );
                self.listeners.push(id);
            }
        }

        let dependencies = collector.into_dependencies();
        OperatorApplied {
            selector: &target.selector,
            operator: &name,
            dirty,
            dependency_count: dependencies.len(),
        }
        .log();

        let slot = Rc::new(OperatorSlot {
            name,
            operator,
            accessor: RefCell::new(Rc::new(accessor)),
            dirty,
            dependencies: dependencies.iter().map(|d| d.event.clone()).collect(),
            recompilations: Cell::new(0),
        });
        for dependency in dependencies {
            let slot = Rc::clone(&slot);
            let target = Rc::clone(&target);
            let subscription = dependency
                .source
                .on(&dependency.event, move |event| slot.reapply(&target, event.name));
            self.subscriptions.push(subscription);
        }
        self.slots.push(slot);
        Ok(())
    }

    /// Release model subscriptions and DOM listeners. Safe to repeat.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.subscriptions.clear();
        let listeners = std::mem::take(&mut self.listeners);
        if let Some(dom) = self.target.dom.upgrade() {
            for id in listeners {
                dom.remove_change_listener(self.target.element, id);
            }
        }
    }

    pub fn selector(&self) -> &str {
        &self.target.selector
    }

    pub fn element(&self) -> ElementId {
        self.target.element
    }

    pub fn declaration(&self) -> &BindingDeclaration {
        &self.target.declaration
    }

    pub fn state(&self) -> BindingState {
        if self.disposed {
            BindingState::Disposed
        } else {
            BindingState::Compiled {
                dirty: self.slots.iter().any(|s| s.dirty),
            }
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn slot(&self, operator: &str) -> Option<&Rc<OperatorSlot>> {
        self.slots.iter().find(|s| s.name == operator)
    }

    /// Whether `operator` recompiles on every fire.
    pub fn is_dirty(&self, operator: &str) -> Option<bool> {
        self.slot(operator).map(|s| s.dirty)
    }

    /// The accessor `operator` currently reads.
    pub fn accessor(&self, operator: &str) -> Option<Rc<AccessorKind>> {
        self.slot(operator).map(|s| s.accessor.borrow().clone())
    }

    /// How often `operator` has been recompiled.
    pub fn recompilations(&self, operator: &str) -> Option<usize> {
        self.slot(operator).map(|s| s.recompilations.get())
    }

    /// Events `operator` re-applies on.
    pub fn dependencies(&self, operator: &str) -> Option<&[String]> {
        self.slot(operator).map(|s| s.dependencies.as_slice())
    }

    /// Live model subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Live DOM change listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("selector", &self.target.selector)
            .field("element", &self.target.element)
            .field("state", &self.state())
            .field("subscriptions", &self.subscriptions.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
