// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Declarative bindings.
//!
//! A declaration such as `text: fullName, className: { done: isDone }` is
//! parsed once into an expression tree ([`parser`]), compiled against an
//! environment of attribute accessors ([`compiler`], [`accessor`]) and
//! applied through named operators ([`operators`]) by a live [`Binding`].

pub mod accessor;
pub mod compiler;
pub mod engine;
pub mod operators;
pub mod parser;
pub mod value;

pub use accessor::{Accessor, AccessorEnv, AccessorKind};
pub use compiler::compile;
pub use engine::{Binding, BindingScope, BindingState, ResolvedDeclaration};
pub use operators::{BindingOperator, OperatorCatalog};
pub use parser::{parse, BindingDeclaration, Expr, OperatorBinding};
