// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Evaluates parsed declarations against an [`AccessorEnv`].
//!
//! | Expression        | Compiles to                               |
//! |-------------------|-------------------------------------------|
//! | identifier        | [`AccessorKind::Leaf`]                    |
//! | literal           | [`AccessorKind::Constant`]                |
//! | `{ key: expr }`   | [`AccessorKind::Composite`]               |
//! | `!expr`           | [`AccessorKind::Constant`] of the negated operand |
//!
//! Negation reads its operand while compiling, so the result is a constant
//! and the owning binding becomes dirty.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::binding::accessor::{AccessorEnv, AccessorKind};
use crate::binding::parser::{self, BindingDeclaration, Expr};
use crate::binding::value::is_truthy;
use crate::capture::DependencyCollector;
use crate::errors::ParseError;

impl BindingDeclaration {
    /// Fail on the first identifier the environment does not define.
    pub fn check_identifiers(&self, env: &AccessorEnv) -> Result<(), ParseError> {
        for binding in self.operators() {
            for (name, position) in binding.expr.identifiers() {
                if !env.contains(name) {
                    return Err(unknown_identifier(self.selector(), name, position));
                }
            }
        }
        Ok(())
    }

    /// Compile the expression bound to `operator`.
    pub fn compile_operator(
        &self,
        operator: &str,
        env: &AccessorEnv,
        collector: Option<&DependencyCollector>,
    ) -> Result<AccessorKind, ParseError> {
        let binding = self.operator(operator).ok_or_else(|| {
            ParseError::new(
                self.selector(),
                0,
                format!("no expression bound to operator '{}'", operator),
            )
        })?;
        compile_expr(self.selector(), &binding.expr, env, collector)
    }

    /// Compile every operator, in declaration order.
    pub fn compile_all(
        &self,
        env: &AccessorEnv,
        collector: Option<&DependencyCollector>,
    ) -> Result<Vec<(String, AccessorKind)>, ParseError> {
        self.operators()
            .iter()
            .map(|binding| {
                compile_expr(self.selector(), &binding.expr, env, collector)
                    .map(|accessor| (binding.operator.clone(), accessor))
            })
            .collect()
    }
}

/// Parse and compile `text` in one step.
pub fn compile(
    selector: &str,
    text: &str,
    env: &AccessorEnv,
) -> Result<Vec<(String, AccessorKind)>, ParseError> {
    let declaration = parser::parse(selector, text)?;
    declaration.check_identifiers(env)?;
    declaration.compile_all(env, None)
}

fn compile_expr(
    selector: &str,
    expr: &Expr,
    env: &AccessorEnv,
    collector: Option<&DependencyCollector>,
) -> Result<AccessorKind, ParseError> {
    match expr {
        Expr::Ident { name, position } => env
            .get(name)
            .map(|accessor| AccessorKind::Leaf(accessor.clone()))
            .ok_or_else(|| unknown_identifier(selector, name, *position)),
        Expr::Literal(value) => Ok(AccessorKind::Constant(value.clone())),
        Expr::Object(entries) => {
            let mut compiled = BTreeMap::new();
            for (key, nested) in entries {
                compiled.insert(key.clone(), compile_expr(selector, nested, env, collector)?);
            }
            Ok(AccessorKind::Composite(compiled))
        }
        Expr::Not(operand) => {
            let operand = compile_expr(selector, operand, env, collector)?;
            let mut ignored = false;
            let value = operand.read(collector, &mut ignored);
            Ok(AccessorKind::Constant(Value::Bool(!is_truthy(&value))))
        }
    }
}

fn unknown_identifier(selector: &str, name: &str, position: usize) -> ParseError {
    ParseError::new(selector, position, format!("'{}' is not defined", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use serde_json::json;

    fn env_for(model: &Model) -> AccessorEnv {
        AccessorEnv::for_model(model)
    }

    #[test]
    fn test_identifiers_compile_to_leaves() {
        let model = Model::from_value(json!({"firstName": "Ann"}));
        let compiled = compile("#name", "text: firstName", &env_for(&model)).unwrap();

        assert_eq!(compiled.len(), 1);
        assert_eq!(compiled[0].0, "text");
        assert_eq!(compiled[0].1.as_leaf().unwrap().attribute(), "firstName");
    }

    #[test]
    fn test_object_literals_compile_to_composites() {
        let model = Model::from_value(json!({"done": true}));
        let compiled = compile("li", "className: { done: done, fixed: 'yes' }", &env_for(&model)).unwrap();

        let mut dirty = false;
        assert_eq!(
            compiled[0].1.read(None, &mut dirty),
            json!({"done": true, "fixed": "yes"})
        );
        assert!(dirty);
    }

    #[test]
    fn test_negation_reads_through_collector() {
        let model = Model::from_value(json!({"count": 0}));
        let declaration = parser::parse("p", "toggle: !count").unwrap();
        let collector = DependencyCollector::new();

        let accessor = declaration
            .compile_operator("toggle", &env_for(&model), Some(&collector))
            .unwrap();

        assert!(matches!(accessor, AccessorKind::Constant(Value::Bool(true))));
        assert_eq!(collector.events(), vec!["change:count"]);
    }

    #[test]
    fn test_unknown_identifier_is_a_parse_error() {
        let model = Model::from_value(json!({"firstName": "Ann"}));
        let err = compile("#name", "text: nickname", &env_for(&model)).unwrap_err();

        assert_eq!(err.selector, "#name");
        assert_eq!(err.position, 6);
        assert_eq!(err.message, "'nickname' is not defined");
    }

    #[test]
    fn test_check_identifiers_walks_nested_expressions() {
        let model = Model::from_value(json!({"a": 1}));
        let declaration = parser::parse("p", "css: { color: a, width: !missing }").unwrap();

        let err = declaration.check_identifiers(&env_for(&model)).unwrap_err();
        assert!(err.message.contains("missing"));
    }
}
