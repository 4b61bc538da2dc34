// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! View configuration validation.
//!
//! A configuration is checked in three passes, each accumulating errors:
//!
//! 1. **Computed templates** parse
//! 2. **Bindings** have a selector and a declaration that parses, and every
//!    identifier resolves to an attribute or computed property
//! 3. **Markup** uses each element id at most once
//!
//! Operator names are not checked here: custom operators are registered on
//! the view in code, so only binding can tell whether a name is known.
//!
//! # Examples
//!
//! ```rust
//! use epoxy_bind::config::{validate_view_config, ViewConfig};
//! use epoxy_bind::errors::ValidationError;
//!
//! let mut config = ViewConfig::default();
//! config.bindings.insert("#name".to_string(), "text: nickname".to_string());
//!
//! let errors = validate_view_config(&config).unwrap_err();
//! assert_eq!(
//!     errors,
//!     vec![ValidationError::UnresolvedIdentifier {
//!         selector: "#name".to_string(),
//!         name: "nickname".to_string(),
//!     }]
//! );
//! ```

use std::collections::HashSet;

use crate::binding::parse;
use crate::config::template::Template;
use crate::config::{ElementConfig, ViewConfig};
use crate::errors::ValidationError;

/// Validate a view configuration, reporting every problem found.
pub fn validate_view_config(config: &ViewConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(template_errors) = validate_computed_templates(config) {
        errors.extend(template_errors);
    }

    if let Err(binding_errors) = validate_bindings(config) {
        errors.extend(binding_errors);
    }

    if let Err(duplicate_errors) = validate_unique_element_ids(config) {
        errors.extend(duplicate_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_computed_templates(config: &ViewConfig) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = config
        .computed
        .iter()
        .filter_map(|(name, computed)| {
            Template::parse(&computed.template)
                .err()
                .map(|reason| ValidationError::InvalidComputedTemplate {
                    name: name.clone(),
                    reason,
                })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check selectors and declarations. Identifiers must name a configured
/// attribute or computed property.
fn validate_bindings(config: &ViewConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let known: HashSet<&str> = config
        .attributes
        .keys()
        .map(String::as_str)
        .chain(config.computed.keys().map(String::as_str))
        .collect();

    for (selector, declaration) in &config.bindings {
        if selector.trim().is_empty() {
            errors.push(ValidationError::EmptySelector);
            continue;
        }
        if declaration.trim().is_empty() {
            errors.push(ValidationError::EmptyDeclaration {
                selector: selector.clone(),
            });
            continue;
        }

        let parsed = match parse(selector, declaration) {
            Ok(parsed) => parsed,
            Err(e) => {
                errors.push(ValidationError::InvalidDeclaration {
                    selector: selector.clone(),
                    reason: format!("{} (at offset {})", e.message, e.position),
                });
                continue;
            }
        };

        let mut reported = HashSet::new();
        for binding in parsed.operators() {
            for (name, _) in binding.expr.identifiers() {
                if !known.contains(name) && reported.insert(name) {
                    errors.push(ValidationError::UnresolvedIdentifier {
                        selector: selector.clone(),
                        name: name.to_string(),
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_element_ids(config: &ViewConfig) -> Result<(), Vec<ValidationError>> {
    fn visit<'a>(
        elements: &'a [ElementConfig],
        seen: &mut HashSet<&'a str>,
        errors: &mut Vec<ValidationError>,
    ) {
        for element in elements {
            if let Some(id) = element.id.as_deref() {
                if !seen.insert(id) {
                    errors.push(ValidationError::DuplicateElementId { id: id.to_string() });
                }
            }
            visit(&element.children, seen, errors);
        }
    }

    let mut seen = HashSet::new();
    let mut errors = Vec::new();
    visit(&config.elements, &mut seen, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
