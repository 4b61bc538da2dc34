// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// Errors that can occur during view configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A binding was declared for an empty selector
    EmptySelector,
    /// A selector has a blank binding declaration
    EmptyDeclaration {
        /// The selector with nothing bound to it
        selector: String,
    },
    /// A binding declaration does not parse
    InvalidDeclaration {
        /// The selector whose declaration is malformed
        selector: String,
        /// Parser explanation
        reason: String,
    },
    /// A declaration references a name that is neither an attribute nor a
    /// computed property
    UnresolvedIdentifier {
        /// The selector whose declaration references the name
        selector: String,
        /// The unknown name
        name: String,
    },
    /// A computed template is malformed
    InvalidComputedTemplate {
        /// The computed property name
        name: String,
        /// Why the template was rejected
        reason: String,
    },
    /// Two fixture elements share the same id
    DuplicateElementId {
        /// The duplicate element id
        id: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptySelector => {
                write!(f, "Binding declared for an empty selector")
            }
            ValidationError::EmptyDeclaration { selector } => {
                write!(f, "Selector '{}' has an empty binding declaration", selector)
            }
            ValidationError::InvalidDeclaration { selector, reason } => {
                write!(f, "Selector '{}' has an invalid declaration: {}", selector, reason)
            }
            ValidationError::UnresolvedIdentifier { selector, name } => {
                write!(f, "Selector '{}' references unknown attribute '{}'", selector, name)
            }
            ValidationError::InvalidComputedTemplate { name, reason } => {
                write!(f, "Computed property '{}' has an invalid template: {}", name, reason)
            }
            ValidationError::DuplicateElementId { id } => {
                write!(f, "Duplicate element id: '{}'", id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a view configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid YAML for a view configuration.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The configuration parsed but failed validation.
    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
