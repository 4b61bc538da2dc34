// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Top-level error type shared by models, computed properties and views.

use crate::errors::{ConfigError, ParseError};
use thiserror::Error;

/// Every failure the crate can surface.
///
/// Binding-construction errors (`Parse`, `UnknownOperator`) are returned
/// from `View::bind_view`. Update-path errors (`Computation`, `NoSetter`) are
/// returned from whatever `set` call started the change chain.
#[derive(Error, Debug)]
pub enum EpoxyError {
    /// Malformed declaration or a reference to an unknown attribute.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A declaration names an operator missing from the catalog.
    #[error("invalid binding for \"{selector}\": unknown operator '{operator}'")]
    UnknownOperator { selector: String, operator: String },

    /// A computed property was defined without a getter.
    #[error("computed property '{name}' has no getter defined")]
    NoGetter { name: String },

    /// A write targeted a computed property without a setter.
    #[error("computed property '{name}' has no setter defined")]
    NoSetter { name: String },

    /// Computed properties depend on each other in a loop.
    #[error("cyclic computed dependency detected: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// A user supplied getter or setter failed.
    #[error("computed property '{name}' failed: {source}")]
    Computation {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// A view configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience alias used across the crate.
pub type EpoxyResult<T> = Result<T, EpoxyError>;
