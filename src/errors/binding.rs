// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while parsing or compiling binding declarations.

use thiserror::Error;

/// A binding declaration could not be parsed or compiled.
///
/// Always carries the selector the declaration was written for, so a
/// template author can find the offending markup.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Error parsing bindings for \"{selector}\": {message} (at offset {position})")]
pub struct ParseError {
    /// Selector the declaration belongs to
    pub selector: String,
    /// Byte offset into the declaration text
    pub position: usize,
    /// Human readable reason
    pub message: String,
}

impl ParseError {
    pub fn new(selector: &str, position: usize, message: impl Into<String>) -> Self {
        Self {
            selector: selector.to_string(),
            position,
            message: message.into(),
        }
    }
}
