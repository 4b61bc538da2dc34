// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements the `Display` trait to provide consistent,
//! human-readable output, and [`StructuredLog`] to emit it through `tracing`
//! at its designated level with structured fields attached.
//!
//! # Organization
//!
//! * `computed` - Computed property lifecycle and updates
//! * `binding` - View and binding lifecycle
//! * `validation` - Cycle detection and configuration validation
//!
//! # Usage Pattern
//!
//! ```rust
//! use epoxy_bind::observability::messages::binding::ViewBound;
//! use epoxy_bind::observability::messages::StructuredLog;
//!
//! let msg = ViewBound {
//!     selector_count: 3,
//!     binding_count: 2,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod binding;
pub mod computed;
pub mod validation;

/// Emits a message through `tracing` with its structured fields.
pub trait StructuredLog {
    /// Log the message at its designated level.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
