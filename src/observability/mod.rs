// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the crate. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep log wording in one place per subsystem
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::computed` - Computed property binding and re-evaluation events
//! * `messages::binding` - View binding lifecycle and re-application events
//! * `messages::validation` - Dependency graph and configuration validation
//!
//! # Usage
//!
//! ```rust
//! use epoxy_bind::observability::messages::computed::ComputedUpdated;
//! use epoxy_bind::observability::messages::StructuredLog;
//!
//! let msg = ComputedUpdated {
//!     name: "fullName",
//!     is_virtual: true,
//! };
//!
//! msg.log();
//! ```

pub mod messages;
