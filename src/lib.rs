// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod binding;    // declaration parser, compiler, operators, binding engine
pub mod capture;    // dependency collectors
pub mod computed;   // computed property engine
pub mod config;     // view configs + validation
pub mod dom;        // DOM adapter seam + in-memory DOM
pub mod errors;     // error handling
pub mod events;     // named-event hub
pub mod model;      // attribute store + model
pub mod observability;
pub mod view;       // views owning bindings

pub use serde_json::{json, Value};
