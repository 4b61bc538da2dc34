// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod binding;
mod config;
mod epoxy;

pub use binding::ParseError;
pub use config::{ConfigError, ValidationError};
pub use epoxy::{EpoxyError, EpoxyResult};
