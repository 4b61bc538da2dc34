// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod template;
mod validation;

#[cfg(test)]
mod integration_tests;

pub use loader::{
    load_and_validate_view_config, load_view_config, ComputedConfig, ElementConfig, ViewConfig,
};
pub use template::Template;
pub use validation::validate_view_config;
