// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::process;
use std::rc::Rc;

use anyhow::{Context, Result};
use epoxy_bind::config::load_and_validate_view_config;
use epoxy_bind::dom::MemoryDom;
use epoxy_bind::Value;
use tracing_subscriber::EnvFilter;

/// Split a `name=value` argument. The value is read as JSON when it parses,
/// otherwise as a plain string.
fn parse_assignment(arg: &str) -> Result<(String, Value)> {
    let (name, raw) = arg
        .split_once('=')
        .with_context(|| format!("expected name=value, got '{}'", arg))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.trim().to_string(), value))
}

/// Markup of everything mounted under the document root.
fn render(dom: &MemoryDom) -> String {
    dom.children(dom.document())
        .into_iter()
        .map(|element| dom.outer_html(element))
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <view.yaml> [name=value ...]", args[0]);
        eprintln!("Example: {} view.yaml firstName=Amy subscribed=true", args[0]);
        process::exit(1);
    }

    let config_file = &args[1];
    let assignments = args[2..]
        .iter()
        .map(|arg| parse_assignment(arg))
        .collect::<Result<Vec<_>>>()?;

    let config = load_and_validate_view_config(config_file)
        .with_context(|| format!("failed to load {}", config_file))?;
    let dom = Rc::new(MemoryDom::new());
    let mut view = config.build_view(&dom)?;
    view.bind_view()?;

    println!("🔗 Bound {} of {} selectors", view.bindings().len(), config.bindings.len());
    println!("{}", render(&dom));

    for (name, value) in assignments {
        view.model().set(&name, value.clone())?;
        println!("{}", "─".repeat(40));
        println!("✏️  {} = {}", name, value);
        println!("{}", render(&dom));
    }

    view.unbind_view();
    Ok(())
}
