// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::Path;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::computed::ComputedDefinition;
use crate::config::template::Template;
use crate::dom::{DomAdapter, ElementId, MemoryDom};
use crate::errors::{ConfigError, EpoxyError, EpoxyResult, ValidationError};
use crate::model::Model;
use crate::observability::messages::{validation::ConfigValidationFailed, StructuredLog};
use crate::view::{View, ViewOptions};

/// A self-contained view: markup, model attributes, computed properties
/// and the bindings between them.
///
/// # Fields
/// * `options` - View tunables (optional, defaults to the standard editable tags)
/// * `attributes` - Initial model attributes
/// * `computed` - Computed properties derived from `{name}` templates, bound in file order
/// * `elements` - Markup mounted under the document root
/// * `bindings` - Selector to declaration map, bound in file order
///
/// # Example
/// ```yaml
/// options:
///   editable_tags: [input, select, textarea]
/// attributes:
///   firstName: Ann
///   lastName: Lee
/// computed:
///   fullName:
///     template: "{firstName} {lastName}"
/// elements:
///   - tag: div
///     id: app
///     children:
///       - { tag: span, id: name }
///       - { tag: input, classes: [first] }
/// bindings:
///   "#name": "text: fullName"
///   ".first": "value: firstName"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub options: ViewOptions,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub computed: IndexMap<String, ComputedConfig>,
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
    #[serde(default)]
    pub bindings: IndexMap<String, String>,
}

/// A computed property whose getter interpolates other attributes.
///
/// # Fields
/// * `template` - Text with `{attribute}` placeholders
/// * `virtual` - Broadcast only, never stored (optional, defaults to true)
#[derive(Debug, Clone, Deserialize)]
pub struct ComputedConfig {
    pub template: String,
    #[serde(default = "default_virtual", rename = "virtual")]
    pub is_virtual: bool,
}

fn default_virtual() -> bool {
    true
}

impl ComputedConfig {
    /// Compile the template into a definition.
    pub fn definition(&self) -> Result<ComputedDefinition, String> {
        let template = Rc::new(Template::parse(&self.template)?);
        Ok(ComputedDefinition::new()
            .get(move |reader| Ok(Value::String(template.render(|name| reader.get(name)))))
            .as_virtual(self.is_virtual))
    }
}

/// One element of the fixture markup.
///
/// # Fields
/// * `tag` - Element tag name
/// * `id` - Element id (optional)
/// * `classes` - Class names (optional)
/// * `text` - Initial text content (optional)
/// * `value` - Initial form value (optional)
/// * `children` - Nested elements (optional)
#[derive(Debug, Clone, Deserialize)]
pub struct ElementConfig {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub children: Vec<ElementConfig>,
}

impl ElementConfig {
    /// Create this element and its children under `parent`.
    pub fn mount(&self, dom: &MemoryDom, parent: ElementId) -> ElementId {
        let element = dom.append(parent, &self.tag);
        if let Some(id) = &self.id {
            dom.set_id(element, id);
        }
        for class in &self.classes {
            dom.toggle_class(element, class, true);
        }
        if let Some(text) = &self.text {
            dom.set_text(element, text);
        }
        if let Some(value) = &self.value {
            dom.set_value(element, &Value::String(value.clone()));
        }
        for child in &self.children {
            child.mount(dom, element);
        }
        element
    }
}

impl ViewConfig {
    /// Mount every configured element under the document root.
    pub fn mount(&self, dom: &MemoryDom) -> ElementId {
        let root = dom.document();
        for element in &self.elements {
            element.mount(dom, root);
        }
        root
    }

    /// A model holding the configured attributes and computed properties.
    pub fn build_model(&self) -> EpoxyResult<Model> {
        let mut definitions = Vec::with_capacity(self.computed.len());
        for (name, computed) in &self.computed {
            let definition = computed.definition().map_err(|reason| {
                EpoxyError::Config(ConfigError::Validation(vec![
                    ValidationError::InvalidComputedTemplate {
                        name: name.clone(),
                        reason,
                    },
                ]))
            })?;
            definitions.push((name.clone(), definition));
        }
        Model::with_computed(self.attributes.clone(), definitions)
    }

    /// Mount the markup into `dom` and return an unbound view over it.
    pub fn build_view(&self, dom: &Rc<MemoryDom>) -> EpoxyResult<View> {
        let root = self.mount(dom);
        let model = self.build_model()?;
        let adapter: Rc<dyn DomAdapter> = dom.clone();
        Ok(View::new(adapter, root, model)
            .with_bindings(self.bindings.clone())
            .with_options(self.options.clone()))
    }
}

/// Load a view configuration from a YAML file.
pub fn load_view_config<P: AsRef<Path>>(path: P) -> Result<ViewConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: ViewConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load a view configuration and validate it.
///
/// Every validation problem is reported, not just the first.
pub fn load_and_validate_view_config<P: AsRef<Path>>(path: P) -> Result<ViewConfig, ConfigError> {
    let cfg = load_view_config(&path)?;

    if let Err(validation_errors) = crate::config::validate_view_config(&cfg) {
        ConfigValidationFailed {
            path: &path.as_ref().display().to_string(),
            error_count: validation_errors.len(),
        }
        .log();
        return Err(ConfigError::Validation(validation_errors));
    }

    Ok(cfg)
}
