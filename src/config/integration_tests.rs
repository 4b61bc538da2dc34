// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod integration_tests {
    use std::io::Write;
    use std::rc::Rc;

    use serde_json::json;
    use tempfile::NamedTempFile;

    use crate::config::{load_and_validate_view_config, load_view_config};
    use crate::dom::{DomAdapter, MemoryDom};
    use crate::errors::{ConfigError, ValidationError};

    const PROFILE_VIEW: &str = r##"
attributes:
  firstName: Ann
  lastName: Lee
  subscribed: false
computed:
  fullName:
    template: "{firstName} {lastName}"
elements:
  - tag: form
    id: profile
    children:
      - { tag: h1, id: name }
      - { tag: input, classes: [first] }
      - { tag: input, id: subscribe }
bindings:
  "#name": "text: fullName, className: { subscribed: subscribed }"
  ".first": "value: firstName"
  "#subscribe": "checked: subscribed"
  "#optional": "text: lastName"
"##;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    /// A YAML view loads, mounts, binds and stays in sync.
    #[test]
    fn test_profile_view_end_to_end() {
        let file = write_config(PROFILE_VIEW);
        let config = load_and_validate_view_config(file.path()).unwrap();
        let dom = Rc::new(MemoryDom::new());

        let mut view = config.build_view(&dom).unwrap();
        view.bind_view().unwrap();

        // "#optional" matches nothing and is skipped
        assert_eq!(view.bindings().len(), 3);
        let name = dom.query(dom.document(), "#name").unwrap();
        let first = dom.query(dom.document(), "#profile .first").unwrap();
        assert_eq!(dom.text(name), "Ann Lee");

        dom.type_into(first, "Amy").unwrap();
        assert_eq!(dom.text(name), "Amy Lee");
        assert_eq!(view.model().get("firstName"), json!("Amy"));
        assert!(!view.model().has_stored("fullName"));

        view.model().set("subscribed", json!(true)).unwrap();
        assert!(dom.has_class(name, "subscribed"));

        view.unbind_view();
        assert_eq!(dom.total_listener_count(), 0);
    }

    #[test]
    fn test_bundled_profile_view() {
        let config = load_and_validate_view_config("configs/profile-view.yaml").unwrap();
        let dom = Rc::new(MemoryDom::new());
        let mut view = config.build_view(&dom).unwrap();
        view.bind_view().unwrap();

        let summary = dom.query(dom.document(), ".summary").unwrap();
        let save = dom.query(dom.document(), "#save").unwrap();
        assert_eq!(dom.text(summary), "Ann Lee, 30");
        assert_eq!(dom.property(save, "disabled"), json!(true));

        view.model().set("subscribed", json!(true)).unwrap();
        view.model().set("lastName", json!("Ray")).unwrap();

        assert_eq!(dom.property(save, "disabled"), json!(false));
        assert_eq!(dom.attribute(save, "title").as_deref(), Some("Ann Ray"));
        assert_eq!(dom.text(summary), "Ann Ray, 30");
        assert_eq!(view.model().attributes().get("summary"), Some(&json!("Ann Ray, 30")));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_view_config("does/not/exist.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_malformed_yaml_is_yaml_error() {
        let file = write_config("bindings: [not, a, map\n");
        let result = load_view_config(file.path());
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_validation_errors_are_collected() {
        let file = write_config(
            "attributes: { a: 1 }\nbindings:\n  '#x': 'text: missing'\n  '#y': 'text'\n",
        );

        match load_and_validate_view_config(file.path()) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.contains(&ValidationError::UnresolvedIdentifier {
                    selector: "#x".to_string(),
                    name: "missing".to_string(),
                }));
            }
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_error_display_lists_every_problem() {
        let file = write_config("elements:\n  - { tag: a, id: d }\n  - { tag: b, id: d }\n");

        let err = load_and_validate_view_config(file.path()).unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Configuration validation failed:"));
        assert!(message.contains("Duplicate element id: 'd'"));
    }
}
