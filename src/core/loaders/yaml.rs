use std::path::Path;

use serde_yaml::Value;

use super::{LoadError, Loader, join_key};
use crate::core::MessageCatalogue;

/// Loads `.yml` / `.yaml` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlLoader;

impl Loader for YamlLoader {
    fn format(&self) -> &'static str {
        "yaml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yml", "yaml"]
    }

    fn load_str(
        &self,
        content: &str,
        path: &Path,
        locale: &str,
        domain: &str,
    ) -> Result<MessageCatalogue, LoadError> {
        let mut catalogue = MessageCatalogue::new(locale);

        // An empty document is a valid, empty catalogue.
        if content.trim().is_empty() {
            return Ok(catalogue);
        }

        let value: Value = serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        match value {
            Value::Null => {}
            Value::Mapping(_) => flatten_yaml(&value, "", domain, &mut catalogue),
            _ => {
                return Err(LoadError::InvalidRoot {
                    path: path.to_path_buf(),
                    expected: "a mapping",
                });
            }
        }

        Ok(catalogue)
    }
}

fn flatten_yaml(value: &Value, prefix: &str, domain: &str, catalogue: &mut MessageCatalogue) {
    match value {
        Value::Mapping(map) => {
            for (key, val) in map {
                if let Some(key) = scalar_to_string(key) {
                    flatten_yaml(val, &join_key(prefix, &key), domain, catalogue);
                }
            }
        }
        Value::Sequence(items) => {
            for (index, val) in items.iter().enumerate() {
                flatten_yaml(val, &join_key(prefix, &index.to_string()), domain, catalogue);
            }
        }
        Value::Tagged(tagged) => flatten_yaml(&tagged.value, prefix, domain, catalogue),
        scalar => {
            if let Some(content) = scalar_to_string(scalar) {
                catalogue.set(domain, prefix, content);
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
