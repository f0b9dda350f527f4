use std::path::Path;

use serde_json::Value;

use super::{LoadError, Loader, join_key};
use crate::core::MessageCatalogue;

/// Loads `.json` files holding a (possibly nested) object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl Loader for JsonLoader {
    fn format(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn load_str(
        &self,
        content: &str,
        path: &Path,
        locale: &str,
        domain: &str,
    ) -> Result<MessageCatalogue, LoadError> {
        let mut catalogue = MessageCatalogue::new(locale);
        if content.trim().is_empty() {
            return Ok(catalogue);
        }

        let json: Value = serde_json::from_str(content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        if !json.is_object() {
            return Err(LoadError::InvalidRoot {
                path: path.to_path_buf(),
                expected: "an object",
            });
        }

        flatten_json(&json, String::new(), domain, &mut catalogue);
        Ok(catalogue)
    }
}

fn flatten_json(value: &Value, prefix: String, domain: &str, result: &mut MessageCatalogue) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten_json(val, join_key(&prefix, key), domain, result);
            }
        }
        Value::Array(arr) => {
            for (index, val) in arr.iter().enumerate() {
                flatten_json(val, join_key(&prefix, &index.to_string()), domain, result);
            }
        }
        Value::String(s) => result.set(domain, prefix, s.clone()),
        Value::Number(n) => result.set(domain, prefix, n.to_string()),
        Value::Bool(b) => result.set(domain, prefix, b.to_string()),
        Value::Null => result.set(domain, prefix, ""),
    }
}
