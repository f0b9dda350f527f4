//! Translation file loaders.
//!
//! Each supported file format has a loader producing a [`MessageCatalogue`]
//! for the locale and domain encoded in the file name:
//! - `yaml`: `.yml` / `.yaml` mappings
//! - `xliff`: `.xliff` / `.xlf` documents (1.2 and 2.0)
//! - `php`: `.php` files returning an array literal
//! - `json`: `.json` objects
//!
//! Nested structures are flattened into dotted keys (`form.submit`).
//! Loaders are looked up by extension through [`LoaderRegistry`].

mod json;
mod php;
mod xliff;
mod yaml;

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use enum_dispatch::enum_dispatch;
use thiserror::Error;

use crate::core::MessageCatalogue;

pub use json::JsonLoader;
pub use php::PhpArrayLoader;
pub use xliff::XliffLoader;
pub use yaml::YamlLoader;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no loader registered for extension \"{0}\"")]
    UnsupportedExtension(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid XLIFF in {path} at byte {position}: {message}")]
    Xliff {
        path: PathBuf,
        position: u64,
        message: String,
    },
    #[error("invalid PHP array in {path} at line {line}: {message}")]
    Php {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("{path} must contain {expected} at its root")]
    InvalidRoot {
        path: PathBuf,
        expected: &'static str,
    },
}

/// A parser for one translation file format.
#[enum_dispatch]
pub trait Loader {
    /// Short format name used in diagnostics.
    fn format(&self) -> &'static str;

    /// File extensions (lowercase, without dot) handled by this loader.
    fn extensions(&self) -> &'static [&'static str];

    /// Parse file content into a catalogue.
    fn load_str(
        &self,
        content: &str,
        path: &Path,
        locale: &str,
        domain: &str,
    ) -> Result<MessageCatalogue, LoadError>;

    /// Read and parse a file.
    fn load(&self, path: &Path, locale: &str, domain: &str) -> Result<MessageCatalogue, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&content, path, locale, domain)
    }
}

/// All built-in loaders.
#[enum_dispatch(Loader)]
#[derive(Debug, Clone, Copy)]
pub enum LoaderKind {
    Yaml(YamlLoader),
    Xliff(XliffLoader),
    Php(PhpArrayLoader),
    Json(JsonLoader),
}

/// Dispatch table from file extension to loader.
#[derive(Debug, Clone)]
pub struct LoaderRegistry {
    by_extension: HashMap<String, LoaderKind>,
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(YamlLoader);
        registry.register(XliffLoader);
        registry.register(PhpArrayLoader);
        registry.register(JsonLoader);
        registry
    }
}

impl LoaderRegistry {
    pub fn empty() -> Self {
        Self {
            by_extension: HashMap::new(),
        }
    }

    /// Register a loader for every extension it declares.
    /// A later registration for the same extension replaces the earlier one.
    pub fn register(&mut self, loader: impl Into<LoaderKind>) {
        let loader = loader.into();
        for ext in loader.extensions() {
            self.by_extension.insert((*ext).to_string(), loader);
        }
    }

    /// Find the loader for an extension (case-insensitive).
    pub fn resolve(&self, extension: &str) -> Result<&LoaderKind, LoadError> {
        self.by_extension
            .get(&extension.to_ascii_lowercase())
            .ok_or_else(|| LoadError::UnsupportedExtension(extension.to_string()))
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.resolve(extension).is_ok()
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.by_extension.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }
}

/// Join a parent prefix and a child key with a dot.
pub(crate) fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
