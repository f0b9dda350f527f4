use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::CommitPolicy;

pub const CONFIG_FILE_NAME: &str = ".transyncrc.json";

/// An additional source root scanned after the application root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BundleConfig {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_managed_locales")]
    pub managed_locales: Vec<String>,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_app_root")]
    pub app_root: String,
    #[serde(default)]
    pub bundles: Vec<BundleConfig>,
    #[serde(default = "default_resources_dir")]
    pub resources_dir: String,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub commit_policy: CommitPolicy,
}

fn default_managed_locales() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_database() -> String {
    "./var/translations.sqlite".to_string()
}

fn default_app_root() -> String {
    "./app".to_string()
}

fn default_resources_dir() -> String {
    "Resources/translations".to_string()
}

fn default_cache_dir() -> String {
    "./var/cache/translations".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            managed_locales: default_managed_locales(),
            database: default_database(),
            app_root: default_app_root(),
            bundles: Vec::new(),
            resources_dir: default_resources_dir(),
            cache_dir: default_cache_dir(),
            ignores: Vec::new(),
            commit_policy: CommitPolicy::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if a glob pattern in `ignores` is invalid, if no
    /// locale is managed, or if a locale or bundle entry is blank.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if self.managed_locales.is_empty() {
            bail!("'managedLocales' must list at least one locale");
        }
        if let Some(locale) = self
            .managed_locales
            .iter()
            .find(|l| l.trim().is_empty() || l.contains('.'))
        {
            bail!("Invalid locale in 'managedLocales': \"{}\"", locale);
        }

        for bundle in &self.bundles {
            if bundle.name.trim().is_empty() || bundle.path.trim().is_empty() {
                bail!("Bundles need a non-empty 'name' and 'path'");
            }
        }

        Ok(())
    }

    /// Compiled `ignores` patterns. Call after [`Config::validate`].
    pub fn ignore_patterns(&self) -> Result<Vec<Pattern>> {
        self.ignores
            .iter()
            .map(|p| {
                Pattern::new(p)
                    .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", p))
            })
            .collect()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Where the config was read from, `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
