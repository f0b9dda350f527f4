use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};
use glob::Pattern;
use tracing::debug;

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    core::{CatalogueCacheDir, SqliteStore},
};

/// Heading used for the application root.
pub const APP_SOURCE_NAME: &str = "app";

/// A directory whose translations directory is scanned by `import`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    pub name: String,
    pub path: PathBuf,
}

/// Project settings shared by every command.
///
/// # Configuration Priority
///
/// 1. CLI arguments (e.g. `--locale fr`, `--database ./i18n.db`)
/// 2. `.transyncrc.json` config file
/// 3. Built-in defaults
///
/// Relative paths from the config file resolve against the project root.
pub struct ProjectContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,
    /// Project root directory.
    pub root_dir: PathBuf,
    /// Config file in use, if any.
    pub config_path: Option<PathBuf>,
    pub database_path: PathBuf,
    pub ignores: Vec<Pattern>,
    pub verbose: bool,
}

impl ProjectContext {
    /// Load configuration from the project root and apply CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns error if the config file cannot be parsed or is invalid, or
    /// if an overriding locale is blank.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let root_dir = common_args
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config_result = load_config(&root_dir)?;
        if !config_result.from_file() {
            debug!("no config file found, using defaults");
        }
        let config_path = config_result.path;
        let mut config = config_result.config;

        if !common_args.locales.is_empty() {
            config.managed_locales = common_args.locales.clone();
        }
        if let Some(locale) = config.managed_locales.iter().find(|l| l.trim().is_empty()) {
            bail!("Invalid locale: \"{}\"", locale);
        }

        let database_path = match &common_args.database {
            Some(path) => path.clone(),
            None => resolve_against(&root_dir, &config.database),
        };
        let ignores = config.ignore_patterns()?;

        Ok(Self {
            config,
            root_dir,
            config_path,
            database_path,
            ignores,
            verbose: common_args.verbose,
        })
    }

    pub fn managed_locales(&self) -> &[String] {
        &self.config.managed_locales
    }

    /// Resolve a path from the config file against the project root.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve_against(&self.root_dir, path)
    }

    /// The application root followed by every bundle, in config order.
    pub fn source_roots(&self) -> Vec<SourceRoot> {
        let app = SourceRoot {
            name: APP_SOURCE_NAME.to_string(),
            path: self.resolve_path(&self.config.app_root),
        };
        std::iter::once(app)
            .chain(self.config.bundles.iter().map(|bundle| SourceRoot {
                name: bundle.name.clone(),
                path: self.resolve_path(&bundle.path),
            }))
            .collect()
    }

    /// Store for the configured database. Nothing is opened yet.
    pub fn open_store(&self) -> SqliteStore {
        SqliteStore::open(&self.database_path)
    }

    pub fn catalogue_cache(&self) -> CatalogueCacheDir {
        CatalogueCacheDir::new(self.resolve_path(&self.config.cache_dir))
    }
}

fn resolve_against(root_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    let is_cur_dir = root_dir
        .components()
        .all(|c| matches!(c, Component::CurDir));
    if is_cur_dir {
        p.to_path_buf()
    } else {
        let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
        root_dir.join(rel)
    }
}
