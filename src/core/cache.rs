//! Invalidation of compiled translation catalogues.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("invalid cache pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Something that holds per-locale compiled catalogues.
pub trait CacheInvalidator {
    /// Drop cached data for `locale`. Returns the number of entries removed.
    fn invalidate_locale(&self, locale: &str) -> Result<usize, CacheError>;

    fn invalidate_locales(&self, locales: &[String]) -> Result<usize, CacheError> {
        let mut removed = 0;
        for locale in locales {
            removed += self.invalidate_locale(locale)?;
        }
        Ok(removed)
    }
}

/// Cache directory holding `catalogue.<locale>.*` files.
#[derive(Debug, Clone)]
pub struct CatalogueCacheDir {
    dir: PathBuf,
}

impl CatalogueCacheDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CacheInvalidator for CatalogueCacheDir {
    fn invalidate_locale(&self, locale: &str) -> Result<usize, CacheError> {
        if !self.dir.is_dir() {
            return Ok(0);
        }

        let pattern = self.dir.join(format!(
            "catalogue.{}.*",
            glob::Pattern::escape(locale)
        ));
        let mut removed = 0;
        for path in glob::glob(&pattern.to_string_lossy())?.flatten() {
            if !path.is_file() {
                continue;
            }
            fs::remove_file(&path).map_err(|source| CacheError::Remove {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "removed cached catalogue");
            removed += 1;
        }
        Ok(removed)
    }
}
