//! Translation file discovery.
//!
//! Looks for `<domain>.<locale>.<extension>` files under a source root's
//! translations directory, keeping only managed locales.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use glob::Pattern;
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

static FILE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<domain>[^.]+)\.(?P<locale>[^.]+)\.(?P<ext>[^.]+)$")
        .expect("file name pattern is valid")
});

/// A candidate translation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFile {
    pub path: PathBuf,
    pub domain: String,
    pub locale: String,
    pub extension: String,
}

impl TranslationFile {
    /// Split a file name of the form `<domain>.<locale>.<extension>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use transync::core::TranslationFile;
    ///
    /// let file = TranslationFile::from_path("Resources/translations/messages.fr.yml").unwrap();
    /// assert_eq!(file.domain, "messages");
    /// assert_eq!(file.locale, "fr");
    /// assert_eq!(file.extension, "yml");
    ///
    /// assert!(TranslationFile::from_path("README.md").is_none());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let name = path.file_name()?.to_str()?;
        let caps = FILE_NAME_RE.captures(name)?;
        Some(Self {
            path: path.to_path_buf(),
            domain: caps["domain"].to_string(),
            locale: caps["locale"].to_string(),
            extension: caps["ext"].to_string(),
        })
    }
}

/// Files found under one source root.
#[derive(Debug, Default)]
pub struct DiscoveryResult {
    /// The translations directory, or `None` when the root has none.
    pub directory: Option<PathBuf>,
    /// Matching files, sorted by path.
    pub files: Vec<TranslationFile>,
    /// Entries that could not be read while walking.
    pub skipped_count: usize,
}

/// Find translation files for the managed `locales` in `root/resources_dir`.
///
/// A root without a translations directory yields an empty result with
/// `directory == None`, not an error.
pub fn find_translation_files(
    root: &Path,
    resources_dir: &str,
    locales: &[String],
    ignores: &[Pattern],
) -> DiscoveryResult {
    let dir = root.join(resources_dir);
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "no translations directory");
        return DiscoveryResult::default();
    }

    let managed: HashSet<&str> = locales.iter().map(String::as_str).collect();
    let mut result = DiscoveryResult {
        directory: Some(dir.clone()),
        ..Default::default()
    };

    for entry in WalkDir::new(&dir).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                result.skipped_count += 1;
                warn!("cannot access path: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let path_str = path.to_string_lossy();
        if ignores.iter().any(|p| p.matches(&path_str)) {
            debug!(path = %path_str, "ignored by pattern");
            continue;
        }

        if let Some(file) = TranslationFile::from_path(path)
            && managed.contains(file.locale.as_str())
        {
            result.files.push(file);
        }
    }

    result
}
