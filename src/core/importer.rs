//! Reconciles parsed catalogues with the translation store.
//!
//! For every `(domain, key, content)` entry the importer resolves the unit
//! `(key, domain)` (creating it on first sight), then attaches or overwrites
//! the translation for the catalogue's locale. Units resolved once are kept
//! in an identity map for the rest of the run, so a unit touched by several
//! files is merged, never duplicated, and never re-read from the store.

use std::collections::{HashMap, hash_map::Entry};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    LoadError, Loader, LoaderRegistry, MessageCatalogue, TransUnit, TranslationFile, UnitKey,
    storage::{StoreResult, TranslationStore},
};

/// When pending writes are committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum CommitPolicy {
    /// Commit after every entry. Slowest, but an aborted run keeps every
    /// entry written before the failure.
    #[default]
    Entry,
    /// Commit once per file.
    File,
}

/// Result of importing one catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogueImport {
    /// Translations attached or updated.
    pub imported: usize,
    /// Units created because their `(key, domain)` was new.
    pub units_created: usize,
    /// Entries ignored because their key was blank.
    pub skipped_entries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedExtension(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnsupportedExtension(ext) => {
                write!(f, "no loader for extension \"{}\"", ext)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Imported(CatalogueImport),
    Skipped(SkipReason),
    /// The file could not be parsed; nothing was imported from it.
    Failed(String),
}

/// Outcome of one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub file: TranslationFile,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn imported(&self) -> usize {
        match &self.outcome {
            FileOutcome::Imported(stats) => stats.imported,
            FileOutcome::Skipped(_) | FileOutcome::Failed(_) => 0,
        }
    }
}

/// Totals over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub files_imported: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub translations_imported: usize,
    pub units_created: usize,
    pub entries_skipped: usize,
}

impl ImportSummary {
    pub fn record(&mut self, report: &FileReport) {
        match &report.outcome {
            FileOutcome::Imported(stats) => {
                self.files_imported += 1;
                self.translations_imported += stats.imported;
                self.units_created += stats.units_created;
                self.entries_skipped += stats.skipped_entries;
            }
            FileOutcome::Skipped(_) => self.files_skipped += 1,
            FileOutcome::Failed(_) => self.files_failed += 1,
        }
    }

    pub fn files_seen(&self) -> usize {
        self.files_imported + self.files_skipped + self.files_failed
    }
}

/// Imports catalogues into a store, one run at a time.
pub struct Importer<'s, S: TranslationStore> {
    store: &'s mut S,
    loaders: LoaderRegistry,
    policy: CommitPolicy,
    identity_map: HashMap<UnitKey, TransUnit>,
}

impl<'s, S: TranslationStore> Importer<'s, S> {
    pub fn new(store: &'s mut S, loaders: LoaderRegistry, policy: CommitPolicy) -> Self {
        Self {
            store,
            loaders,
            policy,
            identity_map: HashMap::new(),
        }
    }

    /// Number of distinct units resolved so far in this run.
    pub fn units_seen(&self) -> usize {
        self.identity_map.len()
    }

    /// Parse and import one discovered file.
    ///
    /// Unsupported extensions and parse failures are reported in the
    /// returned [`FileReport`]; only store errors are returned as `Err`.
    pub fn import_file(&mut self, file: &TranslationFile) -> StoreResult<FileReport> {
        let loader = match self.loaders.resolve(&file.extension) {
            Ok(loader) => *loader,
            Err(_) => {
                debug!(path = %file.path.display(), "skipping file without loader");
                return Ok(FileReport {
                    file: file.clone(),
                    outcome: FileOutcome::Skipped(SkipReason::UnsupportedExtension(
                        file.extension.clone(),
                    )),
                });
            }
        };

        let catalogue = match loader.load(&file.path, &file.locale, &file.domain) {
            Ok(catalogue) => catalogue,
            Err(err) => {
                debug!(path = %file.path.display(), "failed to load: {}", err);
                return Ok(FileReport {
                    file: file.clone(),
                    outcome: FileOutcome::Failed(describe_load_error(&err)),
                });
            }
        };

        let stats = self.import_catalogue(&catalogue)?;
        debug!(
            path = %file.path.display(),
            imported = stats.imported,
            created = stats.units_created,
            "file imported"
        );
        Ok(FileReport {
            file: file.clone(),
            outcome: FileOutcome::Imported(stats),
        })
    }

    /// Reconcile every entry of `catalogue` with the store.
    pub fn import_catalogue(&mut self, catalogue: &MessageCatalogue) -> StoreResult<CatalogueImport> {
        let mut stats = CatalogueImport::default();

        for (domain, key, content) in catalogue.entries() {
            let unit_key = UnitKey::new(key, domain);
            if !unit_key.is_valid() {
                warn!(domain, "skipping entry with blank key");
                stats.skipped_entries += 1;
                continue;
            }

            if self.import_entry(unit_key, catalogue.locale(), content)? {
                stats.units_created += 1;
            }
            stats.imported += 1;

            if self.policy == CommitPolicy::Entry {
                self.store.flush()?;
            }
        }

        if self.policy == CommitPolicy::File {
            self.store.flush()?;
        }

        Ok(stats)
    }

    /// Attach `content` for `locale` to the unit; returns true if the unit
    /// had to be created.
    fn import_entry(&mut self, key: UnitKey, locale: &str, content: &str) -> StoreResult<bool> {
        let mut created = false;
        let unit = match self.identity_map.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let unit = match self.store.find_unit(entry.key())? {
                    Some(unit) => unit,
                    None => {
                        created = true;
                        self.store.create_unit(entry.key(), true)?
                    }
                };
                entry.insert(unit)
            }
        };

        let translation = self.store.put_translation(unit.id, locale, content)?;
        unit.upsert_translation(translation);
        Ok(created)
    }
}

fn describe_load_error(err: &LoadError) -> String {
    match err {
        LoadError::Io { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}
