//! Persistence of translation units and their translations.
//!
//! [`TranslationStore`] is the seam between the importer/reporter and the
//! database. [`SqliteStore`] is the only implementation.

mod sqlite;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::{TransUnit, Translation, UnitId, UnitKey};

pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("translation unit {0} must have a non-blank key and domain")]
    InvalidUnit(UnitKey),
    #[error("translation unit #{0} does not exist")]
    UnitNotFound(UnitId),
    #[error("translation tables do not exist")]
    MissingSchema,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage operations used by import and reporting.
///
/// Writes happen inside an implicit unit of work that stays open until
/// [`flush`](TranslationStore::flush) commits it.
pub trait TranslationStore {
    /// Create the translation tables if they are missing.
    fn install_schema(&mut self) -> StoreResult<()>;

    /// Find a unit by `(key, domain)`, with its translations.
    fn find_unit(&self, key: &UnitKey) -> StoreResult<Option<TransUnit>>;

    /// Create a unit. `from_file` marks units created by an import.
    fn create_unit(&mut self, key: &UnitKey, from_file: bool) -> StoreResult<TransUnit>;

    /// Attach the translation for `locale` to a unit, or overwrite its content.
    ///
    /// Writing identical content leaves timestamps untouched.
    fn put_translation(
        &mut self,
        unit_id: UnitId,
        locale: &str,
        content: &str,
    ) -> StoreResult<Translation>;

    /// Commit pending writes.
    fn flush(&mut self) -> StoreResult<()>;

    /// Whether the translation tables exist. Never fails: a database that
    /// cannot be reached counts as "no tables".
    fn tables_exist(&self) -> bool;

    /// Latest `updated_at` over all translations.
    fn latest_updated_at(&self) -> StoreResult<Option<DateTime<Utc>>>;

    /// Number of translation units per domain.
    fn count_units_by_domain(&self) -> StoreResult<BTreeMap<String, usize>>;

    /// Number of translations per locale within `domain`.
    fn count_translations_by_locale(&self, domain: &str) -> StoreResult<BTreeMap<String, usize>>;
}
