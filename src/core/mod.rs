//! Import engine.
//!
//! ## Module Structure
//!
//! - `model`: translation units and translations
//! - `catalogue`: in-memory `(domain, key) -> content` maps for one locale
//! - `loaders`: file format parsers producing catalogues
//! - `discovery`: locating `<domain>.<locale>.<ext>` files under source roots
//! - `storage`: the translation store and its SQLite implementation
//! - `importer`: reconciling catalogues with the store
//! - `reporter`: aggregate statistics over the store
//! - `cache`: invalidation of compiled catalogues after an import
//! - `context`: resolved project settings shared by commands

pub mod cache;
pub mod catalogue;
pub mod context;
pub mod discovery;
pub mod importer;
pub mod loaders;
pub mod model;
pub mod reporter;
pub mod storage;

pub use cache::{CacheError, CacheInvalidator, CatalogueCacheDir};
pub use catalogue::{DomainMessages, MessageCatalogue};
pub use context::{ProjectContext, SourceRoot};
pub use discovery::{DiscoveryResult, TranslationFile, find_translation_files};
pub use importer::{
    CatalogueImport, CommitPolicy, FileOutcome, FileReport, ImportSummary, Importer, SkipReason,
};
pub use loaders::{LoadError, Loader, LoaderKind, LoaderRegistry};
pub use model::{DEFAULT_DOMAIN, TransUnit, Translation, UnitId, UnitKey};
pub use reporter::{DomainStats, StatusReport, collect_status};
pub use storage::{SqliteStore, StoreError, StoreResult, TranslationStore};
