//! transync - import translation files into a database
//!
//! transync finds translation files (`<domain>.<locale>.<ext>` in xliff, yml,
//! php or json) under an application root and its bundles, and merges their
//! content into a SQLite store of translation units and per-locale
//! translations. It can also report what the store holds.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands, output)
//! - `config`: Configuration file loading and parsing
//! - `core`: Import engine (loaders, discovery, storage, importer, reporter)
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;
