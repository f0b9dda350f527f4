//! Persisted translation model.
//!
//! A [`TransUnit`] is the locale-independent identity of a translatable
//! string, `(key, domain)`. It owns at most one [`Translation`] per locale.

use std::fmt;

use chrono::{DateTime, Utc};

/// Domain assigned to units created without an explicit one.
pub const DEFAULT_DOMAIN: &str = "messages";

/// Row id of a persisted translation unit.
pub type UnitId = i64;

/// The `(key, domain)` pair identifying a translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitKey {
    pub key: String,
    pub domain: String,
}

impl UnitKey {
    pub fn new(key: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            domain: domain.into(),
        }
    }

    /// Key in the default `messages` domain.
    pub fn in_default_domain(key: impl Into<String>) -> Self {
        Self::new(key, DEFAULT_DOMAIN)
    }

    /// Neither the key nor the domain may be blank.
    pub fn is_valid(&self) -> bool {
        !self.key.trim().is_empty() && !self.domain.trim().is_empty()
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.key)
    }
}

/// Locale-specific content of a translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub id: i64,
    /// Back-reference to the owning unit.
    pub unit_id: UnitId,
    pub locale: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A translation unit with its translations loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransUnit {
    pub id: UnitId,
    pub key: String,
    pub domain: String,
    /// True when the unit was created by a file import rather than ad hoc.
    pub from_file: bool,
    pub translations: Vec<Translation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransUnit {
    pub fn unit_key(&self) -> UnitKey {
        UnitKey::new(&self.key, &self.domain)
    }

    pub fn has_translation(&self, locale: &str) -> bool {
        self.translation(locale).is_some()
    }

    pub fn translation(&self, locale: &str) -> Option<&Translation> {
        self.translations.iter().find(|t| t.locale == locale)
    }

    /// Translations whose content is not empty.
    pub fn not_blank_translations(&self) -> impl Iterator<Item = &Translation> {
        self.translations.iter().filter(|t| !t.content.is_empty())
    }

    /// Replace the translation for `translation.locale`, or attach it.
    ///
    /// Keeps the one-translation-per-locale invariant for in-memory copies.
    pub fn upsert_translation(&mut self, translation: Translation) {
        if translation.updated_at > self.updated_at {
            self.updated_at = translation.updated_at;
        }
        match self
            .translations
            .iter_mut()
            .find(|t| t.locale == translation.locale)
        {
            Some(existing) => *existing = translation,
            None => self.translations.push(translation),
        }
    }
}
