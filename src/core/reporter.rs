//! Aggregate statistics over the translation store.

use chrono::{DateTime, Utc};

use crate::core::storage::{StoreResult, TranslationStore};

/// Counts for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStats {
    pub domain: String,
    pub units: usize,
    /// `(locale, translations)` sorted by locale.
    pub translations_by_locale: Vec<(String, usize)>,
}

impl DomainStats {
    pub fn translations(&self, locale: &str) -> usize {
        self.translations_by_locale
            .iter()
            .find(|(l, _)| l == locale)
            .map_or(0, |(_, n)| *n)
    }

    /// Percentage of units translated into `locale`, or `None` for an empty domain.
    pub fn coverage(&self, locale: &str) -> Option<f64> {
        if self.units == 0 {
            return None;
        }
        Some(self.translations(locale) as f64 * 100.0 / self.units as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusReport {
    pub tables_exist: bool,
    pub latest_updated_at: Option<DateTime<Utc>>,
    /// Sorted by domain name.
    pub domains: Vec<DomainStats>,
}

impl StatusReport {
    pub fn total_units(&self) -> usize {
        self.domains.iter().map(|d| d.units).sum()
    }

    /// Every locale that has at least one translation, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self
            .domains
            .iter()
            .flat_map(|d| d.translations_by_locale.iter().map(|(l, _)| l.as_str()))
            .collect();
        locales.sort_unstable();
        locales.dedup();
        locales
    }
}

/// Build a [`StatusReport`], optionally restricted to one domain.
///
/// A store without tables yields an empty report with `tables_exist == false`.
pub fn collect_status<S: TranslationStore>(
    store: &S,
    domain: Option<&str>,
) -> StoreResult<StatusReport> {
    if !store.tables_exist() {
        return Ok(StatusReport::default());
    }

    let mut report = StatusReport {
        tables_exist: true,
        latest_updated_at: store.latest_updated_at()?,
        domains: Vec::new(),
    };

    for (name, units) in store.count_units_by_domain()? {
        if domain.is_some_and(|d| d != name) {
            continue;
        }
        let translations_by_locale = store
            .count_translations_by_locale(&name)?
            .into_iter()
            .collect();
        report.domains.push(DomainStats {
            domain: name,
            units,
            translations_by_locale,
        });
    }

    Ok(report)
}
