use std::collections::BTreeMap;

/// Messages of one domain, key → content.
pub type DomainMessages = BTreeMap<String, String>;

/// In-memory messages parsed from one translation file, for a single locale.
///
/// Entries are grouped by domain. A loader normally fills only the domain
/// encoded in the file name, but nothing prevents a catalogue from holding
/// several.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalogue {
    locale: String,
    domains: BTreeMap<String, DomainMessages>,
}

impl MessageCatalogue {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            domains: BTreeMap::new(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Set a message, replacing any previous content for the same key.
    pub fn set(&mut self, domain: &str, key: impl Into<String>, content: impl Into<String>) {
        self.domains
            .entry(domain.to_string())
            .or_default()
            .insert(key.into(), content.into());
    }

    pub fn get(&self, domain: &str, key: &str) -> Option<&str> {
        self.domains
            .get(domain)
            .and_then(|messages| messages.get(key))
            .map(String::as_str)
    }

    /// Iterate `(domain, messages)` in domain order.
    pub fn domains(&self) -> impl Iterator<Item = (&str, &DomainMessages)> {
        self.domains.iter().map(|(d, m)| (d.as_str(), m))
    }

    /// Iterate every `(domain, key, content)` triple.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.domains.iter().flat_map(|(domain, messages)| {
            messages
                .iter()
                .map(move |(key, content)| (domain.as_str(), key.as_str(), content.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.domains.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
