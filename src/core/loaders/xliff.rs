use std::path::Path;

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use super::{LoadError, Loader};
use crate::core::MessageCatalogue;

/// Loads XLIFF 1.2 and 2.0 documents.
///
/// XLIFF 1.2: one entry per `<trans-unit>`, keyed by its `resname`
/// attribute (falling back to `<source>`), content from `<target>`
/// (falling back to `<source>`).
///
/// XLIFF 2.0: one entry per `<segment>` of a `<unit>`, keyed by the unit's
/// `name` attribute (falling back to the segment `<source>`).
#[derive(Debug, Clone, Copy, Default)]
pub struct XliffLoader;

impl Loader for XliffLoader {
    fn format(&self) -> &'static str {
        "xliff"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["xliff", "xlf"]
    }

    fn load_str(
        &self,
        content: &str,
        path: &Path,
        locale: &str,
        domain: &str,
    ) -> Result<MessageCatalogue, LoadError> {
        let mut catalogue = MessageCatalogue::new(locale);
        let mut reader = Reader::from_str(content);

        let error = |position: u64, message: String| LoadError::Xliff {
            path: path.to_path_buf(),
            position,
            message,
        };

        let mut unit: Option<UnitState> = None;
        let mut field: Option<(Field, usize)> = None;
        let mut text = String::new();
        // Depth of the innermost open element; the root is 1.
        let mut depth = 0usize;

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event()
                .map_err(|e| error(position, e.to_string()))?;

            match event {
                Event::Start(e) => {
                    depth += 1;
                    match e.local_name().as_ref() {
                        b"trans-unit" => {
                            let mut state = UnitState::open(&e, UnitKind::TransUnit, "resname")
                                .map_err(|m| error(position, m))?;
                            state.content_depth = Some(depth + 1);
                            unit = Some(state);
                        }
                        b"unit" => {
                            let mut state = UnitState::open(&e, UnitKind::Unit, "name")
                                .map_err(|m| error(position, m))?;
                            state.depth = depth;
                            unit = Some(state);
                        }
                        b"segment" => {
                            if let Some(unit) = unit.as_mut()
                                && unit.kind == UnitKind::Unit
                                && depth == unit.depth + 1
                            {
                                unit.source = None;
                                unit.target = None;
                                unit.content_depth = Some(depth + 1);
                            }
                        }
                        b"source" if field.is_none() && is_content(&unit, depth) => {
                            field = Some((Field::Source, depth));
                            text.clear();
                        }
                        b"target" if field.is_none() && is_content(&unit, depth) => {
                            field = Some((Field::Target, depth));
                            text.clear();
                        }
                        _ => {}
                    }
                }
                Event::Empty(e) => {
                    if field.is_none()
                        && is_content(&unit, depth + 1)
                        && let Some(unit) = unit.as_mut()
                    {
                        match e.local_name().as_ref() {
                            b"source" => unit.source = Some(String::new()),
                            b"target" => unit.target = Some(String::new()),
                            _ => {}
                        }
                    }
                }
                Event::Text(e) => {
                    if field.is_some() {
                        let unescaped = e.unescape().map_err(|e| error(position, e.to_string()))?;
                        text.push_str(&unescaped);
                    }
                }
                Event::CData(e) => {
                    if field.is_some() {
                        text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(e) => {
                    match e.local_name().as_ref() {
                        b"source" if field == Some((Field::Source, depth)) => {
                            if let Some(unit) = unit.as_mut() {
                                unit.source = Some(std::mem::take(&mut text));
                            }
                            field = None;
                        }
                        b"target" if field == Some((Field::Target, depth)) => {
                            if let Some(unit) = unit.as_mut() {
                                unit.target = Some(std::mem::take(&mut text));
                            }
                            field = None;
                        }
                        b"segment" => {
                            if let Some(unit) = unit.as_mut()
                                && unit.kind == UnitKind::Unit
                                && depth == unit.depth + 1
                            {
                                unit.emit(domain, &mut catalogue);
                                unit.content_depth = None;
                            }
                        }
                        b"trans-unit" => {
                            if let Some(unit) = unit.take() {
                                unit.emit(domain, &mut catalogue);
                            }
                        }
                        b"unit" => unit = None,
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(catalogue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Source,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitKind {
    /// XLIFF 1.2 `<trans-unit>`
    TransUnit,
    /// XLIFF 2.0 `<unit>`
    Unit,
}

/// `<source>`/`<target>` count only at `content_depth`: direct children of
/// a `<trans-unit>` or of a `<segment>`. Those under `<alt-trans>` or
/// `<ignorable>` are not the unit's content.
fn is_content(unit: &Option<UnitState>, depth: usize) -> bool {
    unit.as_ref()
        .is_some_and(|unit| unit.content_depth == Some(depth))
}

#[derive(Debug)]
struct UnitState {
    kind: UnitKind,
    /// Depth of the unit element itself.
    depth: usize,
    content_depth: Option<usize>,
    name: Option<String>,
    source: Option<String>,
    target: Option<String>,
}

impl UnitState {
    fn open(start: &BytesStart<'_>, kind: UnitKind, name_attr: &str) -> Result<Self, String> {
        let mut name = None;
        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            if attr.key.local_name().as_ref() == name_attr.as_bytes() {
                let value = attr.unescape_value().map_err(|e| e.to_string())?;
                if !value.is_empty() {
                    name = Some(value.into_owned());
                }
            }
        }
        Ok(Self {
            kind,
            depth: 0,
            content_depth: None,
            name,
            source: None,
            target: None,
        })
    }

    fn emit(&self, domain: &str, catalogue: &mut MessageCatalogue) {
        let Some(key) = self.name.as_ref().or(self.source.as_ref()) else {
            return;
        };
        if key.is_empty() {
            return;
        }
        let content = self
            .target
            .as_ref()
            .or(self.source.as_ref())
            .cloned()
            .unwrap_or_default();
        catalogue.set(domain, key.clone(), content);
    }
}
