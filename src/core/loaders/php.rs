use std::path::Path;

use super::{LoadError, Loader, join_key};
use crate::core::MessageCatalogue;

/// Loads `.php` files of the form `<?php return array(...);` or
/// `<?php return [...];`.
///
/// Only literals are understood: quoted strings, numbers, `true`, `false`,
/// `null` and (nested) arrays. Anything else is a parse error.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpArrayLoader;

impl Loader for PhpArrayLoader {
    fn format(&self) -> &'static str {
        "php"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["php"]
    }

    fn load_str(
        &self,
        content: &str,
        path: &Path,
        locale: &str,
        domain: &str,
    ) -> Result<MessageCatalogue, LoadError> {
        let mut parser = PhpParser::new(content);
        let value = parser.parse_file().map_err(|message| LoadError::Php {
            path: path.to_path_buf(),
            line: parser.line(),
            message,
        })?;

        let mut catalogue = MessageCatalogue::new(locale);
        flatten_php(&value, "", domain, &mut catalogue);
        Ok(catalogue)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PhpValue {
    Scalar(String),
    Array(Vec<(String, PhpValue)>),
}

fn flatten_php(value: &PhpValue, prefix: &str, domain: &str, catalogue: &mut MessageCatalogue) {
    match value {
        PhpValue::Scalar(s) => catalogue.set(domain, prefix, s.clone()),
        PhpValue::Array(items) => {
            for (key, val) in items {
                flatten_php(val, &join_key(prefix, key), domain, catalogue);
            }
        }
    }
}

struct PhpParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> PhpParser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// 1-based line of the current position.
    fn line(&self) -> usize {
        self.src[..self.pos].matches('\n').count() + 1
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Case-insensitive keyword followed by a non-identifier character.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.rest();
        if !rest
            .get(..keyword.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
        {
            return false;
        }
        let boundary = rest[keyword.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
        if boundary {
            self.pos += keyword.len();
        }
        boundary
    }

    fn expect(&mut self, token: &str) -> Result<(), String> {
        self.skip_trivia();
        if self.eat(token) {
            Ok(())
        } else {
            Err(format!("expected `{}`", token))
        }
    }

    /// Skip whitespace and `//`, `#`, `/* */` comments.
    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if self.rest().starts_with("//") || self.rest().starts_with('#') {
                match self.rest().find('\n') {
                    Some(end) => self.pos += end + 1,
                    None => self.pos = self.src.len(),
                }
            } else if self.rest().starts_with("/*") {
                match self.rest()[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => self.pos = self.src.len(),
                }
            } else {
                break;
            }
        }
    }

    fn parse_file(&mut self) -> Result<PhpValue, String> {
        self.skip_trivia();
        if !self.eat("<?php") {
            return Err("missing `<?php` open tag".to_string());
        }
        self.skip_trivia();
        if !self.eat_keyword("return") {
            return Err("expected `return` statement".to_string());
        }
        self.skip_trivia();
        let value = self.parse_value()?;
        if !matches!(value, PhpValue::Array(_)) {
            return Err("returned value is not an array".to_string());
        }

        self.skip_trivia();
        self.eat(";");
        self.skip_trivia();
        self.eat("?>");
        self.skip_trivia();
        if self.pos < self.src.len() {
            return Err("unexpected content after returned array".to_string());
        }
        Ok(value)
    }

    fn parse_value(&mut self) -> Result<PhpValue, String> {
        self.skip_trivia();
        match self.peek() {
            Some('\'') => self.parse_single_quoted().map(PhpValue::Scalar),
            Some('"') => self.parse_double_quoted().map(PhpValue::Scalar),
            Some('[') => {
                self.bump();
                self.parse_array_items("]")
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                self.parse_number().map(PhpValue::Scalar)
            }
            Some(_) => {
                if self.eat_keyword("array") {
                    self.expect("(")?;
                    self.parse_array_items(")")
                } else if self.eat_keyword("true") {
                    Ok(PhpValue::Scalar("1".to_string()))
                } else if self.eat_keyword("false") || self.eat_keyword("null") {
                    Ok(PhpValue::Scalar(String::new()))
                } else {
                    Err("expected a string, number or array literal".to_string())
                }
            }
            None => Err("unexpected end of file".to_string()),
        }
    }

    fn parse_array_items(&mut self, close: &str) -> Result<PhpValue, String> {
        let mut items: Vec<(String, PhpValue)> = Vec::new();
        // `None` once the next index would pass `i64::MAX`.
        let mut next_index: Option<i64> = Some(0);

        loop {
            self.skip_trivia();
            if self.eat(close) {
                return Ok(PhpValue::Array(items));
            }

            let first = self.parse_value()?;
            self.skip_trivia();
            let (key, value) = if self.eat("=>") {
                let PhpValue::Scalar(key) = first else {
                    return Err("array keys must be strings or integers".to_string());
                };
                if let Ok(index) = key.parse::<i64>() {
                    next_index = match (next_index, index.checked_add(1)) {
                        (Some(current), Some(after)) => Some(current.max(after)),
                        _ => None,
                    };
                }
                (key, self.parse_value()?)
            } else {
                let Some(index) = next_index else {
                    return Err("cannot append: the next array index is out of range".to_string());
                };
                next_index = index.checked_add(1);
                (index.to_string(), first)
            };

            // Later duplicates win, as in PHP.
            match items.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => items.push((key, value)),
            }

            self.skip_trivia();
            if self.eat(",") {
                continue;
            }
            self.skip_trivia();
            if self.eat(close) {
                return Ok(PhpValue::Array(items));
            }
            return Err(format!("expected `,` or `{}`", close));
        }
    }

    fn parse_single_quoted(&mut self) -> Result<String, String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.peek() {
                    Some(c @ ('\'' | '\\')) => {
                        self.bump();
                        out.push(c);
                    }
                    _ => out.push('\\'),
                },
                Some('\'') => return Ok(out),
                Some(c) => out.push(c),
                None => return Err("unterminated string".to_string()),
            }
        }
    }

    fn parse_double_quoted(&mut self) -> Result<String, String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => {
                    let escaped = match self.peek() {
                        Some('n') => Some('\n'),
                        Some('t') => Some('\t'),
                        Some('r') => Some('\r'),
                        Some('v') => Some('\u{0B}'),
                        Some('f') => Some('\u{0C}'),
                        Some('e') => Some('\u{1B}'),
                        Some('0') => Some('\0'),
                        Some(c @ ('\\' | '"' | '$')) => Some(c),
                        _ => None,
                    };
                    match escaped {
                        Some(c) => {
                            self.bump();
                            out.push(c);
                        }
                        None => out.push('\\'),
                    }
                }
                Some('"') => return Ok(out),
                Some(c) => out.push(c),
                None => return Err("unterminated string".to_string()),
            }
        }
    }

    fn parse_number(&mut self) -> Result<String, String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_') {
                self.bump();
            } else {
                break;
            }
        }
        let literal = self.src[start..self.pos].replace('_', "");
        if literal.parse::<f64>().is_ok() {
            Ok(literal)
        } else {
            Err(format!("invalid number literal `{}`", literal))
        }
    }
}
