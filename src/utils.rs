//! Common utility functions shared across the codebase.

use unicode_width::UnicodeWidthStr;

/// Pick the singular or plural form of a noun for `count`.
///
/// # Examples
///
/// ```
/// use transync::utils::plural;
///
/// assert_eq!(plural(1, "file", "files"), "file");
/// assert_eq!(plural(0, "file", "files"), "files");
/// assert_eq!(plural(3, "translation", "translations"), "translations");
/// ```
pub fn plural<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

/// Left-align `text` in a column of `width` terminal cells.
///
/// Unlike `format!("{:<width$}")`, wide characters count as two cells.
pub fn pad_right(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", text, " ".repeat(fill))
}

/// Right-align `text` in a column of `width` terminal cells.
pub fn pad_left(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", " ".repeat(fill), text)
}
