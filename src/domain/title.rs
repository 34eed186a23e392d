//! Display titles derived from file names.

use std::path::Path;

/// Default delimiter replaced by spaces in file names.
pub const DEFAULT_DELIMITER: char = '-';

/// How titles are derived for one kind of file: which suffix to drop and
/// which delimiter stands for a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRule {
    extension: String,
    delimiter: char,
}

impl TitleRule {
    /// `extension` may be given with or without its leading dot.
    pub fn new(extension: &str, delimiter: char) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            delimiter,
        }
    }

    /// Extension without the leading dot, e.g. `mp3`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn derive(&self, path: &Path) -> String {
        derive_title(path, &format!(".{}", self.extension), self.delimiter)
    }
}

/// Derives a display title from `path`.
///
/// Takes the final path segment, drops the last `extension.len()` characters
/// (the extension is expected to include its leading dot), replaces every
/// `delimiter` with a space and title-cases the result.
pub fn derive_title(path: &Path, extension: &str, delimiter: char) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    let keep = file_name
        .chars()
        .count()
        .saturating_sub(extension.chars().count());
    let stem: String = file_name
        .chars()
        .take(keep)
        .map(|c| if c == delimiter { ' ' } else { c })
        .collect();

    title_case(&stem)
}

/// Upper-cases the first letter of every run of letters and lower-cases the rest.
///
/// Any non-letter (digits included) starts a new word, so `"1st"` becomes `"1St"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}
