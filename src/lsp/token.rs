//! Locating `mdi-<name>` / `mdi:<name>` tokens in document text
//!
//! Columns are UTF-16 code units, as LSP positions require.

use std::sync::LazyLock;

use regex::Regex;
use tower_lsp::lsp_types::{Position, Range};

use crate::icons::variant::Variant;

static REGULAR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmdi[-:]([\w-]*\w)").expect("valid token regex"));
static LIGHT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmdil[-:]([\w-]*\w)").expect("valid token regex"));

static REGULAR_PARTIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmdi[-:]([\w-]*)$").expect("valid token regex"));
static LIGHT_PARTIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmdil[-:]([\w-]*)$").expect("valid token regex"));

/// An icon reference found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconToken {
    /// Icon name without the prefix, e.g. `account`
    pub name: String,
    /// Full matched text, e.g. `mdi-account`
    pub text: String,
    pub range: Range,
}

fn token_regex(variant: Variant) -> &'static Regex {
    match variant {
        Variant::Regular => &REGULAR_TOKEN,
        Variant::Light => &LIGHT_TOKEN,
    }
}

fn partial_regex(variant: Variant) -> &'static Regex {
    match variant {
        Variant::Regular => &REGULAR_PARTIAL,
        Variant::Light => &LIGHT_PARTIAL,
    }
}

/// All icon tokens of `variant` in `text`, in document order
pub fn find_tokens(text: &str, variant: Variant) -> Vec<IconToken> {
    text.lines()
        .enumerate()
        .flat_map(|(line, content)| tokens_in_line(content, line as u32, variant))
        .collect()
}

fn tokens_in_line(content: &str, line: u32, variant: Variant) -> Vec<IconToken> {
    token_regex(variant)
        .captures_iter(content)
        .filter_map(|captures| {
            let full = captures.get(0)?;
            let name = captures.get(1)?;
            Some(IconToken {
                name: name.as_str().to_string(),
                text: full.as_str().to_string(),
                range: Range {
                    start: Position {
                        line,
                        character: utf16_len(&content[..full.start()]),
                    },
                    end: Position {
                        line,
                        character: utf16_len(&content[..full.end()]),
                    },
                },
            })
        })
        .collect()
}

/// Token under the cursor. A cursor right after the last character still
/// counts as on the token.
pub fn token_at(text: &str, position: Position, variant: Variant) -> Option<IconToken> {
    let content = text.lines().nth(position.line as usize)?;
    tokens_in_line(content, position.line, variant)
        .into_iter()
        .find(|token| {
            token.range.start.character <= position.character
                && position.character <= token.range.end.character
        })
}

/// Partially typed icon name directly before the cursor, with the range a
/// completion should replace
pub fn partial_name_at(text: &str, position: Position, variant: Variant) -> Option<(String, Range)> {
    let content = text.lines().nth(position.line as usize).unwrap_or_default();
    let prefix = &content[..byte_offset(content, position.character)];

    let captures = partial_regex(variant).captures(prefix)?;
    let partial = captures.get(1)?;

    let range = Range {
        start: Position {
            line: position.line,
            character: utf16_len(&prefix[..partial.start()]),
        },
        end: Position {
            line: position.line,
            character: utf16_len(prefix),
        },
    };
    Some((partial.as_str().to_string(), range))
}

fn utf16_len(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}

/// Byte offset of a UTF-16 column, clamped to the line end
fn byte_offset(line: &str, character: u32) -> usize {
    let mut units = 0;
    for (offset, c) in line.char_indices() {
        if units >= character {
            return offset;
        }
        units += c.len_utf16() as u32;
    }
    line.len()
}
