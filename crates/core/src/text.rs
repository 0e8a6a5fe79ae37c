//! Text handling for generated content.
//!
//! Parses the numbered subtopic list returned by the content service and
//! wraps descriptions to a fixed column width before layout.

use crate::error::{Error, Result};
use crate::types::{Subtopic, SUBTOPIC_COUNT};
use regex::Regex;
use std::sync::LazyLock;

/// Regex matching a leading ordinal marker such as "1." or "12.  ".
static ORDINAL_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// Column width descriptions are wrapped to.
pub const DESCRIPTION_WRAP_WIDTH: usize = 95;

/// How strictly a subtopic list must follow the "N. text" layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListParsing {
    /// Strip markers where present, keep other lines as they are.
    #[default]
    Lenient,
    /// Every non-blank line must carry a marker.
    Strict,
}

/// Parser for the numbered subtopic list.
#[derive(Debug, Clone)]
pub struct SubtopicParser {
    mode: ListParsing,
    limit: usize,
}

impl Default for SubtopicParser {
    fn default() -> Self {
        Self {
            mode: ListParsing::Lenient,
            limit: SUBTOPIC_COUNT,
        }
    }
}

impl SubtopicParser {
    /// Create a lenient parser keeping at most six entries.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ListParsing) -> Self {
        self.mode = mode;
        self
    }

    /// Set the maximum number of entries kept (at least one).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Parse a response into subtopics.
    ///
    /// - Blank lines are dropped
    /// - A leading "N." marker and the whitespace after it are removed
    /// - Only the first `limit` entries are kept
    ///
    /// An empty response gives an empty list. In strict mode a line without
    /// a marker fails with [`Error::UnexpectedFormat`].
    pub fn parse(&self, response: &str) -> Result<Vec<Subtopic>> {
        let mut subtopics = Vec::new();

        for line in response.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let has_marker = ORDINAL_MARKER_REGEX.is_match(line);
            if !has_marker && self.mode == ListParsing::Strict {
                return Err(Error::UnexpectedFormat(line.to_string()));
            }

            let label = ORDINAL_MARKER_REGEX.replace(line, "");
            let label = label.trim();
            if label.is_empty() {
                if self.mode == ListParsing::Strict {
                    return Err(Error::UnexpectedFormat(line.to_string()));
                }
                continue;
            }

            subtopics.push(Subtopic::new(label));
            if subtopics.len() == self.limit {
                break;
            }
        }

        if subtopics.len() < self.limit {
            log::debug!(
                "Subtopic list has {} entries, expected {}",
                subtopics.len(),
                self.limit
            );
        }

        Ok(subtopics)
    }
}

/// Wrap text into lines of at most `width` characters, joined by newlines.
///
/// All whitespace runs (newlines included) collapse to word boundaries, so
/// wrapping already wrapped text at the same width gives the same result.
/// Words longer than `width` are split across lines.
///
/// Breaks happen only at whitespace: runs of spaces inside a line are not
/// preserved and hyphenated words are never split at the hyphen.
pub fn wrap_text(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        if current_len > 0 && current_len + 1 + word.len() <= width {
            current.push(' ');
            current.extend(word.iter());
            current_len += 1 + word.len();
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        while word.len() > width {
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        current.extend(word.iter());
        current_len = word.len();
    }

    if current_len > 0 {
        lines.push(current);
    }

    lines.join("\n")
}

/// Wrap a description to [`DESCRIPTION_WRAP_WIDTH`] columns.
pub fn wrap_description(text: &str) -> String {
    wrap_text(text, DESCRIPTION_WRAP_WIDTH)
}
