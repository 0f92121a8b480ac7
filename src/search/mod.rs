//! Search functionality.
//!
//! Searches the lines of a [`StructureIndex`] with:
//! - Literal, case-sensitive substring queries (first occurrence per line)
//! - Pattern queries: `re:` followed by a regular expression
//! - Bounded context snippets around each match
//! - Canned presets ([`SearchPreset`])

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::structure::{LineEntry, StructureIndex};

/// Reserved prefix that turns a query into a regular expression.
pub const PATTERN_MARKER: &str = "re:";

/// Characters of context kept on each side of a match by default.
pub const DEFAULT_CONTEXT_CHARS: usize = 20;

/// Marker added where a snippet was cut short.
pub const ELLIPSIS: &str = "\u{2026}";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A parsed search query.
#[derive(Debug, Clone)]
pub enum SearchQuery {
    /// Nothing to search for
    Empty,
    /// Plain substring
    Literal(String),
    /// Regular expression (highlight width is not tracked)
    Pattern(Regex),
}

impl SearchQuery {
    /// Parse raw query text.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidPattern`] when a `re:` query does not
    /// compile.
    pub fn parse(query: &str) -> Result<Self, QueryError> {
        if let Some(pattern) = query.strip_prefix(PATTERN_MARKER) {
            if pattern.is_empty() {
                return Ok(Self::Empty);
            }
            return Regex::new(pattern)
                .map(Self::Pattern)
                .map_err(|source| QueryError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                });
        }
        if query.is_empty() {
            return Ok(Self::Empty);
        }
        Ok(Self::Literal(query.to_string()))
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Byte range of the first match in `text`.
    ///
    /// Pattern matches report an empty range at the match start.
    fn find(&self, text: &str) -> Option<(usize, usize)> {
        match self {
            Self::Empty => None,
            Self::Literal(needle) => text.find(needle.as_str()).map(|s| (s, s + needle.len())),
            Self::Pattern(re) => re.find(text).map(|m| (m.start(), m.start())),
        }
    }
}

/// Convenience queries offered by the search view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPreset {
    /// Lines containing any dash-like character
    SimilarDash,
    /// Reset the search
    Clear,
}

impl SearchPreset {
    /// The query text this preset stands for.
    pub const fn query(self) -> &'static str {
        match self {
            Self::SimilarDash => {
                "re:[-\u{2010}\u{2011}\u{2012}\u{2013}\u{2014}\u{2015}\u{2212}\u{30FC}\u{FF0D}]"
            }
            Self::Clear => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Characters of context on each side of the match start
    pub context_chars: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            context_chars: DEFAULT_CONTEXT_CHARS,
        }
    }
}

/// One search hit rendered as a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Context before the match (prefixed with an ellipsis when cut)
    pub left: String,
    /// The matched text; empty for pattern queries
    pub target: String,
    /// Context after the match (suffixed with an ellipsis when cut)
    pub right: String,
    pub is_highlighted: bool,
    pub line_index: usize,
    pub anchor: String,
}

impl SearchMatch {
    /// The whole snippet as plain text.
    pub fn snippet(&self) -> String {
        format!("{}{}{}", self.left, self.target, self.right)
    }
}

/// Search every line of `index` with the default options.
///
/// Malformed patterns yield no matches.
pub fn search(index: &StructureIndex, query: &str) -> Vec<SearchMatch> {
    search_with(index, query, SearchOptions::default())
}

/// Search every line of `index`, returning matches ordered by line.
pub fn search_with(index: &StructureIndex, query: &str, options: SearchOptions) -> Vec<SearchMatch> {
    let parsed = match SearchQuery::parse(query) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(%err, "search pattern rejected");
            crate::perf::log_event("search.invalid", err.to_string());
            return Vec::new();
        }
    };
    find_matches(index, &parsed, options)
}

/// Search every line of `index` with an already parsed query.
pub fn find_matches(
    index: &StructureIndex,
    query: &SearchQuery,
    options: SearchOptions,
) -> Vec<SearchMatch> {
    if query.is_empty() {
        return Vec::new();
    }
    let _scope = crate::perf::scope("search.find_matches");

    let mut matches: Vec<SearchMatch> = index
        .iter_flat()
        .filter_map(|entry| {
            let (start, end) = query.find(&entry.text)?;
            Some(snippet_for(entry, start, end, options.context_chars))
        })
        .collect();
    matches.sort_by_key(|m| m.line_index);

    crate::perf::log_event("search.done", format!("matches={}", matches.len()));
    matches
}

/// Build the snippet for a match spanning bytes `start..end` of the entry text.
fn snippet_for(entry: &LineEntry, start: usize, end: usize, context: usize) -> SearchMatch {
    let text = entry.text.as_str();
    let total_chars = text.chars().count();
    let start_char = text[..start].chars().count();
    let end_char = start_char + text[start..end].chars().count();

    let left_char = start_char.saturating_sub(context);
    let right_char = total_chars.min(start_char + context).max(end_char);

    let mut left = String::new();
    if left_char > 0 {
        left.push_str(ELLIPSIS);
    }
    left.push_str(&text[byte_offset(text, left_char)..start]);

    let mut right = text[end..byte_offset(text, right_char)].to_string();
    if right_char < total_chars {
        right.push_str(ELLIPSIS);
    }

    SearchMatch {
        left,
        target: text[start..end].to_string(),
        right,
        is_highlighted: end > start,
        line_index: entry.index,
        anchor: entry.anchor.clone(),
    }
}

fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(offset, _)| offset)
}
