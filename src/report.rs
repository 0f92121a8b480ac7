//! Headless output for `--print` and `--search`.
//!
//! Text output is one line per entry; JSON output goes through `serde_json`.

use serde::Serialize;

use crate::search::SearchMatch;
use crate::structure::{LineEntry, StructureIndex, TagKind, ViewMode};

/// A view entry together with the bucket it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedEntry {
    pub tag: TagKind,
    #[serde(flatten)]
    pub entry: LineEntry,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewReport {
    pub view: ViewMode,
    pub line_count: usize,
    pub page_count: usize,
    pub entries: Vec<TaggedEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub matches: Vec<SearchMatch>,
}

impl ViewReport {
    pub fn new(index: &StructureIndex, view: ViewMode) -> Self {
        let entries = view
            .entries(index)
            .into_iter()
            .map(|entry| TaggedEntry {
                tag: index
                    .entry_at(entry.index)
                    .map_or(TagKind::None, |(tag, _)| tag),
                entry,
            })
            .collect();
        Self {
            view,
            line_count: index.len(),
            page_count: index.page_count(),
            entries,
        }
    }

    /// One `line  tag  text` row per entry, lines numbered from 1.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                format!(
                    "{:>5}  {:<7} {}\n",
                    e.entry.index + 1,
                    e.tag.label(),
                    e.entry.text
                )
            })
            .collect()
    }
}

impl SearchReport {
    pub fn new(query: impl Into<String>, matches: Vec<SearchMatch>) -> Self {
        Self {
            query: query.into(),
            matches,
        }
    }

    /// One `line  snippet` row per match, the target wrapped in brackets.
    pub fn to_text(&self) -> String {
        self.matches
            .iter()
            .map(|m| {
                let target = if m.is_highlighted {
                    format!("[{}]", m.target)
                } else {
                    m.target.clone()
                };
                format!("{:>5}  {}{}{}\n", m.line_index + 1, m.left, target, m.right)
            })
            .collect()
    }
}
