//! Structure index construction.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::tag::{TagKind, classify};

/// One classified source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEntry {
    /// Raw line content (never the synthesized page marker)
    pub text: String,
    /// Zero-based line number at classification time
    pub index: usize,
    /// Navigation identifier, `{prefix}_{index}`
    pub anchor: String,
}

impl LineEntry {
    pub fn new(text: impl Into<String>, index: usize, anchor_prefix: &str) -> Self {
        Self {
            text: text.into(),
            index,
            anchor: anchor_for(anchor_prefix, index),
        }
    }
}

/// A line as handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    /// Text to draw: the raw line, a single space for blank lines, or a page marker
    pub text: String,
    /// Tag used to pick the line style
    pub tag: TagKind,
}

/// Tag kind → ordered lines bearing that tag.
///
/// Rebuilt wholesale by [`build_index`]; the four buckets always partition the
/// lines of the buffer that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureIndex {
    buckets: [Vec<LineEntry>; 4],
}

impl StructureIndex {
    /// An index with four empty buckets.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Entries tagged `tag`, in line order.
    pub fn bucket(&self, tag: TagKind) -> &[LineEntry] {
        &self.buckets[tag.ordinal()]
    }

    /// Total number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// All entries, bucket by bucket (not in line order).
    pub fn iter_flat(&self) -> impl Iterator<Item = &LineEntry> {
        self.buckets.iter().flatten()
    }

    /// Look up the entry for a line number.
    pub fn entry_at(&self, line: usize) -> Option<(TagKind, &LineEntry)> {
        TagKind::ALL.into_iter().find_map(|tag| {
            let bucket = self.bucket(tag);
            bucket
                .binary_search_by_key(&line, |entry| entry.index)
                .ok()
                .map(|pos| (tag, &bucket[pos]))
        })
    }

    /// Number of page breaks in the index.
    pub fn page_count(&self) -> usize {
        self.bucket(TagKind::Page).len()
    }

    fn push(&mut self, tag: TagKind, entry: LineEntry) {
        self.buckets[tag.ordinal()].push(entry);
    }
}

impl Serialize for StructureIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for tag in TagKind::ALL {
            map.serialize_entry(&tag, self.bucket(tag))?;
        }
        map.end()
    }
}

/// Build the anchor string for a line.
pub fn anchor_for(prefix: &str, index: usize) -> String {
    format!("{prefix}_{index}")
}

/// Recover the line number from an anchor built with `prefix`.
pub fn parse_anchor(prefix: &str, anchor: &str) -> Option<usize> {
    anchor
        .strip_prefix(prefix)?
        .strip_prefix('_')?
        .parse()
        .ok()
}

/// Display text for the page break that opens page `page`.
pub fn page_marker(page: usize) -> String {
    format!("  (\u{2193} page {page})")
}

/// Split `text` into lines, classify each one and index the results.
///
/// Returns the index together with the display lines for the annotation layer.
/// Only `'\n'` separates lines, so a trailing newline yields a final empty
/// line and `'\r'` stays part of the line text.
///
/// # Example
///
/// ```
/// use tagnote::structure::{build_index, TagKind};
///
/// let (index, display) = build_index("hello\n#p\n#todo fix", "link");
/// assert_eq!(index.bucket(TagKind::Todo)[0].anchor, "link_2");
/// assert_eq!(display.len(), 3);
/// ```
pub fn build_index(text: &str, anchor_prefix: &str) -> (StructureIndex, Vec<DisplayLine>) {
    let _scope = crate::perf::scope("structure.build_index");
    let mut index = StructureIndex::empty();
    let mut display = Vec::new();
    let mut page_number = 1;

    for (i, line) in text.split('\n').enumerate() {
        let entry = LineEntry::new(line, i, anchor_prefix);
        if line.is_empty() {
            index.push(TagKind::None, entry);
            display.push(DisplayLine {
                text: " ".to_string(),
                tag: TagKind::None,
            });
            continue;
        }

        let tag = classify(line);
        index.push(tag, entry);
        let shown = if tag == TagKind::Page {
            page_number += 1;
            page_marker(page_number)
        } else {
            line.to_string()
        };
        display.push(DisplayLine { text: shown, tag });
    }

    crate::perf::log_event(
        "structure.build",
        format!(
            "lines={} comments={} pages={} todos={}",
            display.len(),
            index.bucket(TagKind::Comment).len(),
            index.page_count(),
            index.bucket(TagKind::Todo).len()
        ),
    );
    (index, display)
}
