//! Side-panel view modes over a structure index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::index::{LineEntry, StructureIndex};
use super::tag::TagKind;

/// What the structure panel lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Comments, page breaks and TODOs together
    #[default]
    All,
    Comments,
    Pages,
    Todos,
    /// Search results instead of a bucket listing
    Search,
}

impl ViewMode {
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Comments,
        Self::Pages,
        Self::Todos,
        Self::Search,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Comments => "Comments",
            Self::Pages => "Pages",
            Self::Todos => "TODOs",
            Self::Search => "Search",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Comments,
            Self::Comments => Self::Pages,
            Self::Pages => Self::Todos,
            Self::Todos => Self::Search,
            Self::Search => Self::All,
        }
    }

    pub const fn prev(self) -> Self {
        match self {
            Self::All => Self::Search,
            Self::Comments => Self::All,
            Self::Pages => Self::Comments,
            Self::Todos => Self::Pages,
            Self::Search => Self::Todos,
        }
    }

    /// Entries shown by this mode, sorted by line.
    ///
    /// `Search` lists nothing here; its rows come from the search engine.
    pub fn entries(self, index: &StructureIndex) -> Vec<LineEntry> {
        let mut entries: Vec<LineEntry> = self
            .tags()
            .iter()
            .flat_map(|tag| index.bucket(*tag).iter().cloned())
            .collect();
        entries.sort_by_key(|entry| entry.index);
        entries
    }

    /// Number of entries [`entries`](Self::entries) would return.
    pub fn count(self, index: &StructureIndex) -> usize {
        self.tags().iter().map(|tag| index.bucket(*tag).len()).sum()
    }

    const fn tags(self) -> &'static [TagKind] {
        match self {
            Self::All => &[TagKind::Comment, TagKind::Page, TagKind::Todo],
            Self::Comments => &[TagKind::Comment],
            Self::Pages => &[TagKind::Page],
            Self::Todos => &[TagKind::Todo],
            Self::Search => &[],
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "comments" | "comment" => Ok(Self::Comments),
            "pages" | "page" => Ok(Self::Pages),
            "todos" | "todo" => Ok(Self::Todos),
            "search" => Ok(Self::Search),
            other => Err(format!("unknown view mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::build_index;

    const NOTE: &str = "intro\n#todo a\n# remark\n#p\n#todo b\nplain";

    fn lines(entries: &[LineEntry]) -> Vec<usize> {
        entries.iter().map(|e| e.index).collect()
    }

    #[test]
    fn test_all_merges_tagged_lines_in_order() {
        let (index, _) = build_index(NOTE, "link");
        assert_eq!(lines(&ViewMode::All.entries(&index)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_single_bucket_modes() {
        let (index, _) = build_index(NOTE, "link");
        assert_eq!(lines(&ViewMode::Comments.entries(&index)), vec![2]);
        assert_eq!(lines(&ViewMode::Pages.entries(&index)), vec![3]);
        assert_eq!(lines(&ViewMode::Todos.entries(&index)), vec![1, 4]);
        assert!(ViewMode::Search.entries(&index).is_empty());
    }

    #[test]
    fn test_count_matches_entries() {
        let (index, _) = build_index(NOTE, "link");
        for mode in ViewMode::ALL {
            assert_eq!(mode.count(&index), mode.entries(&index).len(), "{mode}");
        }
        assert_eq!(ViewMode::All.count(&index), 4);
    }

    #[test]
    fn test_cycle_visits_every_mode() {
        let mut mode = ViewMode::All;
        for expected in ViewMode::ALL.iter().skip(1) {
            mode = mode.next();
            assert_eq!(mode, *expected);
        }
        assert_eq!(mode.next(), ViewMode::All);
        assert_eq!(ViewMode::All.prev(), ViewMode::Search);
    }

    #[test]
    fn test_parse_accepts_singular_and_plural() {
        assert_eq!("todo".parse::<ViewMode>(), Ok(ViewMode::Todos));
        assert_eq!("Pages".parse::<ViewMode>(), Ok(ViewMode::Pages));
        assert!("headings".parse::<ViewMode>().is_err());
    }
}
