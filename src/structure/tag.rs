//! Line classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The tag assigned to a single line.
///
/// Every line carries exactly one tag. The ordinal order (`None`, `Comment`,
/// `Page`, `Todo`) is the bucket order of a [`super::StructureIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// Plain text
    None,
    /// `#` line that is not a page break or TODO
    Comment,
    /// `#p` page break
    Page,
    /// `#todo` line
    Todo,
}

impl TagKind {
    /// All tag kinds in bucket order.
    pub const ALL: [Self; 4] = [Self::None, Self::Comment, Self::Page, Self::Todo];

    /// Position of this tag's bucket.
    pub const fn ordinal(self) -> usize {
        match self {
            Self::None => 0,
            Self::Comment => 1,
            Self::Page => 2,
            Self::Todo => 3,
        }
    }

    /// Short human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "plain",
            Self::Comment => "comment",
            Self::Page => "page",
            Self::Todo => "todo",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a raw line.
///
/// A line is tagged when it starts with `#` and has at least two characters.
/// The token right after the leading `#` (up to the next `#`, whitespace or
/// byte order mark) selects the tag: `todo` for [`TagKind::Todo`], `p` for
/// [`TagKind::Page`], anything else (including nothing) for
/// [`TagKind::Comment`]. Matching is case-insensitive.
///
/// # Example
///
/// ```
/// use tagnote::structure::{classify, TagKind};
///
/// assert_eq!(classify("#todo buy milk"), TagKind::Todo);
/// assert_eq!(classify("#P"), TagKind::Page);
/// assert_eq!(classify("# note"), TagKind::Comment);
/// assert_eq!(classify("plain"), TagKind::None);
/// ```
pub fn classify(line: &str) -> TagKind {
    if line.chars().count() < 2 {
        return TagKind::None;
    }
    if !line.starts_with('#') {
        return TagKind::None;
    }

    let mut tokens = line.split(is_token_separator);
    // The leading '#' always yields an empty first token.
    let (Some(_), Some(second)) = (tokens.next(), tokens.next()) else {
        return TagKind::Comment;
    };

    match second.to_uppercase().as_str() {
        "TODO" => TagKind::Todo,
        "P" => TagKind::Page,
        _ => TagKind::Comment,
    }
}

/// `#` or a whitespace character. The byte order mark separates tokens and
/// NEL does not.
fn is_token_separator(c: char) -> bool {
    match c {
        '#' | '\u{FEFF}' => true,
        '\u{85}' => false,
        c => c.is_whitespace(),
    }
}
