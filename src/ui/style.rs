//! Colors for the annotation layer and the structure panel.
//!
//! Backgrounds use indexed ANSI colors so tagged rows stay readable on both
//! light and dark terminal themes.

use ratatui::style::{Color, Modifier, Style};

use crate::structure::TagKind;

const COMMENT_BG: Color = Color::Indexed(238);
const TODO_BG: Color = Color::Indexed(94);

/// Row style of an editor line carrying `tag`.
pub fn style_for_tag(tag: TagKind) -> Style {
    match tag {
        TagKind::None => Style::default(),
        TagKind::Comment => Style::default().bg(COMMENT_BG),
        TagKind::Page => Style::default()
            .bg(COMMENT_BG)
            .add_modifier(Modifier::DIM),
        TagKind::Todo => Style::default().bg(TODO_BG).fg(Color::White),
    }
}

/// Foreground for a tag's marker in the panel.
pub const fn tag_color(tag: TagKind) -> Color {
    match tag {
        TagKind::None => Color::Reset,
        TagKind::Comment => Color::Cyan,
        TagKind::Page => Color::Magenta,
        TagKind::Todo => Color::Yellow,
    }
}

/// Short marker shown before a panel entry.
pub const fn tag_marker(tag: TagKind) -> &'static str {
    match tag {
        TagKind::None => " ",
        TagKind::Comment => "#",
        TagKind::Page => "P",
        TagKind::Todo => "T",
    }
}

/// Page-break hint drawn at the right edge of a page row.
pub fn page_hint_style() -> Style {
    Style::default()
        .fg(Color::Indexed(245))
        .add_modifier(Modifier::ITALIC)
}

/// Search target inside a snippet.
pub fn match_highlight_style() -> Style {
    Style::default().bg(Color::Yellow).fg(Color::Black)
}

pub fn gutter_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn context_style() -> Style {
    Style::default().fg(Color::Indexed(245))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_are_unstyled() {
        assert_eq!(style_for_tag(TagKind::None), Style::default());
    }

    #[test]
    fn test_tagged_lines_have_backgrounds() {
        for tag in [TagKind::Comment, TagKind::Page, TagKind::Todo] {
            assert!(style_for_tag(tag).bg.is_some(), "{tag:?} should have a background");
        }
        assert_ne!(
            style_for_tag(TagKind::Todo).bg,
            style_for_tag(TagKind::Comment).bg
        );
    }

    #[test]
    fn test_page_rows_are_dimmed() {
        assert!(
            style_for_tag(TagKind::Page)
                .add_modifier
                .contains(Modifier::DIM)
        );
    }
}
