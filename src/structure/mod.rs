//! Line tagging and structure indexing.
//!
//! This module handles:
//! - Classifying each line into a [`TagKind`]
//! - Building the [`StructureIndex`] (tag → ordered lines) and display lines
//! - Filtering the index for the side panel ([`ViewMode`])

mod index;
mod tag;
mod view;

pub use index::{
    DisplayLine, LineEntry, StructureIndex, anchor_for, build_index, page_marker, parse_anchor,
};
pub use tag::{TagKind, classify};
pub use view::ViewMode;
