// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. search::SearchQuery)
    clippy::module_name_repetitions
)]

//! # Tagnote
//!
//! A terminal note editor that understands lightweight line tags.
//!
//! A line starting with `#` is a comment, `#p` marks a page break and
//! `#todo` marks a task. Tagnote indexes these lines in the background while
//! you type and offers:
//! - An annotation layer that colors tagged lines
//! - A structure panel listing comments, pages and TODOs
//! - Literal and `re:` pattern search with context snippets
//! - File watching for notes edited elsewhere
//!
//! ## Architecture
//!
//! The engine ([`structure`], [`scheduler`], [`search`], [`session`]) has no
//! terminal dependency. The terminal host uses The Elm Architecture (TEA):
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`structure`]: Line classification and the structure index
//! - [`scheduler`]: Deciding when typed text is stable enough to index
//! - [`search`]: Search functionality
//! - [`session`]: Text in, published structure out
//! - [`editor`]: Text buffer
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`watcher`]: File watching
//! - [`report`]: Headless output

pub mod app;
pub mod config;
pub mod editor;
pub mod perf;
pub mod report;
pub mod scheduler;
pub mod search;
pub mod session;
pub mod structure;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::search::{SearchMatch, SearchPreset, search};
    pub use crate::session::{NoteSession, SessionConfig, StructureListener, StructureSlot};
    pub use crate::structure::{LineEntry, StructureIndex, TagKind, ViewMode, build_index, classify};
}
