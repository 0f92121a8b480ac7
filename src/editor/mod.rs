//! Note text buffer.
//!
//! Provides a rope-backed text buffer with cursor management, the source of
//! raw text for a [`crate::session::NoteSession`].

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
