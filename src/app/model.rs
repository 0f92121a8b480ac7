use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::editor::EditorBuffer;
use crate::search::{SearchMatch, SearchQuery};
use crate::session::{NoteSession, SessionConfig};
use crate::structure::{LineEntry, ViewMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Panel,
}

/// One row of the structure panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelRow {
    Entry(LineEntry),
    Match(SearchMatch),
}

impl PanelRow {
    pub fn anchor(&self) -> &str {
        match self {
            Self::Entry(entry) => &entry.anchor,
            Self::Match(m) => &m.anchor,
        }
    }

    pub const fn line_index(&self) -> usize {
        match self {
            Self::Entry(entry) => entry.index,
            Self::Match(m) => m.line_index,
        }
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Text being edited
    pub buffer: EditorBuffer,
    /// Tagging engine fed from the buffer
    pub session: NoteSession,
    /// Buffer revision last forwarded to the session
    pub(super) synced_revision: u64,
    /// Note file, if any (`None` for stdin or a scratch note)
    pub file_path: Option<PathBuf>,
    /// First editor line shown
    pub editor_scroll_offset: usize,
    /// Rows available to the editor text
    pub editor_height: usize,
    /// Terminal size
    pub terminal_size: (u16, u16),
    pub focus: Focus,
    pub view_mode: ViewMode,
    /// Selected panel row
    pub panel_selected: usize,
    /// First panel row shown
    pub panel_scroll_offset: usize,
    /// Search query text (without the leading `/`)
    pub search_query: String,
    /// Whether keystrokes currently go to the search bar
    pub search_active: bool,
    /// Results of `search_query` against the published index
    pub search_results: Vec<SearchMatch>,
    /// Why the current query yields nothing, if it is malformed
    pub search_error: Option<String>,
    /// Slot revision the search results were computed against
    pub(super) search_revision: u64,
    pub watch_enabled: bool,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    pub help_visible: bool,
    /// Edited since the note was loaded. File reloads are skipped while set.
    pub modified: bool,
    toast: Option<Toast>,
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("focus", &self.focus)
            .field("view_mode", &self.view_mode)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        let session = NoteSession::new(SessionConfig::default(), 0);
        Self::from_parts(EditorBuffer::empty(), session, (80, 24))
    }
}

impl Model {
    /// Create a model editing `buffer`. The buffer's text is indexed right
    /// away so the annotation layer is populated on the first frame.
    pub fn new(buffer: EditorBuffer, config: SessionConfig, terminal_size: (u16, u16)) -> Self {
        let mut session = NoteSession::new(config, 0);
        session.on_text_changed(buffer.text(), 0);
        session.flush();
        Self::from_parts(buffer, session, terminal_size)
    }

    fn from_parts(buffer: EditorBuffer, session: NoteSession, terminal_size: (u16, u16)) -> Self {
        Self {
            synced_revision: buffer.revision(),
            buffer,
            session,
            file_path: None,
            editor_scroll_offset: 0,
            editor_height: usize::from(crate::ui::editor_text_height(terminal_size.1, false)),
            terminal_size,
            focus: Focus::Editor,
            view_mode: ViewMode::default(),
            panel_selected: 0,
            panel_scroll_offset: 0,
            search_query: String::new(),
            search_active: false,
            search_results: Vec::new(),
            search_error: None,
            search_revision: 0,
            watch_enabled: false,
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            modified: false,
            toast: None,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn with_file_path(mut self, path: Option<PathBuf>) -> Self {
        self.file_path = path;
        self
    }

    #[must_use]
    pub const fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = mode;
        self
    }

    /// Forward buffer edits to the session, stamped `now_ms`.
    ///
    /// Returns true if the session saw new text.
    pub(super) fn sync_session(&mut self, now_ms: u64) -> bool {
        if self.buffer.revision() == self.synced_revision {
            return false;
        }
        self.synced_revision = self.buffer.revision();
        self.session.on_text_changed(self.buffer.text(), now_ms);
        true
    }

    /// Recompute search results against the published index.
    pub(super) fn refresh_search(&mut self) {
        self.search_revision = self.session.slot().revision();
        self.search_error = SearchQuery::parse(&self.search_query)
            .err()
            .map(|err| err.to_string().split_whitespace().collect::<Vec<_>>().join(" "));
        self.search_results = self.session.search(&self.search_query);
        self.clamp_panel_selection();
    }

    /// Whether the results predate the current published index.
    pub(super) fn search_is_stale(&self) -> bool {
        self.search_revision != self.session.slot().revision()
    }

    /// Rows listed in the panel for the current view mode.
    pub fn panel_rows(&self) -> Vec<PanelRow> {
        match self.view_mode {
            ViewMode::Search => self
                .search_results
                .iter()
                .cloned()
                .map(PanelRow::Match)
                .collect(),
            mode => self
                .session
                .view(mode)
                .into_iter()
                .map(PanelRow::Entry)
                .collect(),
        }
    }

    pub fn panel_len(&self) -> usize {
        match self.view_mode {
            ViewMode::Search => self.search_results.len(),
            mode => mode.count(self.session.index()),
        }
    }

    pub fn selected_row(&self) -> Option<PanelRow> {
        self.panel_rows().into_iter().nth(self.panel_selected)
    }

    pub(super) fn clamp_panel_selection(&mut self) {
        let len = self.panel_len();
        self.panel_selected = self.panel_selected.min(len.saturating_sub(1));
        self.panel_scroll_offset = self.panel_scroll_offset.min(self.panel_selected);
    }

    /// Keep the selected panel row inside `visible_rows`.
    pub(super) const fn ensure_panel_selection_visible(&mut self, visible_rows: usize) {
        if visible_rows == 0 {
            return;
        }
        if self.panel_selected < self.panel_scroll_offset {
            self.panel_scroll_offset = self.panel_selected;
        } else if self.panel_selected >= self.panel_scroll_offset + visible_rows {
            self.panel_scroll_offset = self.panel_selected + 1 - visible_rows;
        }
    }

    /// Scroll the editor so the cursor row is visible.
    pub(super) fn ensure_cursor_visible(&mut self) {
        let line = self.buffer.cursor().line;
        let height = self.editor_height.max(1);
        if line < self.editor_scroll_offset {
            self.editor_scroll_offset = line;
        } else if line >= self.editor_scroll_offset + height {
            self.editor_scroll_offset = line + 1 - height;
        }
    }

    /// Move the cursor to the line an anchor names and focus the editor.
    pub(super) fn jump_to_anchor(&mut self, anchor: &str) -> bool {
        let Some(line) = self.session.line_for_anchor(anchor) else {
            return false;
        };
        self.buffer.move_to(line, 0);
        self.focus = Focus::Editor;
        let height = self.editor_height.max(1);
        self.editor_scroll_offset = line.saturating_sub(height / 3);
        self.ensure_cursor_visible();
        true
    }

    pub fn file_name(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map_or_else(
                || "untitled".to_string(),
                |s| s.to_string_lossy().to_string(),
            )
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}
