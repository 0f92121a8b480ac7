//! Editor session: the boundary between a text host and the tagging engine.
//!
//! A [`NoteSession`] accepts raw text on every change, lets the
//! [`UpdateScheduler`] decide when that text is stable, re-indexes stable text
//! and publishes the result into its [`StructureSlot`]. Hosts read the slot
//! (or call [`NoteSession::search`] / [`NoteSession::bucket`]) to drive list
//! and search views, and may subscribe [`StructureListener`]s for push
//! notifications.

use crate::scheduler::{SchedulerConfig, UpdateScheduler};
use crate::search::{SearchMatch, SearchOptions, search_with};
use crate::structure::{
    DisplayLine, LineEntry, StructureIndex, TagKind, ViewMode, anchor_for, build_index,
    parse_anchor,
};

/// Anchor prefix used when none is configured.
pub const DEFAULT_ANCHOR_PREFIX: &str = "link";

/// Receives every freshly published structure index.
pub trait StructureListener {
    /// Called after a commit with the new index and the rendered height hint
    /// (number of display rows).
    fn structure_changed(&mut self, index: &StructureIndex, height_hint: Option<usize>);
}

/// Holder of the latest structure index.
///
/// Written only by the owning session; read by any number of views.
#[derive(Debug, Clone, Default)]
pub struct StructureSlot {
    index: StructureIndex,
    revision: u64,
    height_hint: Option<usize>,
}

impl StructureSlot {
    pub fn index(&self) -> &StructureIndex {
        &self.index
    }

    /// Number of publishes so far; 0 until the first commit.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub const fn height_hint(&self) -> Option<usize> {
        self.height_hint
    }

    fn publish(&mut self, index: StructureIndex, height_hint: Option<usize>) -> u64 {
        self.index = index;
        self.height_hint = height_hint;
        self.revision += 1;
        self.revision
    }
}

/// Summary of a publish, returned to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureUpdate {
    pub revision: u64,
    pub line_count: usize,
    pub page_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub anchor_prefix: String,
    pub scheduler: SchedulerConfig,
    pub search: SearchOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            anchor_prefix: DEFAULT_ANCHOR_PREFIX.to_string(),
            scheduler: SchedulerConfig::default(),
            search: SearchOptions::default(),
        }
    }
}

pub struct NoteSession {
    raw_text: String,
    scheduler: UpdateScheduler,
    anchor_prefix: String,
    search_options: SearchOptions,
    display: Vec<DisplayLine>,
    slot: StructureSlot,
    listeners: Vec<Box<dyn StructureListener>>,
}

impl std::fmt::Debug for NoteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteSession")
            .field("raw_len", &self.raw_text.len())
            .field("anchor_prefix", &self.anchor_prefix)
            .field("revision", &self.slot.revision())
            .field("dirty", &self.scheduler.is_dirty())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl NoteSession {
    /// Start a session at `now_ms` with empty raw and stable text.
    pub fn new(config: SessionConfig, now_ms: u64) -> Self {
        Self {
            raw_text: String::new(),
            scheduler: UpdateScheduler::new(config.scheduler, now_ms),
            anchor_prefix: config.anchor_prefix,
            search_options: config.search,
            display: Vec::new(),
            slot: StructureSlot::default(),
            listeners: Vec::new(),
        }
    }

    /// Register a push listener.
    pub fn subscribe(&mut self, listener: Box<dyn StructureListener>) {
        self.listeners.push(listener);
    }

    /// Record a raw text change. Never indexes.
    pub fn on_text_changed(&mut self, raw_text: impl Into<String>, now_ms: u64) {
        self.raw_text = raw_text.into();
        self.scheduler.record_edit(now_ms);
        crate::perf::log_event(
            "session.edit",
            format!("now_ms={now_ms} len={}", self.raw_text.len()),
        );
    }

    /// Advance the tick clock and commit when the scheduler allows it.
    pub fn poll(&mut self, now_ms: u64) -> Option<StructureUpdate> {
        if self.scheduler.poll_timer(now_ms) {
            crate::perf::log_event(
                "session.tick",
                format!("now_ms={now_ms} dirty={}", self.scheduler.is_dirty()),
            );
        }
        let committed = self.scheduler.evaluate(now_ms, &self.raw_text)?.to_owned();
        Some(self.publish(&committed))
    }

    /// Commit the current raw text immediately.
    pub fn flush(&mut self) -> StructureUpdate {
        let committed = self.scheduler.flush(&self.raw_text).to_owned();
        self.publish(&committed)
    }

    fn publish(&mut self, stable: &str) -> StructureUpdate {
        let (index, display) = build_index(stable, &self.anchor_prefix);
        let height_hint = Some(display.len());
        let page_count = index.page_count();
        self.display = display;
        for listener in &mut self.listeners {
            listener.structure_changed(&index, height_hint);
        }
        let revision = self.slot.publish(index, height_hint);

        tracing::debug!(revision, lines = self.display.len(), "structure published");
        StructureUpdate {
            revision,
            line_count: self.display.len(),
            page_count,
        }
    }

    pub fn slot(&self) -> &StructureSlot {
        &self.slot
    }

    pub fn index(&self) -> &StructureIndex {
        self.slot.index()
    }

    /// Display lines of the last published pass.
    pub fn display_lines(&self) -> &[DisplayLine] {
        &self.display
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn stable_text(&self) -> &str {
        self.scheduler.stable_text()
    }

    /// Raw text has changes that are not indexed yet.
    pub const fn is_dirty(&self) -> bool {
        self.scheduler.is_dirty()
    }

    pub fn anchor_prefix(&self) -> &str {
        &self.anchor_prefix
    }

    pub const fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    /// Search the published index.
    pub fn search(&self, query: &str) -> Vec<SearchMatch> {
        search_with(self.slot.index(), query, self.search_options)
    }

    /// Entries of one tag bucket, in line order.
    pub fn bucket(&self, tag: TagKind) -> &[LineEntry] {
        self.slot.index().bucket(tag)
    }

    /// Entries listed by a side-panel view mode.
    pub fn view(&self, mode: ViewMode) -> Vec<LineEntry> {
        mode.entries(self.slot.index())
    }

    pub fn anchor_for(&self, line: usize) -> String {
        anchor_for(&self.anchor_prefix, line)
    }

    /// Line number addressed by one of this session's anchors.
    pub fn line_for_anchor(&self, anchor: &str) -> Option<usize> {
        parse_anchor(&self.anchor_prefix, anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<(usize, Option<usize>)>>>,
    }

    impl StructureListener for Recorder {
        fn structure_changed(&mut self, index: &StructureIndex, height_hint: Option<usize>) {
            self.calls.borrow_mut().push((index.len(), height_hint));
        }
    }

    fn session() -> NoteSession {
        NoteSession::new(SessionConfig::default(), 0)
    }

    #[test]
    fn test_text_change_does_not_index() {
        let mut s = session();
        s.on_text_changed("#todo a", 10);
        assert!(s.index().is_empty());
        assert_eq!(s.slot().revision(), 0);
        assert!(s.is_dirty());
    }

    #[test]
    fn test_poll_commits_after_idle_tick() {
        let mut s = session();
        s.on_text_changed("#todo a\nplain", 100);
        assert_eq!(s.poll(500), None);
        let update = s.poll(1_000).unwrap();
        assert_eq!(update.revision, 1);
        assert_eq!(update.line_count, 2);
        assert_eq!(s.bucket(TagKind::Todo).len(), 1);
        assert_eq!(s.stable_text(), "#todo a\nplain");
        assert_eq!(s.slot().height_hint(), Some(2));
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_burst_produces_single_publish() {
        let mut s = session();
        let calls = Rc::new(RefCell::new(Vec::new()));
        s.subscribe(Box::new(Recorder {
            calls: Rc::clone(&calls),
        }));
        s.on_text_changed("a", 0);
        s.on_text_changed("ab", 100);
        s.on_text_changed("abc", 200);
        for now in (300..=3_000).step_by(50) {
            s.poll(now);
        }
        assert_eq!(s.stable_text(), "abc");
        assert_eq!(s.slot().revision(), 1);
        assert_eq!(*calls.borrow(), vec![(1, Some(1))]);
    }

    #[test]
    fn test_flush_publishes_immediately() {
        let mut s = session();
        s.on_text_changed("#p\nx", 0);
        let update = s.flush();
        assert_eq!(update.page_count, 1);
        assert_eq!(s.display_lines()[0].tag, TagKind::Page);
    }

    #[test]
    fn test_search_uses_published_text_only() {
        let mut s = session();
        s.on_text_changed("first", 0);
        s.flush();
        s.on_text_changed("second", 10);
        assert_eq!(s.search("first").len(), 1);
        assert!(s.search("second").is_empty());
    }

    #[test]
    fn test_anchor_round_trip_uses_prefix() {
        let s = NoteSession::new(
            SessionConfig {
                anchor_prefix: "note".to_string(),
                ..SessionConfig::default()
            },
            0,
        );
        assert_eq!(s.anchor_for(7), "note_7");
        assert_eq!(s.line_for_anchor("note_7"), Some(7));
        assert_eq!(s.line_for_anchor("link_7"), None);
    }

    #[test]
    fn test_view_filters_published_index() {
        let mut s = session();
        s.on_text_changed("#todo a\n# c\n#p", 0);
        s.flush();
        assert_eq!(s.view(ViewMode::Todos).len(), 1);
        assert_eq!(s.view(ViewMode::All).len(), 3);
    }
}
