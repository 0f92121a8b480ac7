//! Reloading the note file when another process changes it.
//!
//! Uses the notify crate for cross-platform file system events.
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Trailing-edge debounce for bursts of file events.
#[derive(Debug, Clone, Copy)]
struct ReloadDebounce {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl ReloadDebounce {
    const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    const fn note_event(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    fn take_ready(&mut self, now: Instant) -> bool {
        let Some(since) = self.pending_since else {
            return false;
        };
        if now.saturating_duration_since(since) >= self.delay {
            self.pending_since = None;
            return true;
        }
        false
    }
}

/// Watches the note file and hands back its new contents after a change.
pub struct NoteWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    watch_root: PathBuf,
    target_path: PathBuf,
    target_name: Option<OsString>,
    debounce: ReloadDebounce,
    last_contents: Option<String>,
}

impl NoteWatcher {
    /// Create a watcher for `path`.
    ///
    /// # Errors
    /// Returns an error if the file watcher cannot be created or the path cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // Event paths from the OS are canonical
        let target_path = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let target_name = target_path.file_name().map(std::ffi::OsStr::to_os_string);
        let watch_root = watch_root_for(&target_path);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            watch_root,
            target_path,
            target_name,
            debounce: ReloadDebounce::new(debounce),
            last_contents: None,
        })
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Remember `contents` as what the host already shows, so a change
    /// event that leaves the file identical does not trigger a reload.
    pub fn set_known_contents(&mut self, contents: impl Into<String>) {
        self.last_contents = Some(contents.into());
    }

    /// Returns true once a debounced file change is ready.
    pub fn take_change_ready(&mut self, now: Instant) -> bool {
        let mut relevant = 0u32;
        let mut total = 0u32;
        while let Ok(event) = self.rx.try_recv() {
            total += 1;
            match event {
                Ok(ev) if self.is_relevant(&ev) => relevant += 1,
                Ok(ev) => {
                    crate::perf::log_event(
                        "watcher.irrelevant",
                        format!("kind={:?} paths={:?}", ev.kind, ev.paths),
                    );
                }
                Err(err) => {
                    tracing::warn!(%err, "file watcher error");
                    crate::perf::log_event("watcher.error", err.to_string());
                }
            }
        }

        if total > 0 {
            crate::perf::log_event(
                "watcher.poll",
                format!(
                    "total={total} relevant={relevant} target={}",
                    self.target_path.display()
                ),
            );
        }
        if relevant > 0 {
            self.debounce.note_event(now);
        }
        self.debounce.take_ready(now)
    }

    /// New file contents after a debounced change, or `None` when nothing
    /// changed. Read failures are logged and skipped.
    pub fn poll_reload(&mut self, now: Instant) -> Option<String> {
        if !self.take_change_ready(now) {
            return None;
        }
        let contents = match fs::read_to_string(&self.target_path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!(path = %self.target_path.display(), %err, "reload failed");
                return None;
            }
        };
        if self.last_contents.as_deref() == Some(contents.as_str()) {
            return None;
        }
        self.last_contents = Some(contents.clone());
        tracing::info!(path = %self.target_path.display(), "note reloaded");
        Some(contents)
    }

    fn is_relevant(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.watch_root
                || path == &self.target_path
                || self
                    .target_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

fn watch_root_for(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use tempfile::tempdir;

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debounce = ReloadDebounce::new(Duration::from_millis(200));
        assert!(!debounce.take_ready(start));

        debounce.note_event(start);
        assert!(!debounce.take_ready(start + Duration::from_millis(100)));
        debounce.note_event(start + Duration::from_millis(150));
        assert!(!debounce.take_ready(start + Duration::from_millis(300)));
        assert!(debounce.take_ready(start + Duration::from_millis(350)));
        assert!(!debounce.take_ready(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_directory_level_event_is_relevant_for_watched_file() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("notes.txt");
        std::fs::write(&path, "#todo").expect("write");
        let watcher = NoteWatcher::new(&path, Duration::from_millis(10)).expect("watcher");

        let event = Event {
            kind: EventKind::Any,
            paths: vec![canonical_dir],
            attrs: notify::event::EventAttributes::new(),
        };
        assert!(watcher.is_relevant(&event));
    }

    #[test]
    fn test_sibling_file_event_is_irrelevant() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("notes.txt");
        std::fs::write(&path, "").expect("write");
        let watcher = NoteWatcher::new(&path, Duration::from_millis(10)).expect("watcher");

        let event = Event {
            kind: EventKind::Any,
            paths: vec![canonical_dir.join("other.txt")],
            attrs: notify::event::EventAttributes::new(),
        };
        assert!(!watcher.is_relevant(&event));
    }

    #[test]
    fn test_watch_root_for_relative_file_is_dot() {
        let root = watch_root_for(Path::new("notes.txt"));
        assert_eq!(root, PathBuf::from("."));
    }

    #[test]
    fn test_real_file_modification_is_reloaded() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("watched.txt");
        std::fs::write(&path, "original").expect("write");

        let mut watcher = NoteWatcher::new(&path, Duration::from_millis(50)).expect("watcher");
        watcher.set_known_contents("original");

        // Give the backend time to register the watch
        std::thread::sleep(Duration::from_millis(500));
        std::fs::write(&path, "#todo modified").expect("write");

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut reloaded = None;
        while Instant::now() < deadline {
            if let Some(contents) = watcher.poll_reload(Instant::now()) {
                reloaded = Some(contents);
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }

        assert_eq!(reloaded.as_deref(), Some("#todo modified"));
    }
}
