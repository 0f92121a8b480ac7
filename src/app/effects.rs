use std::path::Path;
use std::time::Duration;

use crate::app::{Message, Model, ToastLevel};
use crate::watcher::NoteWatcher;

/// Delay between the last file event and a reload.
const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);

pub(super) fn make_note_watcher(path: &Path, contents: &str) -> notify::Result<NoteWatcher> {
    let mut watcher = NoteWatcher::new(path, WATCH_DEBOUNCE)?;
    watcher.set_known_contents(contents);
    Ok(watcher)
}

/// Perform the side effects a message implies after `update` has run.
pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
    if let Message::FileReloaded(contents) = msg {
        crate::perf::log_event(
            "app.reload",
            format!("len={} kept_edits={}", contents.len(), model.modified),
        );
        if model.modified {
            model.show_toast(
                ToastLevel::Warning,
                "File changed on disk, keeping unsaved edits",
            );
        } else {
            model.show_toast(ToastLevel::Info, "Reloaded from disk");
        }
    }
}
