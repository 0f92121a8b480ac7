use crate::app::Model;
use crate::app::model::Focus;
use crate::editor::Direction;
use crate::search::SearchPreset;
use crate::structure::ViewMode;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Clock tick: forward edits to the session and let it commit
    Tick(u64),

    // Editor
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert pasted text at the cursor
    InsertText(String),
    /// Split line at cursor (Enter)
    SplitLine,
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Delete character at cursor (Delete)
    DeleteForward,
    MoveCursor(Direction),
    MoveHome,
    MoveEnd,
    MoveWordLeft,
    MoveWordRight,
    /// Move cursor to start of buffer (Ctrl+Home)
    MoveToStart,
    /// Move cursor to end of buffer (Ctrl+End)
    MoveToEnd,
    PageUp,
    PageDown,

    // Structure panel
    /// Switch focus between editor and panel
    SwitchFocus,
    PanelUp,
    PanelDown,
    /// Jump the editor to the selected panel row
    PanelSelect,
    SetViewMode(ViewMode),
    NextViewMode,
    PrevViewMode,

    // Search
    /// Start typing a search query
    StartSearch,
    /// Replace the search query
    SearchInput(String),
    /// Stop typing, keep the results
    SubmitSearch,
    ApplyPreset(SearchPreset),
    ClearSearch,

    // Host
    /// The note file changed on disk
    FileReloaded(String),
    ToggleHelp,
    HideHelp,
    Resize(u16, u16),
    Quit,
}

/// Update the model in response to a message.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Tick(now_ms) => {
            if model.sync_session(now_ms) {
                crate::perf::log_event("app.edit.forwarded", format!("now_ms={now_ms}"));
            }
            if let Some(update) = model.session.poll(now_ms) {
                crate::perf::log_event(
                    "app.commit",
                    format!(
                        "revision={} lines={} pages={}",
                        update.revision, update.line_count, update.page_count
                    ),
                );
            }
            if model.search_is_stale() {
                model.refresh_search();
            }
            model.clamp_panel_selection();
        }

        Message::InsertChar(ch) => edit(&mut model, |b| b.insert_char(ch)),
        Message::InsertText(text) => edit(&mut model, |b| b.insert_str(&text)),
        Message::SplitLine => edit(&mut model, crate::editor::EditorBuffer::split_line),
        Message::DeleteBack => {
            if model.buffer.delete_back() {
                model.modified = true;
            }
            model.ensure_cursor_visible();
        }
        Message::DeleteForward => {
            if model.buffer.delete_forward() {
                model.modified = true;
            }
        }
        Message::MoveCursor(direction) => {
            model.buffer.move_cursor(direction);
            model.ensure_cursor_visible();
        }
        Message::MoveHome => model.buffer.move_home(),
        Message::MoveEnd => model.buffer.move_end(),
        Message::MoveWordLeft => {
            model.buffer.move_word_left();
            model.ensure_cursor_visible();
        }
        Message::MoveWordRight => {
            model.buffer.move_word_right();
            model.ensure_cursor_visible();
        }
        Message::MoveToStart => {
            model.buffer.move_to_start();
            model.ensure_cursor_visible();
        }
        Message::MoveToEnd => {
            model.buffer.move_to_end();
            model.ensure_cursor_visible();
        }
        Message::PageUp => {
            let page = model.editor_height.max(1);
            let cursor = model.buffer.cursor();
            model.buffer.move_to(cursor.line.saturating_sub(page), cursor.col);
            model.editor_scroll_offset = model.editor_scroll_offset.saturating_sub(page);
            model.ensure_cursor_visible();
        }
        Message::PageDown => {
            let page = model.editor_height.max(1);
            let cursor = model.buffer.cursor();
            model.buffer.move_to(cursor.line + page, cursor.col);
            let max_offset = model.buffer.line_count().saturating_sub(page);
            model.editor_scroll_offset = (model.editor_scroll_offset + page).min(max_offset);
            model.ensure_cursor_visible();
        }
        Message::SwitchFocus => {
            model.focus = match model.focus {
                Focus::Editor => Focus::Panel,
                Focus::Panel => Focus::Editor,
            };
            model.search_active = false;
        }
        Message::PanelUp => {
            model.panel_selected = model.panel_selected.saturating_sub(1);
            ensure_panel_visible(&mut model);
        }
        Message::PanelDown => {
            let last = model.panel_len().saturating_sub(1);
            model.panel_selected = (model.panel_selected + 1).min(last);
            ensure_panel_visible(&mut model);
        }
        Message::PanelSelect => {
            if let Some(row) = model.selected_row() {
                let anchor = row.anchor().to_string();
                if !model.jump_to_anchor(&anchor) {
                    tracing::debug!(%anchor, "panel anchor did not resolve");
                }
            }
        }
        Message::SetViewMode(mode) => set_view_mode(&mut model, mode),
        Message::NextViewMode => {
            let mode = model.view_mode.next();
            set_view_mode(&mut model, mode);
        }
        Message::PrevViewMode => {
            let mode = model.view_mode.prev();
            set_view_mode(&mut model, mode);
        }

        Message::StartSearch => {
            model.search_active = true;
            model.focus = Focus::Panel;
            set_view_mode(&mut model, ViewMode::Search);
        }
        Message::SearchInput(query) => {
            model.search_query = query;
            model.panel_selected = 0;
            model.panel_scroll_offset = 0;
            model.refresh_search();
        }
        Message::SubmitSearch => model.search_active = false,
        Message::ApplyPreset(preset) => {
            model.search_query = preset.query().to_string();
            model.search_active = false;
            model.panel_selected = 0;
            model.panel_scroll_offset = 0;
            set_view_mode(&mut model, ViewMode::Search);
            model.refresh_search();
        }
        Message::ClearSearch => {
            model.search_query.clear();
            model.search_active = false;
            model.refresh_search();
        }

        // Local edits win over the file on disk
        Message::FileReloaded(text) => {
            if !model.modified {
                model.buffer.replace_text(&text);
                model.ensure_cursor_visible();
            }
        }
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model.editor_height = usize::from(crate::ui::editor_text_height(
                height,
                crate::ui::footer_bar_visible(&model),
            ));
            model.ensure_cursor_visible();
            ensure_panel_visible(&mut model);
        }
        Message::Quit => model.should_quit = true,
    }
    model
}

fn edit(model: &mut Model, op: impl FnOnce(&mut crate::editor::EditorBuffer)) {
    op(&mut model.buffer);
    model.modified = true;
    model.ensure_cursor_visible();
}

fn set_view_mode(model: &mut Model, mode: ViewMode) {
    if model.view_mode != mode {
        model.view_mode = mode;
        model.panel_selected = 0;
        model.panel_scroll_offset = 0;
    }
    model.clamp_panel_selection();
}

fn ensure_panel_visible(model: &mut Model) {
    let rows = usize::from(crate::ui::panel_visible_rows(
        model.terminal_size.1,
        crate::ui::footer_bar_visible(model),
    ));
    model.ensure_panel_selection_visible(rows);
}
