use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::model::Focus;
use crate::app::{Message, Model};
use crate::editor::Direction;
use crate::search::SearchPreset;
use crate::structure::ViewMode;

/// Translate a terminal event into a message.
pub fn handle_event(event: &Event, model: &Model) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(*key, model),
        Event::Paste(text) if model.focus == Focus::Editor && !model.help_visible => {
            Some(Message::InsertText(text.replace("\r\n", "\n")))
        }
        Event::Resize(width, height) => Some(Message::Resize(*width, *height)),
        _ => None,
    }
}

pub fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        match key.code {
            KeyCode::Char('q' | 'c') => return Some(Message::Quit),
            _ => {}
        }
    }
    if model.help_visible {
        return match key.code {
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Esc | KeyCode::Char('q') => Some(Message::HideHelp),
            _ => None,
        };
    }
    match key.code {
        KeyCode::F(1) => return Some(Message::ToggleHelp),
        KeyCode::Tab | KeyCode::BackTab => return Some(Message::SwitchFocus),
        _ => {}
    }

    if model.search_active {
        return handle_search_key(key, model);
    }
    match model.focus {
        Focus::Editor => handle_editor_key(key, ctrl),
        Focus::Panel => handle_panel_key(key),
    }
}

fn handle_search_key(key: KeyEvent, model: &Model) -> Option<Message> {
    match key.code {
        KeyCode::Char(c) => {
            let mut query = model.search_query.clone();
            query.push(c);
            Some(Message::SearchInput(query))
        }
        KeyCode::Backspace => {
            let mut query = model.search_query.clone();
            query.pop();
            Some(Message::SearchInput(query))
        }
        KeyCode::Enter => Some(Message::SubmitSearch),
        KeyCode::Esc => Some(Message::ClearSearch),
        KeyCode::Down => Some(Message::PanelDown),
        KeyCode::Up => Some(Message::PanelUp),
        _ => None,
    }
}

fn handle_editor_key(key: KeyEvent, ctrl: bool) -> Option<Message> {
    match key.code {
        KeyCode::Char(c) if !ctrl => Some(Message::InsertChar(c)),
        KeyCode::Enter => Some(Message::SplitLine),
        KeyCode::Backspace => Some(Message::DeleteBack),
        KeyCode::Delete => Some(Message::DeleteForward),
        KeyCode::Left if ctrl => Some(Message::MoveWordLeft),
        KeyCode::Right if ctrl => Some(Message::MoveWordRight),
        KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
        KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
        KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
        KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
        KeyCode::Home if ctrl => Some(Message::MoveToStart),
        KeyCode::End if ctrl => Some(Message::MoveToEnd),
        KeyCode::Home => Some(Message::MoveHome),
        KeyCode::End => Some(Message::MoveEnd),
        KeyCode::PageUp => Some(Message::PageUp),
        KeyCode::PageDown => Some(Message::PageDown),
        _ => None,
    }
}

fn handle_panel_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Message::PanelDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::PanelUp),
        KeyCode::Enter => Some(Message::PanelSelect),
        KeyCode::Char(c @ '1'..='5') => {
            let idx = c.to_digit(10).map_or(0, |d| d as usize - 1);
            ViewMode::ALL.get(idx).copied().map(Message::SetViewMode)
        }
        KeyCode::Char(']') => Some(Message::NextViewMode),
        KeyCode::Char('[') => Some(Message::PrevViewMode),
        KeyCode::Char('/') => Some(Message::StartSearch),
        KeyCode::Char('-') => Some(Message::ApplyPreset(SearchPreset::SimilarDash)),
        KeyCode::Esc => Some(Message::ClearSearch),
        KeyCode::Char('?') => Some(Message::ToggleHelp),
        _ => None,
    }
}
