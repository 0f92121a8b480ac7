use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

pub fn render_search_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let info = if let Some(err) = &model.search_error {
        format!("  [{err}]")
    } else if model.search_query.is_empty() {
        String::new()
    } else {
        format!("  [{} matches]", model.search_results.len())
    };
    let text = format!(
        "/{}{}  Enter: done  Esc: clear  re: for patterns",
        model.search_query, info
    );
    let style = if model.search_error.is_some() {
        Style::default().bg(Color::Red).fg(Color::White)
    } else {
        Style::default().bg(Color::Blue).fg(Color::White)
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let cursor = model.buffer.cursor();
    let modified = if model.modified { " [modified]" } else { "" };
    let pending = if model.session.is_dirty() {
        " [indexing]"
    } else {
        ""
    };
    let watch = if model.watch_enabled {
        " [watching]"
    } else {
        ""
    };
    let pages = model.session.index().page_count();

    let status = format!(
        " {}{modified}  Ln {}, Col {}  {} page{}{pending}{watch}  F1:help",
        model.file_name(),
        cursor.line + 1,
        cursor.col + 1,
        pages + 1,
        if pages == 0 { "" } else { "s" },
    );
    let bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
