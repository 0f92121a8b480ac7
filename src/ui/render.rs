use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{Focus, Model, PanelRow};
use crate::structure::TagKind;

use super::{EDITOR_WIDTH_PERCENT, PANEL_WIDTH_PERCENT, footer_bar_visible, overlays, status, style};

pub fn split_main_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
            Constraint::Percentage(PANEL_WIDTH_PERCENT),
        ])
        .split(area)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let bar_visible = footer_bar_visible(model);
    let main_height = super::editor_text_height(area.height, bar_visible);

    let main_area = Rect {
        height: main_height,
        ..area
    };
    let chunks = split_main_columns(main_area);
    render_editor(model, frame, chunks[0]);
    render_panel(model, frame, chunks[1]);

    if bar_visible {
        let bar_area = Rect {
            y: area.y + main_height,
            height: 1,
            ..area
        };
        if model.search_active {
            status::render_search_bar(model, frame, bar_area);
        } else {
            status::render_toast_bar(model, frame, bar_area);
        }
    }
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };
    status::render_status_bar(model, frame, status_area);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let buf = &model.buffer;
    let display = model.session.display_lines();
    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines);
    let text_width = usize::from(area.width.saturating_sub(gutter_width + 1));

    let start = model.editor_scroll_offset;
    let end = (start + usize::from(area.height)).min(total_lines);

    let mut content: Vec<Line> = Vec::with_capacity(end.saturating_sub(start));
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let tag = display.get(line_idx).map_or(TagKind::None, |d| d.tag);
        let row_style = style::style_for_tag(tag);

        let mut spans = vec![Span::styled(
            format!("{:>width$} ", line_idx + 1, width = usize::from(gutter_width)),
            style::gutter_style(),
        )];
        let visible = truncate_to_width(&line_text, text_width);
        let used = visible.width();
        spans.push(Span::styled(visible, row_style));

        let hint = match display.get(line_idx) {
            Some(d) if d.tag == TagKind::Page => d.text.trim_start(),
            _ => "",
        };
        let hint_width = hint.width();
        if !hint.is_empty() && used + hint_width + 1 <= text_width {
            spans.push(Span::styled(
                " ".repeat(text_width - used - hint_width),
                row_style,
            ));
            spans.push(Span::styled(hint.to_string(), style::page_hint_style()));
        } else if tag != TagKind::None {
            // Extend the row background to the pane edge
            spans.push(Span::styled(
                " ".repeat(text_width.saturating_sub(used)),
                row_style,
            ));
        }
        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);

    if model.focus == Focus::Editor && !model.help_visible && !model.search_active {
        let cursor = buf.cursor();
        if cursor.line >= start && cursor.line < start + usize::from(area.height) {
            let line_text = buf.line_at(cursor.line).unwrap_or_default();
            let col_width: usize = line_text
                .chars()
                .take(cursor.col)
                .map(|c| c.width().unwrap_or(0))
                .sum();
            let x = usize::from(gutter_width + 1) + col_width.min(text_width);
            let x = u16::try_from(x).unwrap_or(u16::MAX).min(area.width.saturating_sub(1));
            let y = u16::try_from(cursor.line - start).unwrap_or(0);
            frame.set_cursor_position((area.x + x, area.y + y));
        }
    }
}

fn render_panel(model: &Model, frame: &mut Frame, area: Rect) {
    let rows = model.panel_rows();
    let inner_width = usize::from(area.width.saturating_sub(2));
    let visible_rows = usize::from(area.height.saturating_sub(2));
    let start = model.panel_scroll_offset.min(rows.len().saturating_sub(visible_rows));
    let number_width = usize::from(line_number_width(model.buffer.line_count()));

    let items: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(start)
        .take(visible_rows)
        .map(|(i, row)| {
            let selected = i == model.panel_selected && model.focus == Focus::Panel;
            let line = panel_line(model, row, number_width, inner_width);
            if selected {
                line.patch_style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                line
            }
        })
        .collect();

    let title = match model.view_mode {
        crate::structure::ViewMode::Search if !model.search_query.is_empty() => {
            format!(" Search: {} ({}) ", model.search_query, rows.len())
        }
        mode => format!(" {} ({}) ", mode.label(), rows.len()),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if model.focus == Focus::Panel {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(items).block(block), area);
}

fn panel_line(model: &Model, row: &PanelRow, number_width: usize, width: usize) -> Line<'static> {
    let number = format!("{:>number_width$} ", row.line_index() + 1);
    let budget = width.saturating_sub(number.width());
    let mut spans = vec![Span::styled(number, style::gutter_style())];

    match row {
        PanelRow::Entry(entry) => {
            let tag = model
                .session
                .index()
                .entry_at(entry.index)
                .map_or(TagKind::None, |(tag, _)| tag);
            spans.push(Span::styled(
                format!("{} ", style::tag_marker(tag)),
                Style::default().fg(style::tag_color(tag)),
            ));
            spans.push(Span::raw(truncate_to_width(
                &entry.text,
                budget.saturating_sub(2),
            )));
        }
        PanelRow::Match(m) => {
            let mut remaining = budget;
            for (text, span_style) in [
                (m.left.as_str(), style::context_style()),
                (m.target.as_str(), style::match_highlight_style()),
                (m.right.as_str(), style::context_style()),
            ] {
                if text.is_empty() || remaining == 0 {
                    continue;
                }
                let piece = truncate_to_width(text, remaining);
                remaining = remaining.saturating_sub(piece.width());
                spans.push(Span::styled(piece, span_style));
            }
        }
    }
    Line::from(spans)
}

/// Longest prefix of `text` that fits in `width` terminal columns.
pub(super) fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
