use super::*;
use crate::app::{Focus, Message, Model, update};
use crate::editor::EditorBuffer;
use crate::search::SearchPreset;
use crate::session::SessionConfig;
use crate::structure::ViewMode;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

const NOTE: &str = "intro\n#todo buy milk\n# a remark\n#p\nsecond page";

fn model_with(text: &str) -> Model {
    Model::new(
        EditorBuffer::from_text(text),
        SessionConfig::default(),
        (100, 20),
    )
}

fn draw(model: &Model) -> Terminal<TestBackend> {
    let backend = TestBackend::new(100, 20);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal
}

fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol().to_string())
        .collect()
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(|c| c.symbol()).collect()
}

#[test]
fn test_editor_rows_show_note_text_with_gutter() {
    let terminal = draw(&model_with(NOTE));
    assert!(row_text(&terminal, 0).starts_with("1 intro"));
    assert!(row_text(&terminal, 1).starts_with("2 #todo buy milk"));
}

#[test]
fn test_annotation_layer_styles_rows_by_tag() {
    let terminal = draw(&model_with(NOTE));
    let buffer = terminal.backend().buffer();
    // Column 2 is the first text column after a one-digit gutter
    assert_eq!(buffer[(2, 0)].bg, ratatui::style::Color::Reset);
    assert_eq!(
        Some(buffer[(2, 1)].bg),
        style::style_for_tag(crate::structure::TagKind::Todo).bg
    );
    assert_eq!(
        Some(buffer[(2, 2)].bg),
        style::style_for_tag(crate::structure::TagKind::Comment).bg
    );
}

#[test]
fn test_page_row_shows_marker_hint() {
    let terminal = draw(&model_with(NOTE));
    let page_row = row_text(&terminal, 3);
    assert!(page_row.starts_with("4 #p"));
    assert!(page_row.contains("page 2"), "row was {page_row:?}");
}

#[test]
fn test_unindexed_rows_are_unstyled() {
    let mut model = model_with("plain");
    model = update(model, Message::MoveEnd);
    model = update(model, Message::SplitLine);
    for c in "#todo later".chars() {
        model = update(model, Message::InsertChar(c));
    }
    // Not yet committed: the new row has no stable tag
    let terminal = draw(&model);
    let buffer = terminal.backend().buffer();
    assert_eq!(buffer[(2, 1)].bg, ratatui::style::Color::Reset);
}

#[test]
fn test_panel_lists_view_entries_with_count() {
    let terminal = draw(&model_with(NOTE));
    let text = screen_text(&terminal);
    assert!(text.contains("All (3)"));
    assert!(text.contains("T #todo buy milk"));
    assert!(text.contains("P #p"));
}

#[test]
fn test_panel_title_follows_view_mode() {
    let model = model_with(NOTE).with_view_mode(ViewMode::Todos);
    let text = screen_text(&draw(&model));
    assert!(text.contains("TODOs (1)"));
    assert!(!text.contains("# # a remark"));
}

#[test]
fn test_search_results_render_snippets() {
    let mut model = model_with(NOTE);
    model = update(model, Message::StartSearch);
    model = update(model, Message::SearchInput("milk".to_string()));
    let terminal = draw(&model);
    let text = screen_text(&terminal);
    assert!(text.contains("Search: milk (1)"));
    assert!(text.contains("#todo buy milk"));
    assert!(text.contains("/milk"));
    assert!(text.contains("[1 matches]"));
}

#[test]
fn test_invalid_pattern_is_reported_in_search_bar() {
    let mut model = model_with(NOTE);
    model = update(model, Message::StartSearch);
    model = update(model, Message::SearchInput("re:(".to_string()));
    let text = screen_text(&draw(&model));
    assert!(text.contains("invalid pattern"));
    assert!(text.contains("Search: re:( (0)"));
}

#[test]
fn test_preset_switches_to_search_view() {
    let mut model = model_with("a-b\nplain\nx\u{2014}y");
    model = update(model, Message::ApplyPreset(SearchPreset::SimilarDash));
    assert_eq!(model.view_mode, ViewMode::Search);
    assert_eq!(model.search_results.len(), 2);
    let text = screen_text(&draw(&model));
    assert!(text.contains("1 a-b"));
}

#[test]
fn test_status_bar_shows_cursor_and_pages() {
    let terminal = draw(&model_with(NOTE));
    let status = row_text(&terminal, 19);
    assert!(status.contains("untitled"));
    assert!(status.contains("Ln 1, Col 1"));
    assert!(status.contains("2 pages"));
}

#[test]
fn test_help_overlay_renders() {
    let mut model = model_with(NOTE);
    model = update(model, Message::ToggleHelp);
    let text = screen_text(&draw(&model));
    assert!(text.contains("Help"));
    assert!(text.contains("Page break"));
}

#[test]
fn test_panel_focus_highlights_selection() {
    let mut model = model_with(NOTE);
    model = update(model, Message::SwitchFocus);
    assert_eq!(model.focus, Focus::Panel);
    let terminal = draw(&model);
    let buffer = terminal.backend().buffer();
    let panel_x = split_main_columns(ratatui::layout::Rect::new(0, 0, 100, 19))[1].x;
    let cell = &buffer[(panel_x + 1, 1)];
    assert!(
        cell.modifier
            .contains(ratatui::style::Modifier::REVERSED)
    );
}

#[test]
fn test_truncate_to_width_respects_wide_chars() {
    assert_eq!(render::truncate_to_width("メモ帳", 4), "メモ");
    assert_eq!(render::truncate_to_width("abc", 10), "abc");
    assert_eq!(render::truncate_to_width("abc", 0), "");
}

#[test]
fn test_layout_heights() {
    assert_eq!(editor_text_height(20, false), 19);
    assert_eq!(editor_text_height(20, true), 18);
    assert_eq!(panel_visible_rows(20, false), 17);
    assert_eq!(editor_text_height(0, true), 0);
}
