//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`render`]: Editor pane with the annotation layer, structure panel
//! - [`style`]: Colors per tag kind

pub mod style;

mod overlays;
mod render;
mod status;

pub use render::{render, split_main_columns};

pub const EDITOR_WIDTH_PERCENT: u16 = 65;
pub const PANEL_WIDTH_PERCENT: u16 = 35;

/// Whether a bar (search input or toast) sits above the status bar.
pub fn footer_bar_visible(model: &crate::app::Model) -> bool {
    model.search_active || model.active_toast().is_some()
}

/// Rows of editor text for a terminal `height`.
pub const fn editor_text_height(height: u16, footer_bar: bool) -> u16 {
    let footer_rows = if footer_bar { 2 } else { 1 };
    height.saturating_sub(footer_rows)
}

/// Rows listing entries inside the bordered structure panel.
pub const fn panel_visible_rows(height: u16, footer_bar: bool) -> u16 {
    editor_text_height(height, footer_bar).saturating_sub(2)
}

#[cfg(test)]
mod tests;
