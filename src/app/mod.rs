//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use input::{handle_event, handle_key};
pub use model::{Focus, Model, PanelRow, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::session::SessionConfig;
use crate::structure::ViewMode;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    initial_text: String,
    watch_enabled: bool,
    view_mode: ViewMode,
    session_config: SessionConfig,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application editing `initial_text` loaded from `file_path`
    /// when one is given.
    pub fn new(file_path: Option<PathBuf>, initial_text: String) -> Self {
        Self {
            file_path,
            initial_text,
            watch_enabled: false,
            view_mode: ViewMode::default(),
            session_config: SessionConfig::default(),
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Enable or disable reloading when the file changes on disk.
    pub fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Set the initial structure panel view.
    pub const fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = mode;
        self
    }

    /// Set anchor prefix, scheduler timing, and snippet width.
    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}
