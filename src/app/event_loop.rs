use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::effects::{handle_message_side_effects, make_note_watcher};
use crate::app::input::handle_event;
use crate::app::{App, Message, Model, ToastLevel, update};
use crate::editor::EditorBuffer;

/// Longest wait for input before the loop checks the clock again.
const MAX_POLL_MS: u64 = 250;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; tagnote requires an interactive terminal")?;
        let size = terminal.size()?;
        execute!(stdout(), EnableBracketedPaste)?;

        let buffer = EditorBuffer::from_text(&self.initial_text);
        let mut model = Model::new(buffer, self.session_config.clone(), (size.width, size.height))
            .with_file_path(self.file_path.clone())
            .with_view_mode(self.view_mode);
        model.watch_enabled = self.watch_enabled && self.file_path.is_some();
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        crate::perf::log_event(
            "init",
            format!(
                "terminal={}x{} lines={} watch={}",
                size.width,
                size.height,
                model.buffer.line_count(),
                model.watch_enabled
            ),
        );

        let result = Self::event_loop(&mut terminal, &mut model, &self.initial_text);

        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();
        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model, seed: &str) -> Result<()> {
        let start = Instant::now();
        let mut watcher = match (&model.file_path, model.watch_enabled) {
            (Some(path), true) => match make_note_watcher(path, seed) {
                Ok(watcher) => Some(watcher),
                Err(err) => {
                    model.watch_enabled = false;
                    model.show_toast(ToastLevel::Warning, format!("Watch unavailable: {err}"));
                    tracing::warn!(%err, "file watcher unavailable");
                    None
                }
            },
            _ => None,
        };
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;
        let mut drawn_revision = model.session.slot().revision();

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            if let Some(contents) = watcher
                .as_mut()
                .and_then(|w| w.poll_reload(Instant::now()))
            {
                dispatch(model, Message::FileReloaded(contents));
                needs_render = true;
            }

            let now_ms = elapsed_ms(start);
            let poll_ms = if needs_render {
                0
            } else {
                model.session.scheduler().next_tick_in(now_ms).min(MAX_POLL_MS)
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                let mut handled = 0_u32;
                loop {
                    if let Some(msg) = handle_event(&event::read()?, model) {
                        crate::perf::log_event(
                            "event.message",
                            format!("frame={frame_idx} msg={msg:?}"),
                        );
                        dispatch(model, msg);
                        handled += 1;
                    }
                    // Coalesce key repeat bursts into a single render
                    if !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
                if handled > 0 {
                    needs_render = true;
                }
            }

            dispatch(model, Message::Tick(elapsed_ms(start)));
            let revision = model.session.slot().revision();
            if revision != drawn_revision {
                drawn_revision = revision;
                needs_render = true;
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3} revision={}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0,
                        revision
                    ),
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}

fn dispatch(model: &mut Model, msg: Message) {
    let side_msg = msg.clone();
    *model = update(std::mem::take(model), msg);
    handle_message_side_effects(model, &side_msg);
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
