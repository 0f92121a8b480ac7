//! Tagnote - A terminal note editor with line tags.
//!
//! # Usage
//!
//! ```bash
//! tagnote notes.txt
//! tagnote --watch notes.txt
//! tagnote --print --view todos notes.txt
//! cat notes.txt | tagnote - --search milk --json
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use tagnote::app::App;
use tagnote::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use tagnote::perf;
use tagnote::report::{SearchReport, ViewReport};
use tagnote::scheduler::SchedulerConfig;
use tagnote::search::SearchOptions;
use tagnote::session::{DEFAULT_ANCHOR_PREFIX, NoteSession, SessionConfig};
use tagnote::structure::ViewMode;

/// A terminal note editor that indexes comments, page breaks and TODOs
#[derive(Parser, Debug)]
#[command(name = "tagnote", version, about, long_about = None)]
struct Cli {
    /// Note file to edit (`-` reads stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Reload the note when the file changes on disk
    #[arg(short, long)]
    watch: bool,

    /// Initial structure panel view
    #[arg(long, value_enum)]
    view: Option<ViewMode>,

    /// Prefix for line anchors
    #[arg(long, value_name = "PREFIX")]
    anchor_prefix: Option<String>,

    /// Quiet period after the last keystroke before re-indexing (ms)
    #[arg(long, value_name = "MS")]
    lazy_ms: Option<u64>,

    /// How often the indexer checks for stable text (ms)
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,

    /// Characters of context on each side of a search match
    #[arg(long, value_name = "CHARS")]
    context: Option<usize>,

    /// Print the chosen view and exit
    #[arg(long)]
    print: bool,

    /// Print search results for QUERY and exit (`re:` for patterns)
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,

    /// Print as JSON
    #[arg(long)]
    json: bool,

    /// Print indexing and search timings
    #[arg(long)]
    perf: bool,

    /// Write engine events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn session_config(flags: &ConfigFlags) -> SessionConfig {
    let defaults = SchedulerConfig::default();
    SessionConfig {
        anchor_prefix: flags
            .anchor_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_ANCHOR_PREFIX.to_string()),
        scheduler: SchedulerConfig {
            lazy_window: flags
                .lazy_ms
                .map_or(defaults.lazy_window, Duration::from_millis),
            tick_period: flags
                .tick_ms
                .map_or(defaults.tick_period, Duration::from_millis),
        },
        search: flags
            .context
            .map_or_else(SearchOptions::default, |context_chars| SearchOptions {
                context_chars,
            }),
    }
}

/// Read the seed text. A missing file starts an empty note.
fn read_note(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() == "-" => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
        Some(p) if p.exists() => {
            std::fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))
        }
        _ => Ok(String::new()),
    }
}

fn run_headless(cli: &Cli, text: &str, config: SessionConfig, view: ViewMode) -> Result<()> {
    let mut session = NoteSession::new(config, 0);
    session.on_text_changed(text, 0);
    session.flush();

    let output = if let Some(query) = &cli.search {
        let report = SearchReport::new(query.as_str(), session.search(query));
        if cli.json {
            serde_json::to_string_pretty(&report)? + "\n"
        } else {
            report.to_text()
        }
    } else {
        let report = ViewReport::new(session.index(), view);
        if cli.json {
            serde_json::to_string_pretty(&report)? + "\n"
        } else {
            report.to_text()
        }
    };
    print!("{output}");
    Ok(())
}

/// `RUST_LOG` directives when given and valid, warnings otherwise.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn init_logging(interactive: bool) {
    let rust_log = std::env::var("RUST_LOG")
        .ok()
        .filter(|directives| !directives.trim().is_empty());
    // The terminal UI owns stderr's screen; only log there when asked to
    let writer = if interactive && rust_log.is_none() {
        BoxMakeWriter::new(std::io::sink)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let headless = cli.print || cli.search.is_some();
    init_logging(!headless);

    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("TAGNOTE_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        tracing::warn!(
            path = %debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            %err,
            "failed to open debug log"
        );
    }

    let config = session_config(&effective);
    let view = cli.view.or(effective.view).unwrap_or_default();
    let text = read_note(cli.file.as_deref())?;

    if headless {
        return run_headless(&cli, &text, config, view);
    }

    let file_path = cli.file.filter(|p| p.as_os_str() != "-");
    let mut app = App::new(file_path, text)
        .with_watch(effective.watch)
        .with_view_mode(view)
        .with_session_config(config)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("  ")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_log_filter_uses_bare_rust_log_level() {
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            log_filter(Some("tagnote=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_short_watch_flag_reaches_effective_flags() {
        let args: Vec<String> = ["tagnote", "-w", "notes.txt"].map(String::from).to_vec();
        let cli = Cli::parse_from(&args);
        assert!(cli.watch);
        assert!(parse_flag_tokens(&args).watch);
    }
}
