use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::structure::ViewMode;

/// Flags that may come from the command line or a config file.
///
/// Booleans are additive; valued options from the later source win.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub perf: bool,
    pub view: Option<ViewMode>,
    pub anchor_prefix: Option<String>,
    pub lazy_ms: Option<u64>,
    pub tick_ms: Option<u64>,
    pub context: Option<usize>,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            perf: self.perf || other.perf,
            view: other.view.or(self.view),
            anchor_prefix: other
                .anchor_prefix
                .clone()
                .or_else(|| self.anchor_prefix.clone()),
            lazy_ms: other.lazy_ms.or(self.lazy_ms),
            tick_ms: other.tick_ms.or(self.tick_ms),
            context: other.context.or(self.context),
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("tagnote").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("tagnote")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("tagnote").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("tagnote")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".tagnoterc")
}

/// Read a flag file. A missing file yields default flags.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write flags to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# tagnote defaults (saved with --save)".to_string()];
    if flags.watch {
        lines.push("--watch".to_string());
    }
    if let Some(view) = flags.view {
        lines.push(format!("--view {view}"));
    }
    if let Some(prefix) = &flags.anchor_prefix {
        lines.push(format!("--anchor-prefix {prefix}"));
    }
    if let Some(ms) = flags.lazy_ms {
        lines.push(format!("--lazy-ms {ms}"));
    }
    if let Some(ms) = flags.tick_ms {
        lines.push(format!("--tick-ms {ms}"));
    }
    if let Some(chars) = flags.context {
        lines.push(format!("--context {chars}"));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove a flag file if present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from a token list. Unknown tokens and malformed
/// values are ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--watch" | "-w" => flags.watch = true,
            "--perf" => flags.perf = true,
            _ => {
                let (name, inline) = match token.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (token, None),
                };
                if is_valued_flag(name) {
                    let value = match inline {
                        Some(value) => Some(value),
                        None => {
                            let next = tokens.get(i + 1).map(String::as_str);
                            if next.is_some() {
                                i += 1;
                            }
                            next
                        }
                    };
                    if let Some(value) = value {
                        apply_valued_flag(&mut flags, name, value);
                    }
                }
            }
        }
        i += 1;
    }
    flags
}

fn is_valued_flag(name: &str) -> bool {
    matches!(
        name,
        "--view" | "--anchor-prefix" | "--lazy-ms" | "--tick-ms" | "--context" | "--debug-log"
    )
}

fn apply_valued_flag(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--view" => flags.view = value.parse().ok(),
        "--anchor-prefix" => flags.anchor_prefix = Some(value.to_string()),
        "--lazy-ms" => flags.lazy_ms = value.parse().ok(),
        "--tick-ms" => flags.tick_ms = value.parse().ok(),
        "--context" => flags.context = value.parse().ok(),
        "--debug-log" => flags.debug_log = Some(PathBuf::from(value)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = tokens(&[
            "tagnote",
            "--watch",
            "--view",
            "todos",
            "--anchor-prefix=note",
            "--lazy-ms",
            "250",
            "--tick-ms=500",
            "--context",
            "10",
            "--debug-log=events.log",
            "notes.txt",
        ]);
        let flags = parse_flag_tokens(&args);
        assert!(flags.watch);
        assert!(!flags.perf);
        assert_eq!(flags.view, Some(ViewMode::Todos));
        assert_eq!(flags.anchor_prefix.as_deref(), Some("note"));
        assert_eq!(flags.lazy_ms, Some(250));
        assert_eq!(flags.tick_ms, Some(500));
        assert_eq!(flags.context, Some(10));
        assert_eq!(flags.debug_log, Some(PathBuf::from("events.log")));
    }

    #[test]
    fn test_parse_flag_tokens_ignores_bad_values() {
        let flags = parse_flag_tokens(&tokens(&["--lazy-ms", "soon", "--view=sideways"]));
        assert_eq!(flags.lazy_ms, None);
        assert_eq!(flags.view, None);
    }

    #[test]
    fn test_parse_flag_tokens_trailing_valued_flag() {
        let flags = parse_flag_tokens(&tokens(&["--context"]));
        assert_eq!(flags.context, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            watch: true,
            view: Some(ViewMode::Pages),
            lazy_ms: Some(800),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            perf: true,
            view: Some(ViewMode::Search),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.watch);
        assert!(merged.perf);
        assert_eq!(merged.view, Some(ViewMode::Search));
        assert_eq!(merged.lazy_ms, Some(800));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".tagnoterc");
        let flags = ConfigFlags {
            watch: true,
            perf: true,
            view: Some(ViewMode::Comments),
            anchor_prefix: Some("note".to_string()),
            lazy_ms: Some(300),
            tick_ms: Some(700),
            context: Some(12),
            debug_log: Some(PathBuf::from("events.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
