use std::path::PathBuf;

use tagnote::config::{ConfigFlags, load_config_flags, parse_flag_tokens};
use tagnote::structure::ViewMode;

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".tagnoterc");
    let content = r"
# comment
--watch

--view pages

--debug-log=events.log
--lazy-ms 750
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.watch);
    assert_eq!(flags.view, Some(ViewMode::Pages));
    assert_eq!(flags.debug_log, Some(PathBuf::from("events.log")));
    assert_eq!(flags.lazy_ms, Some(750));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".tagnoterc");
    let content = "--watch\n--view pages\n--anchor-prefix note --debug-log file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "tagnote".to_string(),
        "--view".to_string(),
        "todos".to_string(),
        "--perf".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.watch, "file flags should remain enabled");
    assert!(effective.perf, "cli flags should be applied");
    assert_eq!(effective.view, Some(ViewMode::Todos), "cli should override view");
    assert_eq!(effective.anchor_prefix.as_deref(), Some("note"));
    assert_eq!(
        effective.debug_log,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "tagnote".to_string(),
        "--view=comments".to_string(),
        "--tick-ms=250".to_string(),
        "--context=8".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.view, Some(ViewMode::Comments));
    assert_eq!(flags.tick_ms, Some(250));
    assert_eq!(flags.context, Some(8));
}

#[test]
fn test_parse_flag_tokens_accepts_short_watch() {
    let args = vec![
        "tagnote".to_string(),
        "-w".to_string(),
        "notes.txt".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert!(flags.watch);
    assert!(flags.view.is_none());
}

#[test]
fn test_config_union_merges_booleans() {
    let file = ConfigFlags {
        watch: true,
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        perf: true,
        ..ConfigFlags::default()
    };
    let merged = file.union(&cli);
    assert!(merged.watch);
    assert!(merged.perf);
}
