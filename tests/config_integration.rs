use std::path::PathBuf;

use mdpad::config::{ConfigFlags, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".mdpadrc");
    let content = r#"
# comment
--autosave-ms 300

--data-dir notes

--log-file=mdpad.log
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert_eq!(flags.autosave_ms, Some(300));
    assert_eq!(flags.data_dir, Some(PathBuf::from("notes")));
    assert_eq!(flags.log_file, Some(PathBuf::from("mdpad.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".mdpadrc");
    std::fs::write(&path, "--autosave-ms 300\n--log-file file.log\n").unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "mdpad".to_string(),
        "--autosave-ms".to_string(),
        "1000".to_string(),
        "--data-dir".to_string(),
        "elsewhere".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert_eq!(effective.autosave_ms, Some(1000), "cli should override delay");
    assert_eq!(effective.data_dir, Some(PathBuf::from("elsewhere")));
    assert_eq!(
        effective.log_file,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_global_then_local_then_cli() {
    let global = ConfigFlags {
        data_dir: Some(PathBuf::from("global")),
        autosave_ms: Some(100),
        log_file: Some(PathBuf::from("g.log")),
    };
    let local = ConfigFlags {
        data_dir: Some(PathBuf::from("local")),
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        autosave_ms: Some(50),
        ..ConfigFlags::default()
    };

    let effective = global.union(&local).union(&cli);
    assert_eq!(effective.data_dir, Some(PathBuf::from("local")));
    assert_eq!(effective.autosave_ms, Some(50));
    assert_eq!(effective.log_file, Some(PathBuf::from("g.log")));
}

#[test]
fn test_missing_config_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}

#[test]
fn test_data_dir_with_spaces_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");
    let cli_args = vec![
        "mdpad".to_string(),
        "--data-dir".to_string(),
        "/Users/sam/Library/Application Support/My Notes".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    mdpad::config::save_config_flags(&path, &cli_flags).unwrap();
    let loaded = load_config_flags(&path).unwrap();

    assert_eq!(
        loaded.data_dir,
        Some(PathBuf::from(
            "/Users/sam/Library/Application Support/My Notes"
        ))
    );
    assert_eq!(loaded, cli_flags);
}
