use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const APP_DIR: &str = "mdpad";

/// Flags that can be persisted in a config file and merged with the CLI.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub data_dir: Option<PathBuf>,
    pub autosave_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`; values set in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            data_dir: other.data_dir.clone().or_else(|| self.data_dir.clone()),
            autosave_ms: other.autosave_ms.or(self.autosave_ms),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join(APP_DIR).join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR)
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join(APP_DIR).join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join(APP_DIR).join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".mdpadrc")
}

/// Directory holding `files.json` and `active.json` when `--data-dir` is not set.
pub fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join(APP_DIR);
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR);
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join(APP_DIR);
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".local").join("share").join(APP_DIR);
        }
    }

    PathBuf::from(".mdpad")
}

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
        .flat_map(line_tokens)
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Split one config line into tokens.
///
/// `--data-dir` and `--log-file` take the rest of the line as their value,
/// so saved paths may contain spaces.
fn line_tokens(line: &str) -> Vec<String> {
    let flag = line
        .split(|c: char| c == '=' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    if matches!(flag, "--data-dir" | "--log-file") {
        let rest = &line[flag.len()..];
        let value = rest.strip_prefix('=').unwrap_or(rest).trim();
        if value.is_empty() {
            return vec![flag.to_owned()];
        }
        return vec![flag.to_owned(), value.to_owned()];
    }
    line.split_whitespace().map(ToOwned::to_owned).collect()
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# mdpad defaults (saved with --save)".to_string()];
    if let Some(dir) = &flags.data_dir {
        lines.push(format!("--data-dir {}", dir.display()));
    }
    if let Some(ms) = flags.autosave_ms {
        lines.push(format!("--autosave-ms {ms}"));
    }
    if let Some(log) = &flags.log_file {
        lines.push(format!("--log-file {}", log.display()));
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

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the persisted flags out of a raw token list.
///
/// Unknown tokens are skipped, so this accepts both `std::env::args()` and
/// config file contents.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        if matches!(name, "--data-dir" | "--autosave-ms" | "--log-file") {
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
                match name {
                    "--data-dir" => flags.data_dir = Some(PathBuf::from(value)),
                    "--log-file" => flags.log_file = Some(PathBuf::from(value)),
                    _ => flags.autosave_ms = value.parse().ok(),
                }
            }
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&tokens(&[
            "mdpad",
            "--data-dir",
            "/tmp/notes",
            "--autosave-ms=250",
            "--log-file",
            "mdpad.log",
            "--save",
        ]));
        assert_eq!(flags.data_dir, Some(PathBuf::from("/tmp/notes")));
        assert_eq!(flags.autosave_ms, Some(250));
        assert_eq!(flags.log_file, Some(PathBuf::from("mdpad.log")));
    }

    #[test]
    fn test_invalid_autosave_value_is_ignored() {
        let flags = parse_flag_tokens(&tokens(&["--autosave-ms", "soon"]));
        assert_eq!(flags.autosave_ms, None);
    }

    #[test]
    fn test_trailing_flag_without_value_is_ignored() {
        let flags = parse_flag_tokens(&tokens(&["--data-dir"]));
        assert_eq!(flags, ConfigFlags::default());
    }

    #[test]
    fn test_config_union_prefers_other() {
        let file = ConfigFlags {
            data_dir: Some(PathBuf::from("a")),
            autosave_ms: Some(100),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            autosave_ms: Some(900),
            log_file: Some(PathBuf::from("x.log")),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.data_dir, Some(PathBuf::from("a")));
        assert_eq!(merged.autosave_ms, Some(900));
        assert_eq!(merged.log_file, Some(PathBuf::from("x.log")));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            data_dir: Some(PathBuf::from("/data/mdpad")),
            autosave_ms: Some(750),
            log_file: Some(PathBuf::from("mdpad.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }

    #[test]
    fn test_saved_paths_with_spaces_load_back_whole() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        let flags = ConfigFlags {
            data_dir: Some(PathBuf::from("/home/u/My Notes")),
            autosave_ms: Some(300),
            log_file: Some(PathBuf::from("C:\\Users\\Jo Doe\\mdpad log.txt")),
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);
    }

    #[test]
    fn test_line_tokens_keep_path_value_together() {
        assert_eq!(
            line_tokens("--data-dir   /srv/My Notes  "),
            vec!["--data-dir", "/srv/My Notes"]
        );
        assert_eq!(
            line_tokens("--log-file=/tmp/a b.log"),
            vec!["--log-file", "/tmp/a b.log"]
        );
        assert_eq!(line_tokens("--data-dir"), vec!["--data-dir"]);
        assert_eq!(
            line_tokens("--autosave-ms 200 --unknown"),
            vec!["--autosave-ms", "200", "--unknown"]
        );
    }
}
