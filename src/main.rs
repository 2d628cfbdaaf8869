//! mdpad - A split-pane terminal markdown editor.
//!
//! # Usage
//!
//! ```bash
//! mdpad
//! mdpad --data-dir ~/notes
//! mdpad --autosave-ms 1000 --save
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdpad::app::App;
use mdpad::autosave::DEFAULT_AUTOSAVE_DELAY;
use mdpad::config::{
    ConfigFlags, clear_config_flags, default_data_dir, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};

/// A split-pane terminal markdown editor
#[derive(Parser, Debug)]
#[command(name = "mdpad", version, about, long_about = None)]
struct Cli {
    /// Directory holding the document store
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Quiet period in milliseconds before edits are saved
    #[arg(long, value_name = "MS")]
    autosave_ms: Option<u64>,

    /// Write diagnostic logs to a file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Route `tracing` output to `log_file`, or discard it so the TUI stays intact.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .from_env_lossy();

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
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

    init_logging(effective.log_file.as_deref())?;

    let data_dir = effective.data_dir.unwrap_or_else(default_data_dir);
    let autosave_delay = effective
        .autosave_ms
        .map_or(DEFAULT_AUTOSAVE_DELAY, Duration::from_millis);
    tracing::info!(data_dir = %data_dir.display(), ?autosave_delay, "starting");

    let mut app = App::new(data_dir).with_autosave_delay(autosave_delay);
    app.run().context("Application error")
}
