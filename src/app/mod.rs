//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`Session`]: Storage side effects and the autosave timer
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod session;
mod update;

pub use model::{FileEntry, FileMenu, MenuMode, Model, SaveState, ToastLevel};
pub use session::Session;
pub use update::{Message, update};

use std::path::PathBuf;
use std::time::Duration;

use crate::autosave::DEFAULT_AUTOSAVE_DELAY;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    data_dir: PathBuf,
    autosave_delay: Duration,
}

impl App {
    /// Create an application storing its files in `data_dir`.
    pub const fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
        }
    }

    /// Set the autosave quiet period.
    pub const fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }
}
