// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::StoreError)
    clippy::module_name_repetitions
)]

//! # mdpad
//!
//! A split-pane terminal markdown editor backed by a local document store.
//!
//! mdpad keeps a small table of markdown documents and edits one of them at
//! a time:
//! - Raw markdown on the left, a live rendered preview on the right
//! - Debounced autosave after a quiet period
//! - A file menu to open, create, rename and delete documents
//! - The active document is remembered between sessions
//!
//! ## Architecture
//!
//! mdpad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! Storage writes happen outside `update`, in the session that owns the
//! [`workspace::Workspace`].
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`store`]: Document table and change subscriptions
//! - [`selection`]: Persisted active-document id
//! - [`reconcile`]: Startup resolution of the active document
//! - [`workspace`]: Store and selection operations used by the UI
//! - [`editor`]: Draft text buffer
//! - [`autosave`]: Debounced persistence of the draft
//! - [`preview`]: Markdown rendering for the preview pane
//! - [`ui`]: Terminal UI components
//! - [`config`]: Persisted command-line defaults

pub mod app;
pub mod autosave;
pub mod config;
pub mod editor;
pub mod error;
pub mod preview;
pub mod reconcile;
pub mod selection;
pub mod store;
pub mod ui;
pub mod workspace;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::preview::Preview;
    pub use crate::store::{Document, FileId, FileStore};
    pub use crate::workspace::Workspace;
}
