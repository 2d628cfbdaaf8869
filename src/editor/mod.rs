//! Draft editing.
//!
//! [`EditorBuffer`] is the rope-backed text the user types into; [`Draft`]
//! ties it to the stored document it mirrors and tracks whether it has
//! diverged from what was loaded.

mod buffer;
mod draft;

pub use buffer::{Cursor, Direction, EditorBuffer};
pub use draft::Draft;
