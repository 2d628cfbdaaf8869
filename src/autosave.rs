//! Deferred, cancellable persistence of the draft.
//!
//! Timing is driven by the caller's clock (`now_ms`), so the same code runs
//! under the terminal event loop and in tests without sleeping.

use std::time::Duration;

use crate::editor::Draft;
use crate::error::Result;
use crate::selection::SelectionStore;
use crate::store::{FileId, FileStore};
use crate::workspace::Workspace;

/// Default quiet period before an edit is written.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

/// Holds one pending value until `delay_ms` passes without a new `queue`.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T: Copy> Debouncer<T> {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Arm (or re-arm) the timer with `value`.
    pub fn queue(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms));
    }

    /// The pending value once the quiet period has elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        let (value, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some(value)
        } else {
            None
        }
    }

    /// Drop the pending value without firing.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}

/// Debounced writer of draft content.
///
/// Only edits arm the timer; loading a document never does. Switching files
/// cancels the pending write rather than flushing it.
#[derive(Debug)]
pub struct Autosave {
    debouncer: Debouncer<FileId>,
}

impl Autosave {
    pub fn new(delay: Duration) -> Self {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Self {
            debouncer: Debouncer::new(delay_ms),
        }
    }

    /// Restart the quiet period after an edit to `draft`.
    pub fn note_edit(&mut self, draft: &Draft, now_ms: u64) {
        if draft.is_diverged() {
            self.debouncer.queue(draft.file_id(), now_ms);
        }
    }

    /// Discard the pending write, if any.
    pub fn cancel(&mut self) {
        if let Some(id) = self.debouncer.cancel() {
            tracing::debug!(%id, "pending autosave discarded");
        }
    }

    pub const fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Write the draft if its quiet period has elapsed.
    ///
    /// Returns whether a write happened.
    ///
    /// # Errors
    /// Propagates the store error; the draft keeps its unsaved state.
    pub fn poll<S, P>(
        &mut self,
        now_ms: u64,
        draft: Option<&mut Draft>,
        workspace: &mut Workspace<S, P>,
    ) -> Result<bool>
    where
        S: FileStore,
        P: SelectionStore,
    {
        let Some(id) = self.debouncer.take_ready(now_ms) else {
            return Ok(false);
        };
        match draft {
            Some(draft) if draft.file_id() == id => write_draft(draft, workspace),
            _ => {
                tracing::debug!(%id, "autosave target no longer open");
                Ok(false)
            }
        }
    }

    /// Write the draft now, cancelling the timer.
    ///
    /// # Errors
    /// Propagates the store error.
    pub fn flush<S, P>(&mut self, draft: &mut Draft, workspace: &mut Workspace<S, P>) -> Result<bool>
    where
        S: FileStore,
        P: SelectionStore,
    {
        self.debouncer.cancel();
        write_draft(draft, workspace)
    }
}

fn write_draft<S, P>(draft: &mut Draft, workspace: &mut Workspace<S, P>) -> Result<bool>
where
    S: FileStore,
    P: SelectionStore,
{
    let text = draft.buffer().text();
    if !draft.differs_from_saved(&text) {
        draft.mark_saved(&text);
        return Ok(false);
    }
    workspace.save_content(draft.file_id(), &text)?;
    draft.mark_saved(&text);
    tracing::debug!(id = %draft.file_id(), bytes = text.len(), "draft saved");
    Ok(true)
}
