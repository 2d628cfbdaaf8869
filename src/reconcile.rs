//! Startup reconciliation of the selection against the document table.
//!
//! The selection and the table are persisted independently, so either can be
//! lost or go stale on its own (first run, a cleared data directory, a file
//! deleted by another instance). [`reconcile`] runs once at startup and leaves
//! the selection naming a document that exists.

use crate::error::Result;
use crate::selection::SelectionStore;
use crate::store::{FileId, FileStore};

/// What the reconciler had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The stored selection was valid.
    Kept(FileId),
    /// No selection was stored; the first existing file was picked.
    AdoptedFirst(FileId),
    /// No selection and no files; a default file was created.
    CreatedDefault(FileId),
    /// The stored selection named a missing file; a default file was created.
    ReplacedStale { stale: FileId, created: FileId },
}

impl Reconciled {
    /// The id selected once reconciliation finished.
    pub const fn active(self) -> FileId {
        match self {
            Self::Kept(id)
            | Self::AdoptedFirst(id)
            | Self::CreatedDefault(id)
            | Self::ReplacedStale { created: id, .. } => id,
        }
    }
}

/// Make the selection point at an existing document.
///
/// # Errors
/// Propagates storage failures; nothing is retried.
pub fn reconcile<S, P>(store: &mut S, selection: &mut P) -> Result<Reconciled>
where
    S: FileStore + ?Sized,
    P: SelectionStore + ?Sized,
{
    let outcome = match selection.get() {
        None => match store.get_first_file()? {
            Some(doc) => Reconciled::AdoptedFirst(doc.id),
            None => Reconciled::CreatedDefault(store.create_file()?),
        },
        Some(id) => {
            if store.get_file(id)?.is_some() {
                Reconciled::Kept(id)
            } else {
                Reconciled::ReplacedStale {
                    stale: id,
                    created: store.create_file()?,
                }
            }
        }
    };

    if !matches!(outcome, Reconciled::Kept(_)) {
        selection.set(Some(outcome.active()))?;
    }
    tracing::info!(?outcome, "selection reconciled");
    Ok(outcome)
}
