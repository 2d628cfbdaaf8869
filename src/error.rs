//! Errors raised by the editing workflow above the individual stores.

use crate::selection::SelectionError;
use crate::store::{FileId, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("file name cannot be empty")]
    EmptyName,
    #[error("file {0} no longer exists")]
    Missing(FileId),
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;
