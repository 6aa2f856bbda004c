//! Crate level error type.

use crate::document::DocumentError;
use crate::store::StoreError;
use crate::undo::UndoError;
use thiserror::Error;

/// Any error the editor can surface to its caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Undo(#[from] UndoError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}
