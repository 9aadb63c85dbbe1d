//! Error types for document and session operations.
use thiserror::Error;

use crate::document::BlockRef;

/// Errors surfaced by the editing core.
///
/// Boundary conditions (backspace at the start of the first block, moving past
/// the end of a block, ...) are not errors; they resolve to
/// [`EditOutcome::NoOp`](crate::session::EditOutcome::NoOp).
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("out of memory while allocating a block")]
    OutOfMemory,

    #[error("block {0} is not part of this document")]
    InvalidReference(BlockRef),

    #[error(transparent)]
    Buffer(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
