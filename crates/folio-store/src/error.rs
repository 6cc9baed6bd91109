//! Error types for block store operations.

use thiserror::Error;

use crate::BlockId;

/// Errors that can occur during block store operations.
///
/// None of these leave a snapshot half-modified: an operation either returns
/// a complete new snapshot or an error, and the input is untouched either way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Block not found in the snapshot.
    ///
    /// Signals an identity mismatch between the rendering layer and the store.
    #[error("block not found: {0}")]
    BlockNotFound(BlockId),

    /// Duplicate block ID (hydration or insert).
    #[error("block already exists: {0}")]
    DuplicateBlock(BlockId),

    /// Sequence index out of bounds.
    #[error("index {index} out of bounds for {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },

    /// Display position outside `1..=len`.
    #[error("display position {position} out of bounds for {len} blocks")]
    DisplayPositionOutOfRange { position: usize, len: usize },
}
