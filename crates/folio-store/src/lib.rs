//! Block list state for folio.
//!
//! A page is an ordered list of blocks. This crate holds that list as an
//! immutable [`Snapshot`] and defines the four transformations the editor
//! performs on it — update in place, split/insert-after, delete, and move —
//! as pure functions on [`BlockStore`].
//!
//! # Design Philosophy
//!
//! - **Snapshots, not mutation**: each operation returns a new snapshot, so the
//!   previous one stays valid for focus diffing and sync change detection.
//! - **Identity, not indices**: block positions are looked up by ID at the
//!   moment of mutation. The only index-based operation is `move_block`, and
//!   its indices pass through [`position`] first.
//! - **No I/O**: persistence and focus live in other crates.

mod block_store;
mod error;
pub mod position;
mod snapshot;

pub use block_store::BlockStore;
pub use error::StoreError;
pub use position::{display_to_index, index_to_display, DisplayPosition};
pub use snapshot::Snapshot;

pub use folio_types::{Block, BlockId, BlockTag, Page, PageId};

/// Result type for block store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
