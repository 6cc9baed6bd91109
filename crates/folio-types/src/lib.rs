//! Shared identity and block types for folio.
//!
//! This crate is the data-model foundation: typed IDs, the block record, and
//! the page hydration form. It has **no internal folio dependencies** — a
//! pure leaf crate that the store, sync, and editor crates build on.
//!
//! # Key Types
//!
//! |-------------------|----------------------------------------------|
//! | Type              | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | [`BlockId`]       | Stable, never-reused block identity          |
//! | [`PageId`]        | Externally supplied page identity            |
//! | [`BlockTag`]      | Semantic discriminator (p, h1, h2, h3, ...)  |
//! | [`Block`]         | `{ id, tag, content }` record                |
//! | [`Page`]          | Page id + ordered blocks (hydration/wire)    |
//! |-------------------|----------------------------------------------|

pub mod block;
pub mod ids;
pub mod page;

pub use block::{Block, BlockTag};
pub use ids::{BlockId, PageId, TypeError};
pub use page::Page;
