//! Page — an externally identified, ordered list of blocks.
//!
//! This is the hydration/wire form only. Once loaded, the block list is
//! handed to the store as a snapshot and the editor owns it from there.

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::ids::PageId;

/// An ordered collection of blocks identified by an external id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(alias = "_id")]
    pub id: PageId,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn new(id: PageId, blocks: Vec<Block>) -> Self {
        Self { id, blocks }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}
