//! Immutable, shareable block sequences.

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::{Block, BlockId, Result, StoreError};

/// An immutable ordered block sequence captured at one instant.
///
/// Cloning is cheap (one `Arc` bump) and clones share identity: two snapshots
/// are [`same`](Snapshot::same) only if one was cloned from the other. Every
/// store operation that changes anything returns a snapshot with a fresh
/// allocation, so "reference-different" is exactly "something changed".
#[derive(Clone, Debug)]
pub struct Snapshot {
    blocks: Arc<[Block]>,
}

impl Snapshot {
    /// Build a snapshot from hydrated blocks, rejecting duplicate IDs.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(blocks.len());
        for block in &blocks {
            if !seen.insert(&block.id) {
                return Err(StoreError::DuplicateBlock(block.id.clone()));
            }
        }
        Ok(Self::from_vec(blocks))
    }

    /// An empty snapshot.
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Wrap a vector that the caller has already validated.
    pub(crate) fn from_vec(blocks: Vec<Block>) -> Self {
        Self {
            blocks: Arc::from(blocks),
        }
    }

    /// Borrow the blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Reference identity — true iff both share the same allocation.
    pub fn same(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.blocks, &other.blocks)
    }

    /// Locate a block by identity. This is the only way positions are
    /// resolved; indices are never carried across calls.
    pub fn position_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    /// Get a block by ID.
    pub fn get_block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    /// Check whether a block ID is present.
    pub fn contains(&self, id: &BlockId) -> bool {
        self.position_of(id).is_some()
    }

    /// Block IDs in order.
    pub fn ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|b| b.id.clone()).collect()
    }

    /// Copy the blocks out (for building the next snapshot).
    pub fn to_vec(&self) -> Vec<Block> {
        self.blocks.to_vec()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Snapshot {
    type Target = [Block];

    fn deref(&self) -> &[Block] {
        &self.blocks
    }
}

/// Structural equality (same blocks, same order) — not identity.
impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.same(other) || self.blocks[..] == other.blocks[..]
    }
}

impl Eq for Snapshot {}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.blocks.iter())
    }
}
