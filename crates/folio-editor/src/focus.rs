//! Focus tracking — where input goes after the block list changes shape.
//!
//! Only structural changes move focus. After a split/add the caret jumps to
//! the start of the new block; after a delete it lands at the end of the block
//! that sat just above the deleted one. Edits and moves leave focus alone.
//!
//! The view may not have rendered the target yet. That is not an error: the
//! request is dropped and the user just clicks.

use folio_store::Snapshot;
use folio_types::BlockId;
use tracing::debug;

/// Where the caret goes inside the focused block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Caret {
    Start,
    End,
}

/// A block to focus and where to put the caret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusRequest {
    pub block_id: BlockId,
    pub caret: Caret,
}

impl FocusRequest {
    pub fn start_of(block_id: BlockId) -> Self {
        Self { block_id, caret: Caret::Start }
    }

    pub fn end_of(block_id: BlockId) -> Self {
        Self { block_id, caret: Caret::End }
    }

    /// Caret offset in chars within `blocks`, if the block exists there.
    pub fn offset_in(&self, blocks: &Snapshot) -> Option<usize> {
        let block = blocks.get_block(&self.block_id)?;
        Some(match self.caret {
            Caret::Start => 0,
            Caret::End => block.content_len(),
        })
    }
}

/// The rendering layer's side of focus placement.
pub trait FocusTarget {
    /// Focus `block_id` and place the caret. Returns `false` if the block
    /// isn't rendered (yet).
    fn focus(&mut self, block_id: &BlockId, caret: Caret) -> bool;
}

/// Headless focus target: remembers what it was asked to focus.
#[derive(Debug, Default, Clone)]
pub struct RecordedFocus {
    pub requests: Vec<FocusRequest>,
    /// Blocks the simulated view has not rendered; focusing them fails.
    pub unrendered: Vec<BlockId>,
}

impl RecordedFocus {
    pub fn last(&self) -> Option<&FocusRequest> {
        self.requests.last()
    }
}

impl FocusTarget for RecordedFocus {
    fn focus(&mut self, block_id: &BlockId, caret: Caret) -> bool {
        if self.unrendered.contains(block_id) {
            return false;
        }
        self.requests.push(FocusRequest {
            block_id: block_id.clone(),
            caret,
        });
        true
    }
}

/// Computes focus transitions from before/after snapshots.
pub struct FocusTracker;

impl FocusTracker {
    /// Focus after a structural change made on behalf of `acting`.
    ///
    /// Returns `None` when the change wasn't a single insert or delete, or
    /// when there is no block to move to.
    pub fn transition(before: &Snapshot, after: &Snapshot, acting: &BlockId) -> Option<FocusRequest> {
        if after.len() == before.len() + 1 {
            Self::after_insert(after, acting)
        } else if after.len() + 1 == before.len() {
            Self::after_delete(before, acting)
        } else {
            None
        }
    }

    /// The block right after `acting` in the new sequence, caret at start.
    pub fn after_insert(after: &Snapshot, acting: &BlockId) -> Option<FocusRequest> {
        let index = after.position_of(acting)?;
        let next = after.get(index + 1)?;
        Some(FocusRequest::start_of(next.id.clone()))
    }

    /// The block right before `acting` in the old sequence, caret at end.
    ///
    /// Deleting the first block has no predecessor, so focus stays put.
    pub fn after_delete(before: &Snapshot, acting: &BlockId) -> Option<FocusRequest> {
        let index = before.position_of(acting)?;
        let previous = before.get(index.checked_sub(1)?)?;
        Some(FocusRequest::end_of(previous.id.clone()))
    }

    /// Hand `request` to the view; a missing target is a silent no-op.
    pub fn apply(request: &FocusRequest, target: &mut dyn FocusTarget) -> bool {
        let focused = target.focus(&request.block_id, request.caret);
        if !focused {
            debug!(block = %request.block_id, "focus target not rendered, skipping");
        }
        focused
    }
}
