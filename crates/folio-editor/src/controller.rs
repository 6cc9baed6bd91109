//! Page controller — owns the current block list and applies intents to it.
//!
//! Every intent runs to completion on the caller: resolve the acting block by
//! ID, ask [`BlockStore`] for the next snapshot, commit it, move focus for
//! structural changes, and tell the [`ChangeSink`] what changed. Persistence
//! happens behind the sink and is never awaited here.
//!
//! A rejected intent (unknown block, out-of-range drag, deleting the last
//! block) is logged and leaves the page untouched.

use folio_store::{display_to_index, BlockStore, DisplayPosition, Snapshot, StoreError};
use folio_sync::SyncHandle;
use folio_types::{Block, BlockId, BlockTag, Page, PageId};
use tracing::{debug, error, warn};

use crate::focus::{FocusRequest, FocusTarget, FocusTracker};
use crate::intent::IntentEvent;

/// Errors from applying an intent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("refusing to delete the only block {0}")]
    LastBlock(BlockId),
}

/// Controller policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Refuse to delete the only remaining block, so a page never goes empty.
    pub keep_last_block: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { keep_last_block: true }
    }
}

/// Receives every committed transition.
pub trait ChangeSink {
    fn snapshot_committed(&self, page_id: &PageId, previous: Option<&Snapshot>, current: &Snapshot);
}

impl ChangeSink for SyncHandle {
    fn snapshot_committed(&self, page_id: &PageId, previous: Option<&Snapshot>, current: &Snapshot) {
        self.notify(page_id, previous, current);
    }
}

/// What an accepted intent did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new snapshot was committed.
    Committed {
        /// Block created by a split/add.
        created: Option<BlockId>,
        /// Where focus was sent, if the change moved it.
        focus: Option<FocusRequest>,
    },
    /// Nothing changed (cancelled drag, drop onto the origin).
    Unchanged,
}

pub struct PageController<S, F> {
    page_id: PageId,
    current: Snapshot,
    /// The snapshot `current` replaced, kept for one step.
    previous: Option<Snapshot>,
    acting_block: Option<BlockId>,
    config: ControllerConfig,
    sink: S,
    focus: F,
}

impl<S: ChangeSink, F: FocusTarget> PageController<S, F> {
    /// Hydrate from a page fetched elsewhere. Hydration is not a change and
    /// is not reported to the sink.
    pub fn new(page: Page, sink: S, focus: F) -> Result<Self, ControllerError> {
        Self::with_config(page, ControllerConfig::default(), sink, focus)
    }

    pub fn with_config(
        page: Page,
        config: ControllerConfig,
        sink: S,
        focus: F,
    ) -> Result<Self, ControllerError> {
        let current = Snapshot::from_blocks(page.blocks)?;
        debug!(page = %page.id, blocks = current.len(), "hydrated page");
        Ok(Self {
            page_id: page.id,
            current,
            previous: None,
            acting_block: None,
            config,
            sink,
            focus,
        })
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    pub fn blocks(&self) -> &Snapshot {
        &self.current
    }

    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    /// Block the most recent accepted intent acted on.
    pub fn acting_block(&self) -> Option<&BlockId> {
        self.acting_block.as_ref()
    }

    /// The current state as a page value.
    pub fn page(&self) -> Page {
        Page::new(self.page_id.clone(), self.current.to_vec())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn focus_target(&self) -> &F {
        &self.focus
    }

    pub fn focus_target_mut(&mut self) -> &mut F {
        &mut self.focus
    }

    /// Apply one intent. Rejections are logged here; the caller may ignore
    /// the error.
    pub fn handle(&mut self, event: IntentEvent) -> Result<Outcome, ControllerError> {
        let kind = event.kind();
        let result = match event {
            IntentEvent::Edit { block_id, tag, content } => self.on_edit(&block_id, tag, content),
            IntentEvent::Add { block_id, tag, content } => self.on_add(&block_id, tag, content),
            IntentEvent::Delete { block_id } => self.on_delete(&block_id),
            IntentEvent::Reorder {
                source_index,
                destination_index,
            } => self.on_reorder(source_index, destination_index),
        };

        if let Err(err) = &result {
            match err {
                ControllerError::LastBlock(_) => {
                    warn!(page = %self.page_id, intent = kind, "{err}");
                }
                ControllerError::Store(_) => {
                    error!(page = %self.page_id, intent = kind, "intent rejected: {err}");
                }
            }
        }
        result
    }

    /// Replace a block's tag and content.
    pub fn on_edit(
        &mut self,
        block_id: &BlockId,
        tag: BlockTag,
        content: impl Into<String>,
    ) -> Result<Outcome, ControllerError> {
        let next = BlockStore::update(&self.current, block_id, tag, content)?;
        self.commit(block_id.clone(), next);
        Ok(Outcome::Committed {
            created: None,
            focus: None,
        })
    }

    /// Split: the acting block keeps `content`, an empty paragraph follows
    /// it and takes focus.
    pub fn on_add(
        &mut self,
        block_id: &BlockId,
        tag: BlockTag,
        content: impl Into<String>,
    ) -> Result<Outcome, ControllerError> {
        let (next, created) =
            BlockStore::insert_after(&self.current, block_id, Block::empty_paragraph(), tag, content)?;
        self.commit(block_id.clone(), next);
        let focus = self.move_focus();
        Ok(Outcome::Committed {
            created: Some(created),
            focus,
        })
    }

    /// Remove a block; focus goes to the end of the block above it.
    pub fn on_delete(&mut self, block_id: &BlockId) -> Result<Outcome, ControllerError> {
        if self.config.keep_last_block && self.current.len() == 1 && self.current.contains(block_id) {
            return Err(ControllerError::LastBlock(block_id.clone()));
        }
        let next = BlockStore::delete(&self.current, block_id)?;
        self.commit(block_id.clone(), next);
        let focus = self.move_focus();
        Ok(Outcome::Committed { created: None, focus })
    }

    /// Finish a drag. Positions are the view's 1-based ones.
    pub fn on_reorder(
        &mut self,
        source: DisplayPosition,
        destination: Option<DisplayPosition>,
    ) -> Result<Outcome, ControllerError> {
        let Some(destination) = destination else {
            debug!(page = %self.page_id, %source, "drag cancelled");
            return Ok(Outcome::Unchanged);
        };
        let len = self.current.len();
        let from = display_to_index(source, len)?;
        let to = display_to_index(destination, len)?;

        let next = BlockStore::move_block(&self.current, from, Some(to))?;
        if next.same(&self.current) {
            debug!(page = %self.page_id, %source, "drag ended without a move");
            return Ok(Outcome::Unchanged);
        }
        let moved = self.current[from].id.clone();
        self.commit(moved, next);
        Ok(Outcome::Committed {
            created: None,
            focus: None,
        })
    }

    fn commit(&mut self, acting: BlockId, next: Snapshot) {
        self.acting_block = Some(acting);
        self.previous = Some(std::mem::replace(&mut self.current, next));
        self.sink
            .snapshot_committed(&self.page_id, self.previous.as_ref(), &self.current);
    }

    /// Diff the last transition and hand any focus move to the view.
    fn move_focus(&mut self) -> Option<FocusRequest> {
        let previous = self.previous.as_ref()?;
        let acting = self.acting_block.as_ref()?;
        let request = FocusTracker::transition(previous, &self.current, acting)?;
        FocusTracker::apply(&request, &mut self.focus);
        Some(request)
    }
}
