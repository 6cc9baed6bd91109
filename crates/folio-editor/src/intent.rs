//! User-intent events, as the rendering layer reports them.
//!
//! Wire form is JSON, internally tagged by `"type"` with camelCase fields:
//!
//! ```json
//! { "type": "edit",    "blockId": "b1", "tag": "h1", "content": "Title" }
//! { "type": "add",     "blockId": "b1", "tag": "p",  "content": "before caret" }
//! { "type": "delete",  "blockId": "b2" }
//! { "type": "reorder", "sourceIndex": 1, "destinationIndex": 3 }
//! ```
//!
//! Older views send `id` for `blockId` and `html` for `content`; both are
//! accepted.
//!
//! `tag` and `content` are required on edit and add. A partial event fails to
//! parse instead of blanking the block it names.

use folio_store::DisplayPosition;
use folio_types::{BlockId, BlockTag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum IntentEvent {
    /// Content or tag of a block changed.
    Edit {
        #[serde(alias = "id")]
        block_id: BlockId,
        tag: BlockTag,
        #[serde(alias = "html")]
        content: String,
    },
    /// Enter pressed in a block: it keeps `content` and a new empty block
    /// follows it.
    Add {
        #[serde(alias = "id")]
        block_id: BlockId,
        tag: BlockTag,
        #[serde(alias = "html")]
        content: String,
    },
    /// Backspace in an empty block.
    Delete {
        #[serde(alias = "id")]
        block_id: BlockId,
    },
    /// Drag-and-drop finished. No destination means the drag was cancelled.
    Reorder {
        source_index: DisplayPosition,
        #[serde(default)]
        destination_index: Option<DisplayPosition>,
    },
}

impl IntentEvent {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Edit { .. } => "edit",
            Self::Add { .. } => "add",
            Self::Delete { .. } => "delete",
            Self::Reorder { .. } => "reorder",
        }
    }

    /// The block the event names, if it names one directly.
    pub fn block_id(&self) -> Option<&BlockId> {
        match self {
            Self::Edit { block_id, .. } | Self::Add { block_id, .. } | Self::Delete { block_id } => {
                Some(block_id)
            }
            Self::Reorder { .. } => None,
        }
    }
}
