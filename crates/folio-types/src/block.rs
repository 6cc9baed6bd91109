//! Block record and its semantic tag.
//!
//! ## Design: tag is open-ended
//!
//! `BlockTag` names the handful of tags the editor offers (paragraph and three
//! heading levels), but the remote store may hold anything the rendering layer
//! ever wrote. Unknown tags land in `BlockTag::Custom` and serialize back
//! byte-for-byte, so a hydrate → edit → persist cycle never rewrites a tag the
//! editor doesn't understand.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::EnumString;

use crate::ids::BlockId;

/// Semantic type discriminator of a block.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, EnumString)]
pub enum BlockTag {
    /// Body text.
    #[default]
    #[strum(serialize = "p")]
    Paragraph,
    #[strum(serialize = "h1")]
    Heading1,
    #[strum(serialize = "h2")]
    Heading2,
    #[strum(serialize = "h3")]
    Heading3,
    /// Any tag the editor doesn't model, kept verbatim.
    #[strum(default)]
    Custom(String),
}

impl BlockTag {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            BlockTag::Paragraph => "p",
            BlockTag::Heading1 => "h1",
            BlockTag::Heading2 => "h2",
            BlockTag::Heading3 => "h3",
            BlockTag::Custom(s) => s,
        }
    }

    /// Parse from the wire representation. Never fails: unknown tags become
    /// [`BlockTag::Custom`].
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        <Self as FromStr>::from_str(s).unwrap_or_else(|_| BlockTag::Custom(s.to_string()))
    }

    /// Check if this is one of the heading levels.
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockTag::Heading1 | BlockTag::Heading2 | BlockTag::Heading3)
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(BlockTag::from_str(&s))
    }
}

/// A single content unit within a page.
///
/// Wire shape is `{ "id", "tag", "content" }`. The legacy backend stored the
/// same record as `{ "_id", "tag", "html" }`; both spellings deserialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(alias = "_id")]
    pub id: BlockId,
    #[serde(default)]
    pub tag: BlockTag,
    /// Rich-text payload (opaque markup).
    #[serde(default, alias = "html")]
    pub content: String,
}

impl Block {
    /// Create a block with a freshly minted ID.
    pub fn new(tag: BlockTag, content: impl Into<String>) -> Self {
        Self {
            id: BlockId::new(),
            tag,
            content: content.into(),
        }
    }

    /// Create a block with a known ID (hydration, tests).
    pub fn with_id(id: BlockId, tag: BlockTag, content: impl Into<String>) -> Self {
        Self {
            id,
            tag,
            content: content.into(),
        }
    }

    /// The block created by a split/add action: an empty paragraph.
    pub fn empty_paragraph() -> Self {
        Self::new(BlockTag::Paragraph, "")
    }

    /// Check if the content payload is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Content length in chars — the caret offset for "end of block".
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }
}
