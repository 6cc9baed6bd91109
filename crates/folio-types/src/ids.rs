//! Typed identifiers for blocks and pages.
//!
//! Both ID types wrap an opaque string. Freshly minted block IDs are UUIDv7
//! (time-ordered) rendered as 32 hex chars, but hydrated IDs are accepted
//! verbatim — pages written by the legacy backend carry 24-char ObjectId hex,
//! and those must round-trip untouched. The `short()` form (first 8 chars) is
//! for logs and human-facing output only — never used as a lookup key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error from parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("{0} must not be empty")]
    EmptyId(&'static str),
}

/// A block identifier. Stable for the block's lifetime, never reused.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockId(String);

/// A page identifier, supplied externally.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageId(String);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_opaque_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Parse an externally supplied identifier.
            ///
            /// Any non-empty string is accepted verbatim.
            pub fn parse(s: &str) -> Result<Self, TypeError> {
                if s.is_empty() {
                    return Err(TypeError::EmptyId($name));
                }
                Ok(Self(s.to_string()))
            }

            /// The raw identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First 8 characters — for human display only, not lookup.
            pub fn short(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((idx, _)) => &self.0[..idx],
                    None => &self.0,
                }
            }
        }

        impl std::str::FromStr for $T {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $T {
            type Error = TypeError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$T> for String {
            fn from(id: $T) -> String {
                id.0
            }
        }

        impl AsRef<str> for $T {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.short())
            }
        }
    };
}

impl_opaque_id!(BlockId, "BlockId");
impl_opaque_id!(PageId, "PageId");

impl BlockId {
    /// Mint a new time-ordered block ID (UUIDv7, 32 hex chars, no hyphens).
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_simple().to_string())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
