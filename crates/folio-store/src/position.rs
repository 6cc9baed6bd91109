//! Display position ↔ sequence index translation.
//!
//! The rendering layer numbers blocks from 1 (slot 0 is the page header row),
//! while everything in this crate is 0-based. This module is the only place
//! the two meet; nothing else adds or subtracts one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, StoreError};

/// A 1-based position as reported by the rendering layer (drag source or drop
/// destination). Position 1 is the first block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayPosition(pub usize);

impl fmt::Display for DisplayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Translate a display position into a 0-based index over `len` blocks.
///
/// Valid positions are `1..=len`. Position 0 (the header row) and anything
/// past the last block are rejected.
pub fn display_to_index(position: DisplayPosition, len: usize) -> Result<usize> {
    match position.0 {
        p if p >= 1 && p <= len => Ok(p - 1),
        p => Err(StoreError::DisplayPositionOutOfRange { position: p, len }),
    }
}

/// Translate a 0-based index into the position the rendering layer shows.
pub fn index_to_display(index: usize) -> DisplayPosition {
    DisplayPosition(index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_block() {
        assert_eq!(display_to_index(DisplayPosition(1), 3).unwrap(), 0);
        assert_eq!(index_to_display(0), DisplayPosition(1));
    }

    #[test]
    fn test_last_block() {
        assert_eq!(display_to_index(DisplayPosition(3), 3).unwrap(), 2);
        assert_eq!(index_to_display(2), DisplayPosition(3));
    }

    #[test]
    fn test_header_row_rejected() {
        assert_eq!(
            display_to_index(DisplayPosition(0), 3).unwrap_err(),
            StoreError::DisplayPositionOutOfRange { position: 0, len: 3 }
        );
    }

    #[test]
    fn test_past_end_rejected() {
        assert_eq!(
            display_to_index(DisplayPosition(4), 3).unwrap_err(),
            StoreError::DisplayPositionOutOfRange { position: 4, len: 3 }
        );
    }

    #[test]
    fn test_empty_sequence_rejects_everything() {
        assert!(display_to_index(DisplayPosition(1), 0).is_err());
    }

    #[test]
    fn test_roundtrip_all_positions() {
        let len = 5;
        for index in 0..len {
            assert_eq!(display_to_index(index_to_display(index), len).unwrap(), index);
        }
    }
}
