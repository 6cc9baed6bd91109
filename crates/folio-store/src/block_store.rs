//! Block store — pure transformations over block snapshots.
//!
//! Every operation takes the current [`Snapshot`] by reference and returns a
//! brand-new one; the input is never touched. The store keeps no state of its
//! own between calls, so the caller owns "current" and can hold on to the
//! previous snapshot for before/after diffing.
//!
//! Block positions are always resolved by identity (`position_of`) inside
//! the operation itself. Callers pass IDs, not indices, for everything except
//! `move_block`, whose indices come straight from a drag gesture and have
//! already been translated by [`crate::position`].

use tracing::trace;

use crate::{Block, BlockId, BlockTag, Result, Snapshot, StoreError};

/// Namespace for the block list transformations.
pub struct BlockStore;

impl BlockStore {
    // =========================================================================
    // Content Mutation
    // =========================================================================

    /// Replace a block's tag and content in place.
    ///
    /// Order and count are unchanged. Idempotent: applying the same update
    /// twice yields the same sequence as applying it once.
    pub fn update(
        blocks: &Snapshot,
        block_id: &BlockId,
        tag: BlockTag,
        content: impl Into<String>,
    ) -> Result<Snapshot> {
        let index = blocks
            .position_of(block_id)
            .ok_or_else(|| StoreError::BlockNotFound(block_id.clone()))?;

        let mut next = blocks.to_vec();
        let block = &mut next[index];
        block.tag = tag;
        block.content = content.into();

        trace!(block = %block_id, index, "updated block");
        Ok(Snapshot::from_vec(next))
    }

    // =========================================================================
    // Structural Mutation
    // =========================================================================

    /// Split/add: rewrite the anchor block and insert `new_block` right after it.
    ///
    /// The anchor keeps its identity and takes `updated_tag`/`updated_content`
    /// (the head of a split); `new_block` carries the tail. Returns the new
    /// snapshot and the new block's ID.
    pub fn insert_after(
        blocks: &Snapshot,
        block_id: &BlockId,
        new_block: Block,
        updated_tag: BlockTag,
        updated_content: impl Into<String>,
    ) -> Result<(Snapshot, BlockId)> {
        let index = blocks
            .position_of(block_id)
            .ok_or_else(|| StoreError::BlockNotFound(block_id.clone()))?;
        if blocks.contains(&new_block.id) {
            return Err(StoreError::DuplicateBlock(new_block.id));
        }

        let new_id = new_block.id.clone();
        let mut next = Vec::with_capacity(blocks.len() + 1);
        next.extend_from_slice(&blocks[..=index]);
        next[index].tag = updated_tag;
        next[index].content = updated_content.into();
        next.push(new_block);
        next.extend_from_slice(&blocks[index + 1..]);

        trace!(anchor = %block_id, new_block = %new_id, index, "inserted block");
        Ok((Snapshot::from_vec(next), new_id))
    }

    /// Remove a block.
    ///
    /// Removing the only block is allowed here; keeping at least one block on
    /// screen is an editor policy, not a store rule.
    pub fn delete(blocks: &Snapshot, block_id: &BlockId) -> Result<Snapshot> {
        let index = blocks
            .position_of(block_id)
            .ok_or_else(|| StoreError::BlockNotFound(block_id.clone()))?;

        let mut next = blocks.to_vec();
        next.remove(index);

        trace!(block = %block_id, index, "deleted block");
        Ok(Snapshot::from_vec(next))
    }

    /// Move the block at `from_index` so it ends up at `to_index`.
    ///
    /// `to_index` is a position in the resulting sequence. A cancelled drag
    /// (`None`) or a drop onto the origin returns `blocks` itself — the same
    /// snapshot, so nothing downstream sees a change.
    pub fn move_block(
        blocks: &Snapshot,
        from_index: usize,
        to_index: Option<usize>,
    ) -> Result<Snapshot> {
        let len = blocks.len();
        let Some(to_index) = to_index else {
            return Ok(blocks.clone());
        };
        if from_index >= len {
            return Err(StoreError::IndexOutOfRange { index: from_index, len });
        }
        if to_index >= len {
            return Err(StoreError::IndexOutOfRange { index: to_index, len });
        }
        if from_index == to_index {
            return Ok(blocks.clone());
        }

        let mut next = blocks.to_vec();
        let moved = next.remove(from_index);
        next.insert(to_index, moved);

        trace!(from_index, to_index, "moved block");
        Ok(Snapshot::from_vec(next))
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::Rng;

    fn id(s: &str) -> BlockId {
        BlockId::parse(s).unwrap()
    }

    fn block(s: &str, tag: BlockTag, content: &str) -> Block {
        Block::with_id(id(s), tag, content)
    }

    /// `[{1,h1,Title}, {2,p,Body}]`
    fn title_body() -> Snapshot {
        Snapshot::from_blocks(vec![
            block("1", BlockTag::Heading1, "Title"),
            block("2", BlockTag::Paragraph, "Body"),
        ])
        .unwrap()
    }

    fn letters(n: usize) -> Snapshot {
        let blocks = (0..n)
            .map(|i| {
                let name = ((b'a' + i as u8) as char).to_string();
                block(&name, BlockTag::Paragraph, &name)
            })
            .collect();
        Snapshot::from_blocks(blocks).unwrap()
    }

    fn id_strs(snap: &Snapshot) -> Vec<String> {
        snap.iter().map(|b| b.id.to_string()).collect()
    }

    // ── insert_after ─────────────────────────────────────────────────────

    #[test]
    fn test_insert_after_example() {
        let s = title_body();
        let (next, new_id) = BlockStore::insert_after(
            &s,
            &id("1"),
            block("3", BlockTag::Paragraph, ""),
            BlockTag::Heading1,
            "Title",
        )
        .unwrap();

        assert_eq!(new_id, id("3"));
        assert_eq!(
            next.blocks(),
            &[
                block("1", BlockTag::Heading1, "Title"),
                block("3", BlockTag::Paragraph, ""),
                block("2", BlockTag::Paragraph, "Body"),
            ]
        );
        // Input untouched
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_insert_after_splits_anchor() {
        let s = Snapshot::from_blocks(vec![block("1", BlockTag::Paragraph, "Hello world")]).unwrap();
        let (next, _) = BlockStore::insert_after(
            &s,
            &id("1"),
            block("2", BlockTag::Paragraph, " world"),
            BlockTag::Paragraph,
            "Hello",
        )
        .unwrap();

        assert_eq!(next[0].content, "Hello");
        assert_eq!(next[1].content, " world");
        assert_eq!(s[0].content, "Hello world");
    }

    #[test]
    fn test_insert_after_last() {
        let s = title_body();
        let (next, _) = BlockStore::insert_after(
            &s,
            &id("2"),
            block("3", BlockTag::Paragraph, ""),
            BlockTag::Paragraph,
            "Body",
        )
        .unwrap();
        assert_eq!(id_strs(&next), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_insert_after_unknown_anchor() {
        let s = title_body();
        let err = BlockStore::insert_after(
            &s,
            &id("9"),
            block("3", BlockTag::Paragraph, ""),
            BlockTag::Paragraph,
            "",
        )
        .unwrap_err();
        assert_eq!(err, StoreError::BlockNotFound(id("9")));
    }

    #[test]
    fn test_insert_after_duplicate_id() {
        let s = title_body();
        let err = BlockStore::insert_after(
            &s,
            &id("1"),
            block("2", BlockTag::Paragraph, ""),
            BlockTag::Heading1,
            "Title",
        )
        .unwrap_err();
        assert_eq!(err, StoreError::DuplicateBlock(id("2")));
    }

    // ── delete ───────────────────────────────────────────────────────────

    #[test]
    fn test_delete_example() {
        let s = title_body();
        let next = BlockStore::delete(&s, &id("1")).unwrap();
        assert_eq!(next.blocks(), &[block("2", BlockTag::Paragraph, "Body")]);
    }

    #[test]
    fn test_delete_only_block_leaves_empty() {
        let s = letters(1);
        let next = BlockStore::delete(&s, &id("a")).unwrap();
        assert!(next.is_empty());
    }

    #[test]
    fn test_delete_unknown_block() {
        let s = title_body();
        assert_eq!(
            BlockStore::delete(&s, &id("nope")).unwrap_err(),
            StoreError::BlockNotFound(id("nope"))
        );
    }

    // ── update ───────────────────────────────────────────────────────────

    #[test]
    fn test_update_changes_only_target() {
        let s = title_body();
        let next = BlockStore::update(&s, &id("2"), BlockTag::Heading2, "Sub").unwrap();
        assert_eq!(next[0], s[0]);
        assert_eq!(next[1], block("2", BlockTag::Heading2, "Sub"));
        assert_eq!(next.len(), s.len());
    }

    #[test]
    fn test_update_is_idempotent() {
        let s = title_body();
        let once = BlockStore::update(&s, &id("1"), BlockTag::Heading3, "T").unwrap();
        let twice = BlockStore::update(&once, &id("1"), BlockTag::Heading3, "T").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_update_returns_new_snapshot() {
        let s = title_body();
        let next = BlockStore::update(&s, &id("1"), BlockTag::Heading1, "Title").unwrap();
        assert_eq!(next, s);
        assert!(!next.same(&s));
    }

    #[test]
    fn test_update_unknown_block() {
        let s = title_body();
        assert!(matches!(
            BlockStore::update(&s, &id("x"), BlockTag::Paragraph, ""),
            Err(StoreError::BlockNotFound(_))
        ));
    }

    // ── move_block ───────────────────────────────────────────────────────

    #[test]
    fn test_move_forward() {
        let s = letters(4);
        let next = BlockStore::move_block(&s, 0, Some(2)).unwrap();
        assert_eq!(id_strs(&next), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_move_backward() {
        let s = letters(4);
        let next = BlockStore::move_block(&s, 3, Some(0)).unwrap();
        assert_eq!(id_strs(&next), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_move_same_index_is_noop() {
        let s = letters(3);
        let next = BlockStore::move_block(&s, 1, Some(1)).unwrap();
        assert!(next.same(&s));
    }

    #[test]
    fn test_move_cancelled_is_noop() {
        let s = letters(3);
        let next = BlockStore::move_block(&s, 1, None).unwrap();
        assert!(next.same(&s));
    }

    #[test]
    fn test_move_out_of_range() {
        let s = letters(3);
        assert_eq!(
            BlockStore::move_block(&s, 3, Some(0)).unwrap_err(),
            StoreError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(
            BlockStore::move_block(&s, 0, Some(5)).unwrap_err(),
            StoreError::IndexOutOfRange { index: 5, len: 3 }
        );
    }

    // ── Properties ───────────────────────────────────────────────────────

    #[test]
    fn test_move_roundtrip_restores_order_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let n = rng.gen_range(2..12);
            let s = letters(n);
            let i = rng.gen_range(0..n);
            let mut j = rng.gen_range(0..n);
            if i == j {
                j = (j + 1) % n;
            }

            let moved = BlockStore::move_block(&s, i, Some(j)).unwrap();
            assert_eq!(moved.len(), n);
            let mut sorted_ids = moved.ids();
            sorted_ids.sort();
            assert_eq!(sorted_ids, s.ids());

            let back = BlockStore::move_block(&moved, j, Some(i)).unwrap();
            assert_eq!(back, s, "move({i},{j}) then move({j},{i}) on {n} blocks");
        }
    }

    #[test]
    fn test_delete_preserves_relative_order_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let n = rng.gen_range(1..12);
            let s = letters(n);
            let victim = s.ids().choose(&mut rng).cloned().unwrap();

            let next = BlockStore::delete(&s, &victim).unwrap();
            assert_eq!(next.len(), n - 1);
            assert!(!next.contains(&victim));

            let expected: Vec<BlockId> = s.ids().into_iter().filter(|b| b != &victim).collect();
            assert_eq!(next.ids(), expected);
        }
    }

    #[test]
    fn test_insert_after_places_new_block_next_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let n = rng.gen_range(1..12);
            let s = letters(n);
            let anchor = s.ids().choose(&mut rng).cloned().unwrap();
            let new_block = Block::empty_paragraph();
            let new_id = new_block.id.clone();

            let (next, returned) =
                BlockStore::insert_after(&s, &anchor, new_block, BlockTag::Heading2, "head").unwrap();
            assert_eq!(returned, new_id);
            assert_eq!(next.len(), n + 1);

            let at = next.position_of(&anchor).unwrap();
            assert_eq!(next[at + 1].id, new_id);
            assert_eq!(next[at].content, "head");
        }
    }
}
