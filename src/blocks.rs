//! Blocks and the piles they are stacked in.
//!
//! A pile stores its blocks bottom-to-top, so index 0 is the block resting on
//! the table and the last element is the clear block on top.

use std::fmt;
use std::sync::Arc;

use crate::error::PileError;

/// A uniquely named block.
///
/// Cloning is cheap: every clone shares the same name allocation, so the
/// catalogue built when a problem is read is reused across the whole search.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Block(Arc<str>);

impl Block {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered stack of blocks.
///
/// Equality and ordering are order-sensitive: `[A, B]` and `[B, A]` are
/// different piles. The derived `Ord` is the canonical key used when a
/// configuration is normalized.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pile {
    blocks: Vec<Block>,
}

impl Pile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pile from blocks listed bottom-to-top.
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        Self {
            blocks: blocks.into_iter().collect(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Removes the top block. Popping an empty pile does nothing.
    pub fn pop(&mut self) -> Option<Block> {
        self.blocks.pop()
    }

    /// Returns the top block without removing it.
    pub fn peek(&self) -> Result<&Block, PileError> {
        self.blocks.last().ok_or(PileError::EmptyAccess)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block at `index`, counted from the bottom.
    pub fn block_at(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Position of `block` counted from the bottom.
    pub fn index_of(&self, block: &Block) -> Option<usize> {
        self.blocks.iter().position(|b| b == block)
    }

    pub fn contains(&self, block: &Block) -> bool {
        self.blocks.contains(block)
    }

    /// Blocks from bottom to top.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }
}

impl<'a> IntoIterator for &'a Pile {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

impl fmt::Display for Pile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{block}")?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for Pile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pile(names: &[&str]) -> Pile {
        Pile::from_blocks(names.iter().map(|name| Block::new(name)))
    }

    #[test]
    fn test_blocks_compare_by_name() {
        assert_eq!(Block::new("A"), Block::new("A"));
        assert_ne!(Block::new("A"), Block::new("B"));
    }

    #[test]
    fn test_push_pop_peek() {
        let mut p = Pile::new();
        assert!(p.is_empty());
        assert_eq!(p.peek(), Err(PileError::EmptyAccess));

        p.push(Block::new("A"));
        p.push(Block::new("B"));
        assert_eq!(p.len(), 2);
        assert_eq!(p.peek().unwrap().name(), "B");

        assert_eq!(p.pop(), Some(Block::new("B")));
        assert_eq!(p.pop(), Some(Block::new("A")));
        assert_eq!(p.pop(), None, "popping an empty pile is a no-op");
        assert!(p.is_empty());
    }

    #[test]
    fn test_positional_lookup() {
        let p = pile(&["C", "B", "A"]);
        assert_eq!(p.block_at(0), Some(&Block::new("C")));
        assert_eq!(p.block_at(3), None);
        assert_eq!(p.index_of(&Block::new("A")), Some(2));
        assert_eq!(p.index_of(&Block::new("D")), None);
        assert!(p.contains(&Block::new("B")));
        assert!(!p.contains(&Block::new("D")));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        assert_eq!(pile(&["A", "B"]), pile(&["A", "B"]));
        assert_ne!(pile(&["A", "B"]), pile(&["B", "A"]));
    }

    #[test]
    fn test_display() {
        assert_eq!(pile(&["C", "B", "A"]).to_string(), "[C, B, A]");
        assert_eq!(Pile::new().to_string(), "[]");
    }
}
