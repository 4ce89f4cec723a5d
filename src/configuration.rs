//! Configurations: one arrangement of every block into piles.
//!
//! A configuration keeps its piles in slot order, but identity ignores that
//! order. Empty piles are dropped and the rest are sorted by the derived
//! `Pile` ordering before two configurations are compared or hashed, so
//! `[[A, B], [C]]`, `[[C], [A, B]]` and `[[C], [], [A, B], []]` are the same
//! state while `[[B, A], [C]]` is not.

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHashMap;

use crate::blocks::{Block, Pile};

/// Normalized piles of a configuration, used as a visited-set key.
pub type StateKey = Vec<Pile>;

/// What a block rests on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Support {
    Table,
    Block(Block),
}

impl fmt::Display for Support {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Support::Table => f.write_str("table"),
            Support::Block(block) => write!(f, "{block}"),
        }
    }
}

/// An arrangement of all blocks into piles, plus search bookkeeping.
///
/// `g`, `h` and `f` belong to the strategy that produced the configuration
/// and take no part in equality or hashing.
#[derive(Clone, Default)]
pub struct Configuration {
    piles: Vec<Pile>,
    g: u32,
    h: u32,
    f: u32,
}

impl Configuration {
    pub fn new(piles: Vec<Pile>) -> Self {
        Self {
            piles,
            ..Self::default()
        }
    }

    /// Builds a configuration from block names, each pile listed bottom-to-top.
    pub fn from_names(piles: &[&[&str]]) -> Self {
        Self::new(
            piles
                .iter()
                .map(|names| Pile::from_blocks(names.iter().map(|name| Block::new(name))))
                .collect(),
        )
    }

    /// Piles in slot order, including empty ones.
    pub fn piles(&self) -> &[Pile] {
        &self.piles
    }

    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn h(&self) -> u32 {
        self.h
    }

    pub fn f(&self) -> u32 {
        self.f
    }

    /// Records path cost and estimate; `f` is kept equal to `g + h`.
    pub fn set_costs(&mut self, g: u32, h: u32) {
        self.g = g;
        self.h = h;
        self.f = g + h;
    }

    /// Number of blocks across all piles.
    pub fn block_count(&self) -> usize {
        self.piles.iter().map(Pile::len).sum()
    }

    pub fn non_empty_count(&self) -> usize {
        self.piles.iter().filter(|pile| !pile.is_empty()).count()
    }

    /// Every block, pile by pile from bottom to top.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.piles.iter().flat_map(Pile::iter)
    }

    /// All blocks sorted by name, for multiset comparisons.
    pub fn sorted_blocks(&self) -> Vec<Block> {
        let mut blocks: Vec<Block> = self.blocks().cloned().collect();
        blocks.sort();
        blocks
    }

    /// The pile holding the most blocks. Ties go to the earliest slot.
    pub fn find_largest_pile(&self) -> Option<&Pile> {
        self.piles
            .iter()
            .fold(None, |largest: Option<&Pile>, pile| match largest {
                Some(current) if current.len() >= pile.len() => Some(current),
                _ => Some(pile),
            })
    }

    /// Non-empty piles sorted into canonical order.
    pub fn normalized_piles(&self) -> Vec<&Pile> {
        let mut piles: Vec<&Pile> = self.piles.iter().filter(|pile| !pile.is_empty()).collect();
        piles.sort();
        piles
    }

    /// Drops empty piles and sorts the rest. Cost fields are carried over.
    pub fn normalize(&self) -> Configuration {
        Configuration {
            piles: self.canonical_key(),
            g: self.g,
            h: self.h,
            f: self.f,
        }
    }

    /// Owned normalized piles, suitable for hashing into a visited set.
    pub fn canonical_key(&self) -> StateKey {
        self.normalized_piles().into_iter().cloned().collect()
    }

    /// Removes every empty pile and appends exactly one spare slot.
    pub fn compact(&mut self) {
        self.piles.retain(|pile| !pile.is_empty());
        self.piles.push(Pile::new());
    }

    /// Every configuration reachable by one move.
    ///
    /// For each non-empty source pile `i` and each other pile `j`, the top
    /// block of `i` is moved onto `j` and the result is compacted so it ends
    /// with a single empty slot. Candidates are not deduplicated here; a
    /// configuration with `k` non-empty piles out of `n` yields `k * (n - 1)`
    /// of them.
    pub fn successors(&self) -> Vec<Configuration> {
        let pile_count = self.piles.len();
        let mut children =
            Vec::with_capacity(self.non_empty_count() * pile_count.saturating_sub(1));

        for (source, pile) in self.piles.iter().enumerate() {
            if pile.is_empty() {
                continue;
            }
            for destination in 0..pile_count {
                if destination == source {
                    continue;
                }
                let mut piles = self.piles.clone();
                if let Some(block) = piles[source].pop() {
                    piles[destination].push(block);
                }
                let mut child = Configuration::new(piles);
                child.compact();
                children.push(child);
            }
        }

        children
    }

    /// Support of every block: the block beneath it, or the table.
    pub fn supports(&self) -> FxHashMap<Block, Support> {
        let mut supports = FxHashMap::default();
        for pile in &self.piles {
            let mut below = Support::Table;
            for block in pile {
                supports.insert(block.clone(), below);
                below = Support::Block(block.clone());
            }
        }
        supports
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_piles() == other.normalized_piles()
    }
}

impl Eq for Configuration {}

impl Hash for Configuration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized_piles().hash(state);
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pile) in self.piles.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{pile}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} (g={}, h={}, f={})", self.g, self.h, self.f)
    }
}

/// Draws a configuration as side-by-side columns.
///
/// Non-empty piles appear in slot order with the table on the last line.
/// Empty cells show as '.', and every column is as wide as the longest
/// block name.
pub fn format_configuration(configuration: &Configuration) -> String {
    let piles: Vec<&Pile> = configuration
        .piles()
        .iter()
        .filter(|pile| !pile.is_empty())
        .collect();
    let height = configuration.find_largest_pile().map_or(0, Pile::len);
    let width = configuration
        .blocks()
        .map(|block| block.name().len())
        .max()
        .unwrap_or(1);

    let mut output = String::new();
    for level in (0..height).rev() {
        for (column, pile) in piles.iter().enumerate() {
            if column > 0 {
                output.push(' ');
            }
            match pile.block_at(level) {
                Some(block) => output.push_str(&format!("{:<width$}", block.name())),
                None => output.push_str(&format!("{:<width$}", ".")),
            }
        }
        output.push('\n');
    }

    let table_width = piles.len() * width + piles.len().saturating_sub(1);
    output.push_str(&"-".repeat(table_width.max(1)));
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of(configuration: &Configuration) -> u64 {
        let mut hasher = DefaultHasher::new();
        configuration.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_equality_ignores_pile_order_and_empty_piles() {
        let a = Configuration::from_names(&[&["A", "B"], &["C"]]);
        let b = Configuration::from_names(&[&["C"], &[], &["A", "B"], &[]]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_equality_respects_block_order() {
        let a = Configuration::from_names(&[&["A", "B"], &["C"]]);
        let c = Configuration::from_names(&[&["B", "A"], &["C"]]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_costs_are_not_part_of_identity() {
        let a = Configuration::from_names(&[&["A"], &["B"]]);
        let mut b = a.clone();
        b.set_costs(4, 7);
        assert_eq!(b.f(), 11);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let configurations = [
            Configuration::from_names(&[&["C"], &[], &["A", "B"], &[]]),
            Configuration::from_names(&[&[], &[]]),
            Configuration::from_names(&[&["D", "A"], &["C", "B"], &["E"]]),
        ];
        for configuration in &configurations {
            let once = configuration.normalize();
            let twice = once.normalize();
            assert_eq!(once.piles(), twice.piles());
            assert!(once.piles().iter().all(|pile| !pile.is_empty()));
        }
    }

    #[test]
    fn test_successor_count() {
        // two non-empty piles plus one spare slot: 2 * (3 - 1)
        let configuration = Configuration::from_names(&[&["A", "B"], &["C"], &[]]);
        assert_eq!(configuration.successors().len(), 4);

        // initial layouts may carry several empty slots
        let padded = Configuration::from_names(&[&["C", "B", "A"], &[], &[]]);
        assert_eq!(padded.successors().len(), 2);
    }

    #[test]
    fn test_successors_conserve_blocks() {
        let configuration = Configuration::from_names(&[&["D", "A"], &["C", "B"], &[]]);
        let expected = configuration.sorted_blocks();
        for child in configuration.successors() {
            assert_eq!(child.sorted_blocks(), expected);
        }
    }

    #[test]
    fn test_successors_keep_one_spare_slot() {
        let configuration = Configuration::from_names(&[&["A"], &["B"], &[], &[]]);
        for child in configuration.successors() {
            let empty = child.piles().iter().filter(|pile| pile.is_empty()).count();
            assert_eq!(empty, 1, "{child}");
            assert_eq!(child.piles().last().map(Pile::is_empty), Some(true));
        }
    }

    #[test]
    fn test_successors_of_tower() {
        let configuration = Configuration::from_names(&[&["C", "B", "A"], &[]]);
        let children = configuration.successors();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0], Configuration::from_names(&[&["C", "B"], &["A"]]));
    }

    #[test]
    fn test_find_largest_pile() {
        let configuration = Configuration::from_names(&[&["A"], &["D", "C", "B"], &[]]);
        assert_eq!(configuration.find_largest_pile().map(Pile::len), Some(3));
        assert!(Configuration::default().find_largest_pile().is_none());
    }

    #[test]
    fn test_supports() {
        let configuration = Configuration::from_names(&[&["C", "B"], &["A"]]);
        let supports = configuration.supports();
        assert_eq!(supports[&Block::new("C")], Support::Table);
        assert_eq!(supports[&Block::new("B")], Support::Block(Block::new("C")));
        assert_eq!(supports[&Block::new("A")], Support::Table);
    }

    #[test]
    fn test_format_configuration() {
        let configuration = Configuration::from_names(&[&["C", "B", "A"], &[], &["D"]]);
        insta::assert_snapshot!(format_configuration(&configuration), @r"
        A .
        B .
        C D
        ---
        ");
    }
}
