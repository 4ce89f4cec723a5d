//! Moves between consecutive configurations and the move-log file.
//!
//! A move is recovered by comparing what every block rests on before and
//! after, so it does not depend on how either configuration orders its
//! piles. Log format, one record per line:
//!
//! ```text
//! MOVE(A, B, table)
//! ```
//!
//! meaning block `A` was lifted off `B` and put on the table.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::blocks::Block;
use crate::configuration::{Configuration, Support};
use crate::error::SearchError;

/// Relocation of one clear block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub block: Block,
    pub from: Support,
    pub to: Support,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MOVE({}, {}, {})", self.block, self.from, self.to)
    }
}

/// The single move turning `before` into `after`.
///
/// Returns `None` when the configurations are equal or differ by more than
/// one block.
pub fn move_between(before: &Configuration, after: &Configuration) -> Option<Move> {
    let previous = before.supports();
    let next = after.supports();
    if previous.len() != next.len() {
        return None;
    }

    let mut changed = before.blocks().filter_map(|block| {
        let from = previous.get(block)?;
        let to = next.get(block)?;
        (from != to).then(|| Move {
            block: block.clone(),
            from: from.clone(),
            to: to.clone(),
        })
    });

    let single = changed.next()?;
    changed.next().is_none().then_some(single)
}

/// Moves along a solution path, one per consecutive pair.
///
/// Fails on the first step that is not exactly one move, so the log always
/// lines up with the path.
pub fn path_moves(path: &[Configuration]) -> Result<Vec<Move>, SearchError> {
    path.windows(2)
        .enumerate()
        .map(|(i, pair)| {
            move_between(&pair[0], &pair[1]).ok_or(SearchError::BrokenPath { step: i + 1 })
        })
        .collect()
}

/// Renders moves one per line.
pub fn format_move_log(moves: &[Move]) -> String {
    moves.iter().map(|m| format!("{m}\n")).collect()
}

/// Writes the move log to `path`, replacing any existing file.
pub fn write_move_log(path: &Path, moves: &[Move]) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for m in moves {
        writeln!(file, "{m}")?;
    }
    file.flush()
}
