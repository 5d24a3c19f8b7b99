//! Sliding piece attacks by flood fill.
//!
//! Each ray starts one step from its origins and is re-shifted through empty
//! squares for the longest possible span. The frontier stops at the first
//! occupied square, which is still part of the ray; `not_own` then drops it
//! when it holds a friendly piece.

use crate::bitboard::{BitBoard, Direction};

const MAX_SPAN: usize = 7;

/// The squares reachable along `dir` from every origin in `origins`.
pub fn expand(origins: BitBoard, dir: Direction, free: BitBoard, not_own: BitBoard) -> BitBoard {
    let mut ray = origins.shift(dir);
    let mut frontier = ray & free;
    for _ in 1..MAX_SPAN {
        frontier = frontier.shift(dir);
        ray |= frontier;
        frontier &= free;
    }
    ray & not_own
}

fn expand_all(
    origins: BitBoard,
    dirs: &[Direction; 4],
    free: BitBoard,
    not_own: BitBoard,
) -> BitBoard {
    dirs.iter().fold(BitBoard::empty(), |acc, &dir| {
        acc | expand(origins, dir, free, not_own)
    })
}

pub fn bishop_attacks(bishops: BitBoard, free: BitBoard, not_own: BitBoard) -> BitBoard {
    expand_all(bishops, &Direction::DIAGONAL, free, not_own)
}

pub fn rook_attacks(rooks: BitBoard, free: BitBoard, not_own: BitBoard) -> BitBoard {
    expand_all(rooks, &Direction::ORTHOGONAL, free, not_own)
}

pub fn queen_attacks(queens: BitBoard, free: BitBoard, not_own: BitBoard) -> BitBoard {
    bishop_attacks(queens, free, not_own) | rook_attacks(queens, free, not_own)
}
