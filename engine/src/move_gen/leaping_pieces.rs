//! Pawn, knight and king attack sets.
//!
//! Every function works on a whole set of origin squares at once, so the
//! same call answers "where can this knight go" and "which squares do all
//! of black's knights attack".

use strum::IntoEnumIterator;

use crate::bitboard::{
    BitBoard, Direction, NOT_FILE_A, NOT_FILE_AB, NOT_FILE_GH, NOT_FILE_H, RANK_1, RANK_3, RANK_6,
    RANK_8,
};
use crate::position::Side;

/// Knight jumps as (shift, origins that can make it without wrapping). Positive
/// shifts move towards rank 8.
const KNIGHT_JUMPS: [(i8, BitBoard); 8] = [
    (17, NOT_FILE_H),
    (15, NOT_FILE_A),
    (10, NOT_FILE_GH),
    (6, NOT_FILE_AB),
    (-6, NOT_FILE_GH),
    (-10, NOT_FILE_AB),
    (-15, NOT_FILE_H),
    (-17, NOT_FILE_A),
];

const fn last_rank(side: Side) -> BitBoard {
    match side {
        Side::White => RANK_8,
        Side::Black => RANK_1,
    }
}

/// Single pushes onto empty squares, excluding the promotion rank.
pub fn pawn_push(pawns: BitBoard, side: Side, free: BitBoard) -> BitBoard {
    pawns.shift(side.forward()) & free & !last_rank(side)
}

/// Two square pushes from the starting rank, through and onto empty squares.
pub fn pawn_double_push(pawns: BitBoard, side: Side, free: BitBoard) -> BitBoard {
    let first_step_rank = match side {
        Side::White => RANK_3,
        Side::Black => RANK_6,
    };
    let first_step = pawns.shift(side.forward()) & free & first_step_rank;
    first_step.shift(side.forward()) & free
}

/// Single pushes that land on the promotion rank.
pub fn pawn_promo_push(pawns: BitBoard, side: Side, free: BitBoard) -> BitBoard {
    pawns.shift(side.forward()) & free & last_rank(side)
}

/// Every square diagonally in front of `pawns`, occupied or not.
pub fn pawn_attacks(pawns: BitBoard, side: Side) -> BitBoard {
    match side {
        Side::White => pawns.shift(Direction::NorthWest) | pawns.shift(Direction::NorthEast),
        Side::Black => pawns.shift(Direction::SouthWest) | pawns.shift(Direction::SouthEast),
    }
}

/// Diagonal captures onto `targets`, excluding the promotion rank.
pub fn pawn_captures(pawns: BitBoard, side: Side, targets: BitBoard) -> BitBoard {
    pawn_attacks(pawns, side) & targets & !last_rank(side)
}

/// Diagonal captures onto `targets` that land on the promotion rank.
pub fn pawn_promo_attacks(pawns: BitBoard, side: Side, targets: BitBoard) -> BitBoard {
    pawn_attacks(pawns, side) & targets & last_rank(side)
}

pub fn knight_attacks(knights: BitBoard, not_own: BitBoard) -> BitBoard {
    KNIGHT_JUMPS
        .iter()
        .fold(BitBoard::empty(), |acc, &(shift, guard)| {
            let origins = knights & guard;
            let jumped = if shift > 0 {
                origins.shl(shift as u32)
            } else {
                origins.shr(shift.unsigned_abs() as u32)
            };
            acc | jumped
        })
        & not_own
}

pub fn king_attacks(king: BitBoard, not_own: BitBoard) -> BitBoard {
    Direction::iter().fold(BitBoard::empty(), |acc, dir| acc | king.shift(dir)) & not_own
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::{self, *};
    use test_case::test_case;

    fn sq(square: Square) -> BitBoard {
        BitBoard::from_square(square)
    }

    #[test_case(A1, BitBoard::from_squares(&[B3, C2]) ; "corner a1")]
    #[test_case(H8, BitBoard::from_squares(&[G6, F7]) ; "corner h8")]
    #[test_case(D4, BitBoard::from_squares(&[C2, E2, B3, F3, B5, F5, C6, E6]) ; "center")]
    #[test_case(B1, BitBoard::from_squares(&[A3, C3, D2]) ; "b file no wrap")]
    #[test_case(G8, BitBoard::from_squares(&[H6, F6, E7]) ; "g file no wrap")]
    fn test_knight_attacks(square: Square, want: BitBoard) {
        assert_eq!(knight_attacks(sq(square), BitBoard::full()), want);
    }

    #[test]
    fn test_knight_attacks_total() {
        let total: u32 = Square::iter()
            .map(|s| knight_attacks(sq(s), BitBoard::full()).num_squares_set())
            .sum();
        assert_eq!(total, 336);
    }

    #[test]
    fn test_knight_attacks_not_own() {
        let own = BitBoard::from_squares(&[B3]);
        assert_eq!(knight_attacks(sq(A1), !own), sq(C2));
    }

    #[test_case(A1, BitBoard::from_squares(&[A2, B1, B2]) ; "corner")]
    #[test_case(H4, BitBoard::from_squares(&[H5, H3, G3, G4, G5]) ; "h edge")]
    #[test_case(E4, BitBoard::from_squares(&[D3, E3, F3, D4, F4, D5, E5, F5]) ; "center")]
    fn test_king_attacks(square: Square, want: BitBoard) {
        assert_eq!(king_attacks(sq(square), BitBoard::full()), want);
    }

    #[test]
    fn test_king_attacks_total() {
        let total: u32 = Square::iter()
            .map(|s| king_attacks(sq(s), BitBoard::full()).num_squares_set())
            .sum();
        assert_eq!(total, 420);
    }

    #[test]
    fn test_pawn_pushes_white() {
        let pawns = BitBoard::from_squares(&[A2, E2, H7]);
        let free = !BitBoard::from_squares(&[A3]);

        assert_eq!(pawn_push(pawns, Side::White, free), sq(E3));
        assert_eq!(pawn_double_push(pawns, Side::White, free), sq(E4));
        assert_eq!(pawn_promo_push(pawns, Side::White, free), sq(H8));
    }

    #[test]
    fn test_pawn_pushes_black() {
        let pawns = BitBoard::from_squares(&[C7, D7, B2]);
        let free = !BitBoard::from_squares(&[D5]);

        assert_eq!(pawn_push(pawns, Side::Black, free), BitBoard::from_squares(&[C6, D6]));
        assert_eq!(pawn_double_push(pawns, Side::Black, free), sq(C5));
        assert_eq!(pawn_promo_push(pawns, Side::Black, free), sq(B1));
    }

    #[test]
    fn test_pawn_double_push_only_from_start_rank() {
        let pawns = BitBoard::from_squares(&[D3]);
        assert!(pawn_double_push(pawns, Side::White, BitBoard::full()).is_empty());
    }

    #[test_case(A2, Side::White, BitBoard::from_squares(&[B3]) ; "white a file")]
    #[test_case(H2, Side::White, BitBoard::from_squares(&[G3]) ; "white h file")]
    #[test_case(D5, Side::White, BitBoard::from_squares(&[C6, E6]) ; "white center")]
    #[test_case(A7, Side::Black, BitBoard::from_squares(&[B6]) ; "black a file")]
    #[test_case(H7, Side::Black, BitBoard::from_squares(&[G6]) ; "black h file")]
    fn test_pawn_attacks(square: Square, side: Side, want: BitBoard) {
        assert_eq!(pawn_attacks(sq(square), side), want);
    }

    #[test]
    fn test_pawn_captures_split_promotions() {
        let pawns = BitBoard::from_squares(&[B7, E5]);
        let targets = BitBoard::from_squares(&[A8, C8, D6, F6]);

        assert_eq!(
            pawn_captures(pawns, Side::White, targets),
            BitBoard::from_squares(&[D6, F6])
        );
        assert_eq!(
            pawn_promo_attacks(pawns, Side::White, targets),
            BitBoard::from_squares(&[A8, C8])
        );
    }
}
