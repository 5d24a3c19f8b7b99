use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use strum_macros::{Display, EnumIter, EnumString, FromRepr};

#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumString, FromRepr, Display, PartialOrd, Ord, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    pub const fn from_rank_file(rank: u8, file: u8) -> Option<Square> {
        if rank >= 8 || file >= 8 {
            return None;
        }
        Square::from_repr(rank * 8 + file)
    }

    pub const fn rank(self) -> u8 {
        self as u8 / 8
    }

    pub const fn file(self) -> u8 {
        self as u8 % 8
    }

    pub(crate) const fn abs_diff(self, other: Square) -> u8 {
        (self as u8).abs_diff(other as u8)
    }

    /// Parses the two character `file+rank` form, e.g. `e4`.
    pub fn from_coord(coord: &str) -> Option<Square> {
        let bytes = coord.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Square::from_rank_file(rank, file)
    }
}

/// A one step board direction. The discriminant is the bit shift amount.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Direction {
    North = 8,
    NorthEast = 9,
    East = 1,
    SouthEast = -7,
    South = -8,
    SouthWest = -9,
    West = -1,
    NorthWest = 7,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// Squares allowed to move in this direction without wrapping to the other edge.
    const fn guard(self) -> BitBoard {
        match self {
            Direction::East | Direction::NorthEast | Direction::SouthEast => NOT_FILE_H,
            Direction::West | Direction::NorthWest | Direction::SouthWest => NOT_FILE_A,
            Direction::North | Direction::South => BitBoard::full(),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct BitBoard(u64);

pub const FILE_A: BitBoard = BitBoard(0x0101_0101_0101_0101);
pub const FILE_H: BitBoard = BitBoard(0x8080_8080_8080_8080);
pub const NOT_FILE_A: BitBoard = BitBoard(!FILE_A.0);
pub const NOT_FILE_H: BitBoard = BitBoard(!FILE_H.0);
pub const NOT_FILE_AB: BitBoard = BitBoard(!0x0303_0303_0303_0303);
pub const NOT_FILE_GH: BitBoard = BitBoard(!0xC0C0_C0C0_C0C0_C0C0);

pub const RANK_1: BitBoard = BitBoard(0x0000_0000_0000_00FF);
pub const RANK_3: BitBoard = BitBoard(0x0000_0000_00FF_0000);
pub const RANK_6: BitBoard = BitBoard(0x0000_FF00_0000_0000);
pub const RANK_8: BitBoard = BitBoard(0xFF00_0000_0000_0000);

impl BitBoard {
    pub const fn empty() -> Self {
        BitBoard(0)
    }

    pub const fn full() -> Self {
        BitBoard(u64::MAX)
    }

    pub const fn from_square(square: Square) -> Self {
        BitBoard(1 << (square as u8))
    }

    pub fn from_squares(squares: &[Square]) -> Self {
        BitBoard(squares.iter().fold(0, |board, sq| board | 1 << (*sq as u8)))
    }

    pub fn set_square(&mut self, square: Square) {
        self.0 |= 1 << square as u64
    }

    pub fn clear_square(&mut self, square: Square) {
        self.0 &= !(1 << square as u64)
    }

    pub const fn is_square_set(self, square: Square) -> bool {
        self.0 & 1 << (square as u64) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn intersects(self, other: BitBoard) -> bool {
        self.0 & other.0 != 0
    }

    /// Moves every set bit one step in `dir`, dropping bits that would leave the board.
    pub const fn shift(self, dir: Direction) -> BitBoard {
        let guarded = self.0 & dir.guard().0;
        let shift_amt = dir as i8;
        if shift_amt >= 0 {
            BitBoard(guarded << shift_amt)
        } else {
            BitBoard(guarded >> -shift_amt)
        }
    }

    /// Raw left shift, for the fixed offset leaper patterns that guard their own files.
    pub(crate) const fn shl(self, amt: u32) -> BitBoard {
        BitBoard(self.0 << amt)
    }

    pub(crate) const fn shr(self, amt: u32) -> BitBoard {
        BitBoard(self.0 >> amt)
    }

    pub fn get_lsb(self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        Square::from_repr(self.0.trailing_zeros() as u8)
    }

    /// Clears the lowest set bit and returns its square.
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let lsb = self.get_lsb()?;
        self.0 &= self.0 - 1;
        Some(lsb)
    }

    pub const fn num_squares_set(self) -> u32 {
        self.0.count_ones()
    }
}

impl Iterator for BitBoard {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop_lsb()
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;

    fn bitor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 | other.0)
    }
}

impl BitOrAssign for BitBoard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl BitAnd for BitBoard {
    type Output = BitBoard;

    fn bitand(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 & other.0)
    }
}

impl BitAndAssign for BitBoard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl Not for BitBoard {
    type Output = BitBoard;

    fn not(self) -> Self::Output {
        BitBoard(!self.0)
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(64 + 7);

        for rank in (0..8).rev() {
            for file in 0..8 {
                let set = Square::from_rank_file(rank, file).is_some_and(|sq| self.is_square_set(sq));
                board_str.push(if set { 'X' } else { '.' });
            }
            if rank != 0 {
                board_str.push('\n');
            }
        }

        write!(f, "{}", board_str)
    }
}
