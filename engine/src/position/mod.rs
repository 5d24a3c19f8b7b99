use std::fmt;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, FromRepr};

use crate::bitboard::Square::*;
use crate::bitboard::{BitBoard, Direction, Square};

mod fen;

pub use fen::FenParseError;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PositionError {
    #[error("char -> piece: got {0}")]
    FromCharPiece(char),

    #[error("no {0:?} at {1}")]
    MoveNoPiece(Layer, Square),

    #[error("to_move is the other side, for move: {0}")]
    MoveNotToMove(Move),

    #[error("move {0} changes side from {1:?} to {2:?}")]
    LayerSideMismatch(Move, Layer, Layer),

    #[error("move {0} changes piece type but isn't a pawn promotion")]
    InvalidPromotion(Move),
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite_side(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Direction this side's pawns advance in.
    pub(crate) fn forward(self) -> Direction {
        match self {
            Side::White => Direction::North,
            Side::Black => Direction::South,
        }
    }
}

#[repr(u8)]
#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    pub const PROMOTIONS: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];
}

impl From<Piece> for char {
    fn from(piece: Piece) -> char {
        match piece {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = PositionError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'p' => Ok(Piece::Pawn),
            'n' => Ok(Piece::Knight),
            'b' => Ok(Piece::Bishop),
            'r' => Ok(Piece::Rook),
            'q' => Ok(Piece::Queen),
            'k' => Ok(Piece::King),
            _ => Err(PositionError::FromCharPiece(value)),
        }
    }
}

/// One of the twelve piece planes. White planes come first, in [`Piece`] order.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, EnumIter, FromRepr, Clone, Copy, Hash)]
pub enum Layer {
    WhitePawn,
    WhiteKnight,
    WhiteBishop,
    WhiteRook,
    WhiteQueen,
    WhiteKing,
    BlackPawn,
    BlackKnight,
    BlackBishop,
    BlackRook,
    BlackQueen,
    BlackKing,
}

impl Layer {
    pub const fn new(side: Side, piece: Piece) -> Layer {
        match (side, piece) {
            (Side::White, Piece::Pawn) => Layer::WhitePawn,
            (Side::White, Piece::Knight) => Layer::WhiteKnight,
            (Side::White, Piece::Bishop) => Layer::WhiteBishop,
            (Side::White, Piece::Rook) => Layer::WhiteRook,
            (Side::White, Piece::Queen) => Layer::WhiteQueen,
            (Side::White, Piece::King) => Layer::WhiteKing,
            (Side::Black, Piece::Pawn) => Layer::BlackPawn,
            (Side::Black, Piece::Knight) => Layer::BlackKnight,
            (Side::Black, Piece::Bishop) => Layer::BlackBishop,
            (Side::Black, Piece::Rook) => Layer::BlackRook,
            (Side::Black, Piece::Queen) => Layer::BlackQueen,
            (Side::Black, Piece::King) => Layer::BlackKing,
        }
    }

    pub const fn side(self) -> Side {
        if (self as u8) < 6 {
            Side::White
        } else {
            Side::Black
        }
    }

    pub const fn piece(self) -> Piece {
        match self as u8 % 6 {
            0 => Piece::Pawn,
            1 => Piece::Knight,
            2 => Piece::Bishop,
            3 => Piece::Rook,
            4 => Piece::Queen,
            _ => Piece::King,
        }
    }

    /// Exchange format letter: uppercase for white, lowercase for black.
    pub fn to_char(self) -> char {
        let ch: char = self.piece().into();
        match self.side() {
            Side::White => ch.to_ascii_uppercase(),
            Side::Black => ch,
        }
    }

    pub fn from_char(ch: char) -> Option<Layer> {
        let piece = Piece::try_from(ch.to_ascii_lowercase()).ok()?;
        let side = if ch.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        Some(Layer::new(side, piece))
    }
}

/// Twelve disjoint occupancy masks, one per [`Layer`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    layers: [BitBoard; 12],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn start() -> Self {
        let mut board = Self::empty();
        for (side, back_rank, pawn_rank) in [(Side::White, 0, 1), (Side::Black, 7, 6)] {
            for file in 0..8 {
                let pawn_sq = Square::from_rank_file(pawn_rank, file);
                let back_sq = Square::from_rank_file(back_rank, file);
                if let (Some(pawn_sq), Some(back_sq)) = (pawn_sq, back_sq) {
                    board.set_square(Layer::new(side, Piece::Pawn), pawn_sq);
                    board.set_square(Layer::new(side, BACK_RANK[file as usize]), back_sq);
                }
            }
        }
        board
    }

    pub fn get(&self, layer: Layer) -> BitBoard {
        self.layers[layer as usize]
    }

    pub(crate) fn get_mut(&mut self, layer: Layer) -> &mut BitBoard {
        &mut self.layers[layer as usize]
    }

    pub fn piece(&self, side: Side, piece: Piece) -> BitBoard {
        self.get(Layer::new(side, piece))
    }

    /// The six planes of `side`, in [`Piece`] order.
    pub fn side_layers(&self, side: Side) -> [BitBoard; 6] {
        let offset = match side {
            Side::White => 0,
            Side::Black => 6,
        };
        let mut layers = [BitBoard::empty(); 6];
        layers.copy_from_slice(&self.layers[offset..offset + 6]);
        layers
    }

    pub fn side_pieces(&self, side: Side) -> BitBoard {
        self.side_layers(side)
            .into_iter()
            .fold(BitBoard::empty(), |acc, bb| acc | bb)
    }

    pub fn occupied(&self) -> BitBoard {
        self.layers
            .iter()
            .fold(BitBoard::empty(), |acc, &bb| acc | bb)
    }

    pub fn piece_at(&self, square: Square) -> Option<Layer> {
        Layer::iter().find(|&layer| self.get(layer).is_square_set(square))
    }

    /// Puts `layer` on `square`, removing whatever was there before.
    pub fn set_square(&mut self, layer: Layer, square: Square) {
        self.clear(BitBoard::from_square(square));
        self.get_mut(layer).set_square(square);
    }

    /// Clears every square of `mask` from all layers.
    pub fn clear(&mut self, mask: BitBoard) {
        for bb in self.layers.iter_mut() {
            *bb &= !mask;
        }
    }
}

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    fn start() -> Self {
        Self::new(true, true, true, true)
    }

    pub fn new(
        white_king_side: bool,
        white_queen_side: bool,
        black_king_side: bool,
        black_queen_side: bool,
    ) -> Self {
        Self {
            white_king_side,
            white_queen_side,
            black_king_side,
            black_queen_side,
        }
    }

    pub fn king_side(&self, side: Side) -> bool {
        match side {
            Side::White => self.white_king_side,
            Side::Black => self.black_king_side,
        }
    }

    pub fn queen_side(&self, side: Side) -> bool {
        match side {
            Side::White => self.white_queen_side,
            Side::Black => self.black_queen_side,
        }
    }

    /// Drops the rights tied to a king or rook home square once anything moves from or to it.
    fn revoke_touching(&mut self, square: Square) {
        match square {
            E1 => {
                self.white_king_side = false;
                self.white_queen_side = false;
            }
            H1 => self.white_king_side = false,
            A1 => self.white_queen_side = false,
            E8 => {
                self.black_king_side = false;
                self.black_queen_side = false;
            }
            H8 => self.black_king_side = false,
            A8 => self.black_queen_side = false,
            _ => (),
        }
    }
}

/// Where the rook goes when the king lands on `king_dest` by castling.
pub(crate) fn castling_rook_move(king_dest: Square) -> Option<(Square, Square)> {
    match king_dest {
        G1 => Some((H1, F1)),
        C1 => Some((A1, D1)),
        G8 => Some((H8, F8)),
        C8 => Some((A8, D8)),
        _ => None,
    }
}

/// A move as origin and destination planes and squares.
///
/// `to_layer` differs from `from_layer` only for promotions. Captures, en
/// passant and the castling rook are not stored; [`Position::apply`] derives
/// them from the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from_layer: Layer,
    pub from_square: Square,
    pub to_layer: Layer,
    pub to_square: Square,
}

impl Move {
    pub fn new(layer: Layer, from_square: Square, to_square: Square) -> Move {
        Self {
            from_layer: layer,
            from_square,
            to_layer: layer,
            to_square,
        }
    }

    pub fn with_promotion(
        from_layer: Layer,
        from_square: Square,
        to_square: Square,
        promotion: Piece,
    ) -> Self {
        Self {
            from_layer,
            from_square,
            to_layer: Layer::new(from_layer.side(), promotion),
            to_square,
        }
    }

    pub fn is_promotion(&self) -> bool {
        self.from_layer != self.to_layer
    }

    pub fn promotion(&self) -> Option<Piece> {
        self.is_promotion().then(|| self.to_layer.piece())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from_square, self.to_square)?;
        if let Some(promotion) = self.promotion() {
            write!(f, " ({})", promotion)?;
        }
        Ok(())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from_square, self.to_square)?;
        if let Some(promotion) = self.promotion() {
            write!(f, "{}", char::from(promotion))?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Board,
    pub castling_rights: CastlingRights,
    /// File (0 = a) on which an en passant capture is possible for this ply only.
    pub en_passant_file: Option<u8>,
    /// Half moves since the start of the game; even means white to move.
    pub ply: u32,
    /// Half moves since the last pawn move or capture.
    pub reversible_plies: u32,
}

impl Position {
    pub fn start() -> Self {
        Self {
            board: Board::start(),
            castling_rights: CastlingRights::start(),
            en_passant_file: None,
            ply: 0,
            reversible_plies: 0,
        }
    }

    pub fn empty() -> Self {
        Self {
            board: Board::empty(),
            castling_rights: CastlingRights::default(),
            en_passant_file: None,
            ply: 0,
            reversible_plies: 0,
        }
    }

    pub fn side_to_move(&self) -> Side {
        if self.ply % 2 == 0 {
            Side::White
        } else {
            Side::Black
        }
    }

    pub fn full_move_number(&self) -> u32 {
        self.ply / 2 + 1
    }

    /// The square a pawn of the side to move lands on when capturing en passant.
    pub fn en_passant_target(&self) -> Option<Square> {
        let file = self.en_passant_file?;
        let rank = match self.side_to_move() {
            Side::White => 5,
            Side::Black => 2,
        };
        Square::from_rank_file(rank, file)
    }

    pub fn own_pieces(&self) -> BitBoard {
        self.board.side_pieces(self.side_to_move())
    }

    pub fn opponent_pieces(&self) -> BitBoard {
        self.board.side_pieces(self.side_to_move().opposite_side())
    }

    pub fn piece_at(&self, square: Square) -> Option<Layer> {
        self.board.piece_at(square)
    }

    /// Whether playing `mve` removes an opponent piece, en passant included.
    pub fn is_capture(&self, mve: &Move) -> bool {
        self.opponent_pieces().is_square_set(mve.to_square) || self.is_en_passant(mve)
    }

    pub fn is_en_passant(&self, mve: &Move) -> bool {
        mve.from_layer.piece() == Piece::Pawn
            && Some(mve.to_square) == self.en_passant_target()
            && !self.board.occupied().is_square_set(mve.to_square)
    }

    pub fn is_castling(&self, mve: &Move) -> bool {
        mve.from_layer.piece() == Piece::King && mve.from_square.abs_diff(mve.to_square) == 2
    }

    /// Validates that `mve` moves a piece of the side to move, then applies it.
    ///
    /// This does not check legality, only that the move is well formed for
    /// this board.
    pub fn make_move(&mut self, mve: &Move) -> Result<(), PositionError> {
        if !self.board.get(mve.from_layer).is_square_set(mve.from_square) {
            return Err(PositionError::MoveNoPiece(mve.from_layer, mve.from_square));
        }

        if mve.from_layer.side() != self.side_to_move() {
            return Err(PositionError::MoveNotToMove(*mve));
        }

        if mve.to_layer.side() != mve.from_layer.side() {
            return Err(PositionError::LayerSideMismatch(
                *mve,
                mve.from_layer,
                mve.to_layer,
            ));
        }

        if mve.is_promotion() && mve.from_layer.piece() != Piece::Pawn {
            return Err(PositionError::InvalidPromotion(*mve));
        }

        self.apply(mve);
        Ok(())
    }

    /// Plays `mve`, which must be legal here (or otherwise trusted).
    ///
    /// Captures, en passant captures and the castling rook are all derived
    /// from the current board.
    pub fn apply(&mut self, mve: &Move) {
        let side = self.side_to_move();
        let piece = mve.from_layer.piece();
        let from_bb = BitBoard::from_square(mve.from_square);
        let to_bb = BitBoard::from_square(mve.to_square);

        let mut is_capture = self.opponent_pieces().intersects(to_bb);
        let mut cleared = from_bb | to_bb;

        if self.is_en_passant(mve) {
            // The captured pawn sits one rank behind the landing square
            cleared |= to_bb.shift(side.opposite_side().forward());
            is_capture = true;
        }

        self.board.clear(cleared);
        *self.board.get_mut(mve.to_layer) |= to_bb;

        if piece == Piece::King && mve.from_square.abs_diff(mve.to_square) == 2 {
            if let Some((rook_src, rook_dest)) = castling_rook_move(mve.to_square) {
                let rooks = self.board.get_mut(Layer::new(side, Piece::Rook));
                rooks.clear_square(rook_src);
                rooks.set_square(rook_dest);
            }
        }

        self.castling_rights.revoke_touching(mve.from_square);
        self.castling_rights.revoke_touching(mve.to_square);

        self.en_passant_file =
            if piece == Piece::Pawn && mve.from_square.abs_diff(mve.to_square) == 16 {
                Some(mve.to_square.file())
            } else {
                None
            };

        if piece == Piece::Pawn || is_capture {
            self.reversible_plies = 0;
        } else {
            self.reversible_plies = self.reversible_plies.saturating_add(1);
        }

        self.ply = self.ply.saturating_add(1);
    }

    /// Number of pieces on each layer, in [`Layer`] order.
    pub fn material(&self) -> [u32; 12] {
        let mut counts = [0; 12];
        for layer in Layer::iter() {
            counts[layer as usize] = self.board.get(layer).num_squares_set();
        }
        counts
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(64 + 7);
        for rank in (0..8).rev() {
            for file in 0..8 {
                let ch = Square::from_rank_file(rank, file)
                    .and_then(|sq| self.piece_at(sq))
                    .map_or('.', Layer::to_char);
                board_str.push(ch);
            }
            if rank != 0 {
                board_str.push('\n');
            }
        }
        write!(f, "{}", board_str)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self, self.to_fen())
    }
}
