use arrayvec::ArrayVec;
use tracing::warn;

use super::fill::{bishop_attacks, queen_attacks, rook_attacks};
use super::leaping_pieces::{
    king_attacks, knight_attacks, pawn_attacks, pawn_captures, pawn_double_push, pawn_promo_attacks,
    pawn_promo_push, pawn_push,
};
use crate::bitboard::Square::*;
use crate::bitboard::{BitBoard, Square};
use crate::position::{castling_rook_move, Layer, Move, Piece, Position, Side};

/// Large enough for any reachable position (the known maximum is 218).
pub type MoveList = ArrayVec<Move, 256>;

/// Every square attacked by one side, given that side's six layers and the empty squares.
pub fn attacked_squares(layers: &[BitBoard; 6], side: Side, free: BitBoard) -> BitBoard {
    let [pawns, knights, bishops, rooks, queens, king] = *layers;
    let all = BitBoard::full();

    pawn_attacks(pawns, side)
        | knight_attacks(knights, all)
        | bishop_attacks(bishops | queens, free, all)
        | rook_attacks(rooks | queens, free, all)
        | king_attacks(king, all)
}

/// Whether playing `mve` leaves the mover's own king attacked.
///
/// Only the occupancy masks are rebuilt; the position itself is not copied.
pub fn is_check(position: &Position, mve: &Move) -> bool {
    let side = position.side_to_move();
    let opp_side = side.opposite_side();
    let from_bb = BitBoard::from_square(mve.from_square);
    let to_bb = BitBoard::from_square(mve.to_square);

    let mut captured = to_bb;
    if position.is_en_passant(mve) {
        captured |= to_bb.shift(opp_side.forward());
    }

    let mut own = (position.own_pieces() & !from_bb) | to_bb;
    if position.is_castling(mve) {
        if let Some((rook_src, rook_dest)) = castling_rook_move(mve.to_square) {
            own = (own & !BitBoard::from_square(rook_src)) | BitBoard::from_square(rook_dest);
        }
    }

    let mut opp_layers = position.board.side_layers(opp_side);
    for layer in opp_layers.iter_mut() {
        *layer &= !captured;
    }
    let opp = opp_layers
        .iter()
        .fold(BitBoard::empty(), |acc, &layer| acc | layer);

    let king = if mve.from_layer.piece() == Piece::King {
        to_bb
    } else {
        position.board.piece(side, Piece::King)
    };
    if king.is_empty() {
        return false;
    }

    attacked_squares(&opp_layers, opp_side, !(own | opp)).intersects(king)
}

/// Whether the side to move's king is currently attacked.
pub fn in_check(position: &Position) -> bool {
    let side = position.side_to_move();
    let king = position.board.piece(side, Piece::King);
    if king.is_empty() {
        return false;
    }
    let opp_side = side.opposite_side();
    let free = !position.board.occupied();
    attacked_squares(&position.board.side_layers(opp_side), opp_side, free).intersects(king)
}

/// Collects candidate moves, keeping only those that don't leave the king attacked.
struct MoveSink<'a> {
    position: &'a Position,
    moves: MoveList,
}

impl MoveSink<'_> {
    fn push(&mut self, mve: Move) {
        if is_check(self.position, &mve) {
            return;
        }
        if self.moves.try_push(mve).is_err() {
            warn!(%mve, fen = %self.position.to_fen(), "move list full, dropping move");
        }
    }

    fn push_targets(&mut self, layer: Layer, from: Square, targets: BitBoard) {
        for to in targets {
            self.push(Move::new(layer, from, to));
        }
    }

    fn push_promotions(&mut self, layer: Layer, from: Square, targets: BitBoard) {
        for to in targets {
            for piece in Piece::PROMOTIONS {
                self.push(Move::with_promotion(layer, from, to, piece));
            }
        }
    }
}

/// Every legal move for the side to move.
///
/// Order is pawns, knights, bishops, rooks, queens, king, then castling.
pub fn generate(position: &Position) -> MoveList {
    let side = position.side_to_move();
    let own = position.own_pieces();
    let opp = position.opponent_pieces();
    let free = !(own | opp);
    let not_own = !own;

    let mut sink = MoveSink {
        position,
        moves: MoveList::new(),
    };

    let pawn_layer = Layer::new(side, Piece::Pawn);
    let pawn_targets = opp | en_passant_target(position, free);
    let mut pawns = position.board.get(pawn_layer);
    while let Some(from) = pawns.pop_lsb() {
        let origin = BitBoard::from_square(from);
        let targets = pawn_push(origin, side, free)
            | pawn_double_push(origin, side, free)
            | pawn_captures(origin, side, pawn_targets);
        sink.push_targets(pawn_layer, from, targets);

        let promotions =
            pawn_promo_push(origin, side, free) | pawn_promo_attacks(origin, side, opp);
        sink.push_promotions(pawn_layer, from, promotions);
    }

    for piece in [
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ] {
        let layer = Layer::new(side, piece);
        let mut pieces = position.board.get(layer);
        while let Some(from) = pieces.pop_lsb() {
            let origin = BitBoard::from_square(from);
            let targets = match piece {
                Piece::Knight => knight_attacks(origin, not_own),
                Piece::Bishop => bishop_attacks(origin, free, not_own),
                Piece::Rook => rook_attacks(origin, free, not_own),
                Piece::Queen => queen_attacks(origin, free, not_own),
                Piece::King => king_attacks(origin, not_own),
                Piece::Pawn => BitBoard::empty(),
            };
            sink.push_targets(layer, from, targets);
        }
    }

    gen_castling(position, &mut sink, free);

    sink.moves
}

/// The en passant landing square, if an enemy pawn really sits behind it.
fn en_passant_target(position: &Position, free: BitBoard) -> BitBoard {
    let Some(target) = position.en_passant_target() else {
        return BitBoard::empty();
    };
    let target = BitBoard::from_square(target);
    let opp_side = position.side_to_move().opposite_side();
    let victim = target.shift(opp_side.forward());

    if position.board.piece(opp_side, Piece::Pawn).intersects(victim) && free.intersects(target) {
        target
    } else {
        BitBoard::empty()
    }
}

struct Castle {
    king_to: Square,
    rook_from: Square,
    /// Squares between king and rook.
    between: &'static [Square],
    /// Squares the king stands on, crosses and lands on.
    king_path: [Square; 3],
}

const WHITE_CASTLES: [Castle; 2] = [
    Castle {
        king_to: G1,
        rook_from: H1,
        between: &[F1, G1],
        king_path: [E1, F1, G1],
    },
    Castle {
        king_to: C1,
        rook_from: A1,
        between: &[D1, C1, B1],
        king_path: [E1, D1, C1],
    },
];

const BLACK_CASTLES: [Castle; 2] = [
    Castle {
        king_to: G8,
        rook_from: H8,
        between: &[F8, G8],
        king_path: [E8, F8, G8],
    },
    Castle {
        king_to: C8,
        rook_from: A8,
        between: &[D8, C8, B8],
        king_path: [E8, D8, C8],
    },
];

fn gen_castling(position: &Position, sink: &mut MoveSink, free: BitBoard) {
    let side = position.side_to_move();
    let opp_side = side.opposite_side();
    let (home, castles) = match side {
        Side::White => (E1, &WHITE_CASTLES),
        Side::Black => (E8, &BLACK_CASTLES),
    };

    let king_layer = Layer::new(side, Piece::King);
    if !position.board.get(king_layer).is_square_set(home) {
        return;
    }
    let rooks = position.board.piece(side, Piece::Rook);
    let rights = [
        position.castling_rights.king_side(side),
        position.castling_rights.queen_side(side),
    ];

    // Attacks against the current occupancy, only computed if some castle is otherwise possible
    let mut danger: Option<BitBoard> = None;

    for (castle, held) in castles.iter().zip(rights) {
        if !held || !rooks.is_square_set(castle.rook_from) {
            continue;
        }
        let between = BitBoard::from_squares(castle.between);
        if (between & free) != between {
            continue;
        }
        let danger = *danger.get_or_insert_with(|| {
            attacked_squares(&position.board.side_layers(opp_side), opp_side, free)
        });
        if danger.intersects(BitBoard::from_squares(&castle.king_path)) {
            continue;
        }
        sink.push(Move::new(king_layer, home, castle.king_to));
    }
}
