pub mod all_pieces;
pub mod fill;
pub mod leaping_pieces;
mod traits;

use strum_macros::Display;

use crate::position::Position;

pub use self::all_pieces::MoveList;
pub use self::traits::GenerateMoves;

/// Move generation built on the fill attack primitives.
#[derive(Clone, Copy, Debug, Default)]
pub struct FillMoveGen;

impl GenerateMoves for FillMoveGen {
    fn gen_moves(&self, position: &Position) -> MoveList {
        all_pieces::generate(position)
    }

    fn is_in_check(&self, position: &Position) -> bool {
        all_pieces::in_check(position)
    }
}

pub static MOVE_GEN: FillMoveGen = FillMoveGen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    FiftyMoveRule,
}

/// Plies without a pawn move or capture after which the game is drawn.
pub const FIFTY_MOVE_PLIES: u32 = 100;

pub fn game_status(position: &Position, move_gen: &impl GenerateMoves) -> GameStatus {
    if move_gen.gen_moves(position).is_empty() {
        if move_gen.is_in_check(position) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    } else if position.reversible_plies >= FIFTY_MOVE_PLIES {
        GameStatus::FiftyMoveRule
    } else {
        GameStatus::Ongoing
    }
}
