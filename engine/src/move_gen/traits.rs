use super::all_pieces::MoveList;
use crate::position::Position;

pub trait GenerateMoves {
    fn gen_moves(&self, position: &Position) -> MoveList;
    fn is_in_check(&self, position: &Position) -> bool;
}
