use strum::IntoEnumIterator;

use crate::position::{Layer, Piece, Position, Side};

pub trait EvaluatePosition {
    /// Static score of `position` in centipawns, from the side to move's point of view.
    fn evaluate(&self, position: &Position) -> i32;
}

/// Plain material count.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator;

impl EvaluatePosition for MaterialEvaluator {
    fn evaluate(&self, position: &Position) -> i32 {
        let material = position.material();
        let eval: i32 = Layer::iter()
            .map(|layer| {
                let value = piece_value(layer.piece()) * material[layer as usize] as i32;
                match layer.side() {
                    Side::White => value,
                    Side::Black => -value,
                }
            })
            .sum();

        match position.side_to_move() {
            Side::White => eval,
            Side::Black => -eval,
        }
    }
}

/// The king is worth more than every other piece combined, so losing it dominates any score.
pub const fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 300,
        Piece::Bishop => 300,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 100_000,
    }
}

pub static POSITION_EVALUATOR: MaterialEvaluator = MaterialEvaluator;

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use testresult::TestResult;

    #[test]
    fn test_start_is_balanced() {
        assert_eq!(POSITION_EVALUATOR.evaluate(&Position::start()), 0);
    }

    #[test_case("4k3/8/8/8/8/8/8/3QK3 w - - 0 1", 900 ; "white up a queen, white to move")]
    #[test_case("4k3/8/8/8/8/8/8/3QK3 b - - 0 1", -900 ; "white up a queen, black to move")]
    #[test_case("4k3/pp6/8/8/8/8/8/2N1K3 w - - 0 1", 100 ; "knight against two pawns")]
    #[test_case("8/8/8/8/8/8/8/4K3 w - - 0 1", 100_000 ; "lone king")]
    fn test_evaluate(fen: &str, want: i32) -> TestResult {
        let position = Position::from_fen(fen)?;
        assert_eq!(POSITION_EVALUATOR.evaluate(&position), want);
        Ok(())
    }

    #[test]
    fn test_piece_values_ordered() {
        let values: Vec<i32> = Piece::iter().map(piece_value).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }
}
