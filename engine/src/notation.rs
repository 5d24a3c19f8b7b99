use crate::bitboard::Square;
use crate::move_gen::GenerateMoves;
use crate::position::{Move, Piece, Position};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MoveTextError {
    #[error("malformed move text: {0:?}")]
    Syntax(String),

    #[error("no legal move {0} in this position")]
    Illegal(String),
}

/// Resolves coordinate text such as `e2e4` or `e7e8q` to one of the legal moves of `position`.
pub fn parse_move(
    position: &Position,
    text: &str,
    move_gen: &impl GenerateMoves,
) -> Result<Move, MoveTextError> {
    let (from, to, promotion) = parse_coords(text)?;

    move_gen
        .gen_moves(position)
        .into_iter()
        .find(|mve| {
            mve.from_square == from && mve.to_square == to && mve.promotion() == promotion
        })
        .ok_or_else(|| MoveTextError::Illegal(text.to_string()))
}

fn parse_coords(text: &str) -> Result<(Square, Square, Option<Piece>), MoveTextError> {
    let syntax_err = || MoveTextError::Syntax(text.to_string());

    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(syntax_err());
    }
    let from = Square::from_coord(&text[0..2]).ok_or_else(syntax_err)?;
    let to = Square::from_coord(&text[2..4]).ok_or_else(syntax_err)?;

    let promotion = match text[4..].chars().next() {
        None => None,
        Some(ch) => {
            let piece = Piece::try_from(ch).map_err(|_| syntax_err())?;
            if !Piece::PROMOTIONS.contains(&piece) {
                return Err(syntax_err());
            }
            Some(piece)
        }
    };

    Ok((from, to, promotion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use crate::move_gen::MOVE_GEN;
    use crate::position::Layer;
    use test_case::test_case;
    use testresult::TestResult;

    #[test_case("e2e4", Move::new(Layer::WhitePawn, E2, E4) ; "pawn push")]
    #[test_case("g1f3", Move::new(Layer::WhiteKnight, G1, F3) ; "knight")]
    fn test_parse_move_start(text: &str, want: Move) -> TestResult {
        assert_eq!(parse_move(&Position::start(), text, &MOVE_GEN)?, want);
        Ok(())
    }

    #[test_case("e7e8q", Piece::Queen)]
    #[test_case("e7e8n", Piece::Knight)]
    #[test_case("e7e8r", Piece::Rook)]
    fn test_parse_promotion(text: &str, piece: Piece) -> TestResult {
        let position = Position::from_fen("8/4P3/8/8/8/8/8/k6K w - - 0 1")?;
        let mve = parse_move(&position, text, &MOVE_GEN)?;

        assert_eq!(mve, Move::with_promotion(Layer::WhitePawn, E7, E8, piece));
        assert_eq!(mve.to_string(), text);
        Ok(())
    }

    #[test]
    fn test_parse_castling() -> TestResult {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")?;
        assert_eq!(
            parse_move(&position, "e1g1", &MOVE_GEN)?,
            Move::new(Layer::WhiteKing, E1, G1)
        );
        Ok(())
    }

    #[test_case("" ; "empty")]
    #[test_case("e2" ; "too short")]
    #[test_case("e2e4e5" ; "too long")]
    #[test_case("i2e4" ; "bad file")]
    #[test_case("e9e4" ; "bad rank")]
    #[test_case("e7e8k" ; "king promotion")]
    #[test_case("e7e8x" ; "unknown promotion")]
    #[test_case("é2e4" ; "not ascii")]
    fn test_parse_syntax_error(text: &str) {
        assert_eq!(
            parse_move(&Position::start(), text, &MOVE_GEN),
            Err(MoveTextError::Syntax(text.to_string()))
        );
    }

    #[test_case("e2e5" ; "too far")]
    #[test_case("e7e5" ; "wrong side")]
    #[test_case("e1g1" ; "castle through pieces")]
    #[test_case("e2e4q" ; "promotion off the last rank")]
    fn test_parse_illegal(text: &str) {
        assert_eq!(
            parse_move(&Position::start(), text, &MOVE_GEN),
            Err(MoveTextError::Illegal(text.to_string()))
        );
    }

    #[test]
    fn test_promotion_requires_letter() -> TestResult {
        let position = Position::from_fen("8/4P3/8/8/8/8/8/k6K w - - 0 1")?;
        assert_eq!(
            parse_move(&position, "e7e8", &MOVE_GEN),
            Err(MoveTextError::Illegal("e7e8".to_string()))
        );
        Ok(())
    }
}
