use fillboard::Square::*;
use fillboard::{
    game_status, parse_move, GameStatus, GenerateMoves, Layer, Move, Position, MOVE_GEN,
};

use test_case::test_case;
use testresult::TestResult;

fn play(position: &mut Position, moves: &str) -> TestResult {
    for text in moves.split_whitespace() {
        let mve = parse_move(position, text, &MOVE_GEN)?;
        position.make_move(&mve)?;
    }
    Ok(())
}

#[test_case(
    "d2d4 d7d5 c2c4 d5c4 e2e3 b7b5 a2a4 c7c6 a4b5 c6b5 d1f3 b8c6 f3c6 c8d7",
    "r2qkbnr/p2bpppp/2Q5/1p6/2pP4/4P3/1P3PPP/RNB1KBNR w KQkq - 1 8" ; "normal"
)]
#[test_case(
    "e2e4 e7e5 g1f3 b8c6 f1b5 a7a6 b5a4 f8e7 e1g1",
    "r1bqk1nr/1pppbppp/p1n5/4p3/B3P3/5N2/PPPP1PPP/RNBQ1RK1 b kq - 3 5" ; "castling"
)]
#[test_case(
    "d2d4 e7e5 d4d5 e5e4 d5d6 e4e3 d6c7 e3f2 e1f2 d7d5 c7d8q",
    "rnbQkbnr/pp3ppp/8/3p4/8/8/PPP1PKPP/RNBQ1BNR b kq - 0 6" ; "promotion"
)]
#[test_case(
    "e2e4 d7d5 e4e5 f7f5 e5f6 g8f6",
    "rnbqkb1r/ppp1p1pp/5n2/3p4/8/8/PPPP1PPP/RNBQKBNR w KQkq - 0 4" ; "en passant"
)]
#[test_case(
    "e2e4 e7e5 d1h5 b8c6 f1c4 g8f6 h5f7",
    "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4" ; "scholars mate"
)]
fn test_play_game(moves: &str, want: &str) -> TestResult {
    let mut position = Position::start();
    play(&mut position, moves)?;

    assert_eq!(position.to_fen(), want);
    assert_eq!(position, Position::from_fen(want)?);
    Ok(())
}

#[test]
fn test_scholars_mate_is_checkmate() -> TestResult {
    let mut position = Position::start();
    play(&mut position, "e2e4 e7e5 d1h5 b8c6 f1c4 g8f6 h5f7")?;

    assert_eq!(game_status(&position, &MOVE_GEN), GameStatus::Checkmate);
    Ok(())
}

#[test]
fn test_open_game_scenario() -> TestResult {
    let mut position = Position::start();
    assert_eq!(MOVE_GEN.gen_moves(&position).len(), 20);

    play(&mut position, "e2e4 e7e5")?;
    let moves = MOVE_GEN.gen_moves(&position);

    // e5 was a double push, but no white pawn stands next to it
    assert!(moves.iter().all(|mve| !position.is_en_passant(mve)));
    // The queen and bishop diagonals have opened
    assert!(moves.contains(&Move::new(Layer::WhiteQueen, D1, H5)));
    assert!(moves.contains(&Move::new(Layer::WhiteBishop, F1, B5)));
    // The king only ever steps one square outside of castling
    let king_moves: Vec<_> = moves
        .iter()
        .filter(|mve| mve.from_layer == Layer::WhiteKing)
        .collect();
    assert_eq!(king_moves, vec![&Move::new(Layer::WhiteKing, E1, E2)]);

    play(&mut position, "g1f3")?;
    assert_eq!(position.en_passant_file, None);
    Ok(())
}

#[test]
fn test_en_passant_expires() -> TestResult {
    let mut position = Position::start();
    play(&mut position, "e2e4 a7a6 e4e5 d7d5")?;
    assert!(parse_move(&position, "e5d6", &MOVE_GEN).is_ok());

    play(&mut position, "b1c3 a6a5")?;
    assert!(parse_move(&position, "e5d6", &MOVE_GEN).is_err());
    Ok(())
}

#[test]
fn test_illegal_move_text_leaves_position() -> TestResult {
    let mut position = Position::start();
    assert!(play(&mut position, "e2e4 e7e5 e1e3").is_err());
    // The first two moves were played, the illegal king jump was not
    assert_eq!(
        position.to_fen(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
    );
    Ok(())
}
