//! Bitboard chess rules: positions, legal move generation, perft and a small search.

pub mod bitboard;
pub mod evaluation;
pub mod move_gen;
pub mod notation;
pub mod perft;
pub mod position;
pub mod search;

pub use bitboard::{BitBoard, Square};
pub use evaluation::{EvaluatePosition, MaterialEvaluator, POSITION_EVALUATOR};
pub use move_gen::all_pieces::{in_check, is_check};
pub use move_gen::{game_status, FillMoveGen, GameStatus, GenerateMoves, MoveList, MOVE_GEN};
pub use notation::{parse_move, MoveTextError};
pub use perft::{perft, perft_divide, perft_full, PerftDepthResult, PerftResult};
pub use position::{
    Board, CastlingRights, FenParseError, Layer, Move, Piece, Position, PositionError, Side,
    START_FEN,
};
pub use search::{search, SearchError, SearchParams, SearchResult, MATE};
