use std::time::{Duration, Instant};

use tracing::{debug, debug_span, trace};

use crate::evaluation::EvaluatePosition;
use crate::move_gen::{GenerateMoves, FIFTY_MOVE_PLIES};
use crate::position::{Move, Position};

/// Score of delivering mate right now. Mates further away score `MATE - ply`.
pub const MATE: i32 = 1_000_000;
const INFINITY: i32 = MATE + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchParams {
    /// Full plies searched before the leaf evaluation.
    pub depth: u8,
    /// Extend leaves with a capture-only search.
    pub quiescence: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            depth: 4,
            quiescence: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` only when the side to move has no legal moves.
    pub best_move: Option<Move>,
    /// Negamax value of the root, from the side to move's point of view.
    pub score: i32,
    pub nodes: u64,
    pub time_elapsed: Duration,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SearchError {
    #[error("search depth must be at least 1")]
    ZeroDepth,
}

/// Picks the root move with the best negamax value.
///
/// Ties go to the move generated first.
pub fn search(
    position: &Position,
    params: &SearchParams,
    move_gen: &impl GenerateMoves,
    position_eval: &impl EvaluatePosition,
) -> Result<SearchResult, SearchError> {
    if params.depth == 0 {
        return Err(SearchError::ZeroDepth);
    }
    let _span = debug_span!("search", fen = %position.to_fen(), depth = params.depth).entered();
    let start = Instant::now();

    let mut searcher = Searcher {
        move_gen,
        position_eval,
        quiescence: params.quiescence,
        nodes: 1,
    };

    let moves = move_gen.gen_moves(position);
    if moves.is_empty() {
        let score = searcher.terminal_score(position, 0);
        debug!(score, "no legal moves at root");
        return Ok(SearchResult {
            best_move: None,
            score,
            nodes: searcher.nodes,
            time_elapsed: start.elapsed(),
        });
    }

    let mut best_move = None;
    let mut alpha = -INFINITY;
    for mve in moves {
        let mut move_position = *position;
        move_position.apply(&mve);
        let score = -searcher.negamax(&move_position, params.depth - 1, 1, -INFINITY, -alpha);
        trace!(%mve, score, "root move");

        if score > alpha {
            alpha = score;
            best_move = Some(mve);
        }
    }

    let result = SearchResult {
        best_move,
        score: alpha,
        nodes: searcher.nodes,
        time_elapsed: start.elapsed(),
    };
    debug!(
        best_move = ?result.best_move,
        score = result.score,
        nodes = result.nodes,
        elapsed = ?result.time_elapsed,
        "search finished"
    );
    Ok(result)
}

struct Searcher<'a, G, E> {
    move_gen: &'a G,
    position_eval: &'a E,
    quiescence: bool,
    nodes: u64,
}

impl<G: GenerateMoves, E: EvaluatePosition> Searcher<'_, G, E> {
    /// Score of a position without legal moves.
    fn terminal_score(&self, position: &Position, ply: i32) -> i32 {
        if self.move_gen.is_in_check(position) {
            -MATE + ply
        } else {
            0
        }
    }

    /// Fail-hard alpha-beta.
    fn negamax(
        &mut self,
        position: &Position,
        depth: u8,
        ply: i32,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes += 1;

        let moves = self.move_gen.gen_moves(position);
        if moves.is_empty() {
            return self.terminal_score(position, ply).clamp(alpha, beta);
        }
        if position.reversible_plies >= FIFTY_MOVE_PLIES {
            return 0.clamp(alpha, beta);
        }
        if depth == 0 {
            return if self.quiescence {
                self.quiesce(position, alpha, beta)
            } else {
                self.position_eval.evaluate(position).clamp(alpha, beta)
            };
        }

        for mve in moves {
            let mut move_position = *position;
            move_position.apply(&mve);
            let score = -self.negamax(&move_position, depth - 1, ply + 1, -beta, -alpha);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }

    /// Captures only, standing pat on the static evaluation.
    fn quiesce(&mut self, position: &Position, mut alpha: i32, beta: i32) -> i32 {
        let stand_pat = self.position_eval.evaluate(position);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        for mve in self.move_gen.gen_moves(position) {
            if !position.is_capture(&mve) {
                continue;
            }
            self.nodes += 1;
            let mut move_position = *position;
            move_position.apply(&mve);
            let score = -self.quiesce(&move_position, -beta, -alpha);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use crate::evaluation::POSITION_EVALUATOR;
    use crate::move_gen::MOVE_GEN;
    use crate::position::Layer;
    use test_case::test_case;

    fn search_fen(fen: &str, depth: u8, quiescence: bool) -> SearchResult {
        let position = Position::from_fen(fen).expect("valid fen");
        let params = SearchParams { depth, quiescence };
        search(&position, &params, &MOVE_GEN, &POSITION_EVALUATOR).expect("non zero depth")
    }

    #[test]
    fn test_default_params() {
        assert_eq!(SearchParams::default(), SearchParams { depth: 4, quiescence: true });
    }

    #[test]
    fn test_zero_depth() {
        let params = SearchParams { depth: 0, quiescence: true };
        let res = search(&Position::start(), &params, &MOVE_GEN, &POSITION_EVALUATOR);
        assert_eq!(res, Err(SearchError::ZeroDepth));
    }

    #[test_case(1, false ; "depth 1")]
    #[test_case(1, true ; "depth 1 quiescence")]
    #[test_case(2, false ; "depth 2")]
    fn test_ties_keep_first_move(depth: u8, quiescence: bool) {
        let res = search_fen(crate::position::START_FEN, depth, quiescence);
        let first = MOVE_GEN.gen_moves(&Position::start())[0];

        assert_eq!(res.best_move, Some(first));
        assert_eq!(res.score, 0);
    }

    #[test_case(1, false ; "depth 1")]
    #[test_case(2, true ; "depth 2 quiescence")]
    #[test_case(3, true ; "depth 3 quiescence")]
    fn test_mate_in_one(depth: u8, quiescence: bool) {
        let res = search_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", depth, quiescence);

        assert_eq!(res.best_move, Some(Move::new(Layer::WhiteRook, A1, A8)));
        assert_eq!(res.score, MATE - 1);
    }

    #[test]
    fn test_checkmated_root() {
        let res = search_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3", 2, true);

        assert_eq!(res.best_move, None);
        assert_eq!(res.score, -MATE);
    }

    #[test]
    fn test_stalemated_root() {
        let res = search_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3, true);

        assert_eq!(res.best_move, None);
        assert_eq!(res.score, 0);
    }

    #[test]
    fn test_counts_nodes() {
        let res = search_fen(crate::position::START_FEN, 2, false);
        // Every reply is examined below the first root move, then each one is cut off after a single leaf
        assert_eq!(res.nodes, 1 + 21 + 19 * 2);
    }
}
