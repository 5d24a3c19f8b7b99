use std::fmt::Display;
use std::time::{Duration, Instant};

use tabled::{Table, Tabled};
use tracing::{debug, debug_span};

use crate::move_gen::GenerateMoves;
use crate::position::{Move, Position};

/// Counts of one ply of the move tree, as in the usual perft result tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Tabled)]
pub struct PerftDepthResult {
    pub depth: usize,
    pub nodes: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

pub struct PerftResult {
    pub depth_results: Vec<PerftDepthResult>,
    pub tot_nodes: u64,
    pub time_elapsed: Duration,
    pub nodes_per_second: f64,
}

impl Display for PerftResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "total nodes: {}", self.tot_nodes)?;
        writeln!(f, "time elapsed: {}", self.time_elapsed.as_secs_f32())?;
        writeln!(f, "nodes/s: {:.0}", self.nodes_per_second)?;
        write!(f, "{}", Table::new(&self.depth_results))
    }
}

/// Number of leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(position: &Position, depth: usize, move_gen: &impl GenerateMoves) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = move_gen.gen_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|mve| {
            let mut move_position = *position;
            move_position.apply(mve);
            perft(&move_position, depth - 1, move_gen)
        })
        .sum()
}

/// Leaf counts below each root move, in generation order.
pub fn perft_divide(
    position: &Position,
    depth: usize,
    move_gen: &impl GenerateMoves,
) -> Vec<(Move, u64)> {
    let _span = debug_span!("perft_divide", depth).entered();
    if depth == 0 {
        return Vec::new();
    }

    let start = Instant::now();
    let divide: Vec<(Move, u64)> = move_gen
        .gen_moves(position)
        .iter()
        .map(|mve| {
            let mut move_position = *position;
            move_position.apply(mve);
            (*mve, perft(&move_position, depth - 1, move_gen))
        })
        .collect();

    let total: u64 = divide.iter().map(|(_, nodes)| nodes).sum();
    debug!(total, elapsed = ?start.elapsed(), "perft divide finished");
    divide
}

/// Per-depth breakdown of the move tree `depth` plies deep.
pub fn perft_full(position: &Position, depth: usize, move_gen: &impl GenerateMoves) -> PerftResult {
    let _span = debug_span!("perft_full", depth).entered();
    let mut depth_results: Vec<PerftDepthResult> = (1..=depth)
        .map(|depth| PerftDepthResult {
            depth,
            ..Default::default()
        })
        .collect();

    let start = Instant::now();
    perft_full_helper(&mut depth_results, position, move_gen);
    let time_elapsed = start.elapsed();

    let tot_nodes = depth_results.last().map_or(1, |res| res.nodes);
    let nodes_per_second = tot_nodes as f64 / time_elapsed.as_secs_f64().max(f64::EPSILON);
    debug!(tot_nodes, ?time_elapsed, "perft full finished");

    PerftResult {
        depth_results,
        tot_nodes,
        time_elapsed,
        nodes_per_second,
    }
}

fn perft_full_helper(
    depth_results: &mut [PerftDepthResult],
    position: &Position,
    move_gen: &impl GenerateMoves,
) {
    let Some((curr_res, deeper)) = depth_results.split_first_mut() else {
        return;
    };

    for mve in move_gen.gen_moves(position) {
        curr_res.nodes += 1;
        if position.is_capture(&mve) {
            curr_res.captures += 1;
        }
        if position.is_en_passant(&mve) {
            curr_res.en_passants += 1;
        }
        if position.is_castling(&mve) {
            curr_res.castles += 1;
        }
        if mve.is_promotion() {
            curr_res.promotions += 1;
        }

        let mut move_position = *position;
        move_position.apply(&mve);

        if move_gen.is_in_check(&move_position) {
            curr_res.checks += 1;
            if move_gen.gen_moves(&move_position).is_empty() {
                curr_res.checkmates += 1;
            }
        }

        perft_full_helper(deeper, &move_position, move_gen);
    }
}
