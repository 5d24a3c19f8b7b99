//! One-shot tooling commands over the `fillboard` rules engine.

use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fillboard::{
    game_status, parse_move, perft_divide, perft_full, search, EvaluatePosition, GenerateMoves,
    Position, SearchParams, MOVE_GEN, POSITION_EVALUATOR, START_FEN,
};
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "fillboard", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Count leaf nodes below each legal move.
    Perft {
        depth: usize,
        #[command(flatten)]
        setup: Setup,
    },
    /// Per-depth breakdown of captures, castles, checks and mates.
    PerftFull {
        depth: usize,
        #[command(flatten)]
        setup: Setup,
    },
    /// Search for the best move.
    Search {
        depth: u8,
        /// Evaluate leaves statically instead of resolving captures first.
        #[arg(long)]
        no_quiescence: bool,
        #[command(flatten)]
        setup: Setup,
    },
    /// List the legal moves in generation order.
    Movegen {
        #[command(flatten)]
        setup: Setup,
    },
    /// Static material evaluation for the side to move.
    Eval {
        #[command(flatten)]
        setup: Setup,
    },
    /// Show the board and its state.
    Display {
        #[command(flatten)]
        setup: Setup,
    },
}

#[derive(Debug, Args)]
pub struct Setup {
    /// Starting position.
    #[arg(long, default_value = START_FEN)]
    pub fen: String,
    /// Moves in coordinate form (e.g. e2e4 e7e8q) played from the starting position.
    #[arg(long, num_args = 1..)]
    pub moves: Vec<String>,
}

impl Command {
    fn setup(&self) -> &Setup {
        match self {
            Command::Perft { setup, .. }
            | Command::PerftFull { setup, .. }
            | Command::Search { setup, .. }
            | Command::Movegen { setup }
            | Command::Eval { setup }
            | Command::Display { setup } => setup,
        }
    }
}

/// Parses `fen` and plays `moves` on it in order.
pub fn setup_position(fen: &str, moves: &[String]) -> Result<Position> {
    let mut position =
        Position::from_fen(fen).with_context(|| format!("Couldn't parse given fen: `{}`", fen))?;

    for text in moves {
        let mve = parse_move(&position, text, &MOVE_GEN)
            .with_context(|| format!("Couldn't play `{}` in `{}`", text, position.to_fen()))?;
        position.make_move(&mve)?;
        debug!(%mve, "played move");
    }
    Ok(position)
}

pub fn run(command: &Command, out: &mut impl Write) -> Result<()> {
    let setup = command.setup();
    let position = setup_position(&setup.fen, &setup.moves)?;
    info!(fen = %position.to_fen(), "position set up");

    match command {
        Command::Perft { depth, .. } => write_perft(&position, *depth, out),
        Command::PerftFull { depth, .. } => {
            writeln!(out, "{}", perft_full(&position, *depth, &MOVE_GEN))?;
            Ok(())
        }
        Command::Search {
            depth,
            no_quiescence,
            ..
        } => {
            let params = SearchParams {
                depth: *depth,
                quiescence: !no_quiescence,
            };
            write_search(&position, &params, out)
        }
        Command::Movegen { .. } => write_movegen(&position, out),
        Command::Eval { .. } => {
            writeln!(out, "{}", POSITION_EVALUATOR.evaluate(&position))?;
            Ok(())
        }
        Command::Display { .. } => write_display(&position, out),
    }
}

fn write_perft(position: &Position, depth: usize, out: &mut impl Write) -> Result<()> {
    let start = Instant::now();
    let divide = perft_divide(position, depth, &MOVE_GEN);
    let elapsed = start.elapsed();

    for (mve, nodes) in &divide {
        writeln!(out, "{}: {}", mve, nodes)?;
    }
    let total: u64 = if depth == 0 {
        1
    } else {
        divide.iter().map(|(_, nodes)| nodes).sum()
    };
    let knps = total as f64 / elapsed.as_secs_f64().max(f64::EPSILON) / 1000.0;

    writeln!(out)?;
    writeln!(out, "Total: {}", total)?;
    writeln!(out, "Time: {:.3}s", elapsed.as_secs_f64())?;
    writeln!(out, "kN/s: {:.0}", knps)?;
    Ok(())
}

fn write_search(position: &Position, params: &SearchParams, out: &mut impl Write) -> Result<()> {
    let res = search(position, params, &MOVE_GEN, &POSITION_EVALUATOR)?;

    match res.best_move {
        Some(mve) => writeln!(out, "bestmove {}", mve)?,
        None => writeln!(out, "bestmove (none) {}", game_status(position, &MOVE_GEN))?,
    }
    writeln!(out, "score {}", res.score)?;
    writeln!(out, "nodes {}", res.nodes)?;
    writeln!(out, "time {:.3}s", res.time_elapsed.as_secs_f64())?;
    Ok(())
}

fn write_movegen(position: &Position, out: &mut impl Write) -> Result<()> {
    for mve in MOVE_GEN.gen_moves(position) {
        writeln!(out, "{}", mve)?;
    }
    Ok(())
}

fn write_display(position: &Position, out: &mut impl Write) -> Result<()> {
    let rights = position.castling_rights;
    writeln!(out, "{}", position)?;
    writeln!(out)?;
    writeln!(out, "FEN: {}", position.to_fen())?;
    writeln!(out, "Side to move: {}", position.side_to_move())?;
    writeln!(
        out,
        "Castling: white king side {}, white queen side {}, black king side {}, black queen side {}",
        rights.white_king_side, rights.white_queen_side, rights.black_king_side, rights.black_queen_side
    )?;
    match position.en_passant_target() {
        Some(target) => writeln!(out, "En passant: {}", target)?,
        None => writeln!(out, "En passant: -")?,
    }
    writeln!(out, "Reversible plies: {}", position.reversible_plies)?;
    writeln!(out, "Full move: {}", position.full_move_number())?;
    writeln!(out, "Plies: {}", position.ply)?;
    writeln!(out, "Status: {}", game_status(position, &MOVE_GEN))?;
    Ok(())
}
