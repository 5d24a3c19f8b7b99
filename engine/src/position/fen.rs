use std::str::FromStr;

use crate::bitboard::Square;
use crate::position::{Board, CastlingRights, Layer, Position, Side};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FenParseError {
    #[error("num fields: want 6 got {0}")]
    NumFields(usize),

    #[error("piece placement: got {0}, err at {1}")]
    PiecePlacement(String, usize),

    #[error("piece placement: want 8 ranks got {0}")]
    NumRanks(usize),

    #[error("side to move: want 'w'|'b' got {0}")]
    SideToMove(String),

    #[error("castling rights given: got {0}, err at idx {1}")]
    CastlingRights(String, usize),

    #[error("en passant target: got {0}")]
    EnPassantTarget(String),

    #[error("halfmove clock: want non negative integer got {0}")]
    HalfmoveClock(String),

    #[error("full move counter: want integer >= 1 got {0}")]
    FullMoveCounter(String),
}

impl Position {
    /// Parses a position from its six field exchange format.
    ///
    /// Nothing is mutated on failure: the position is only returned once
    /// every field has been validated.
    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        let fields = fen.split_whitespace().collect::<Vec<&str>>();

        if fields.len() != 6 {
            Err(FenParseError::NumFields(fields.len()))?
        }

        let board = board_from_fen(fields[0])?;

        let to_move = match fields[1] {
            "w" => Side::White,
            "b" => Side::Black,
            _ => Err(FenParseError::SideToMove(String::from(fields[1])))?,
        };

        let castling_rights = castling_rights_from_fen(fields[2])?;
        let en_passant_file = en_passant_file_from_fen(fields[3], to_move)?;

        let reversible_plies = fields[4]
            .parse::<u32>()
            .map_err(|_| FenParseError::HalfmoveClock(fields[4].to_string()))?;

        let full_move_counter = fields[5]
            .parse::<u32>()
            .ok()
            // The ply count must hold both sides of the last full move
            .filter(|&n| (1..=u32::MAX / 2).contains(&n))
            .ok_or_else(|| FenParseError::FullMoveCounter(fields[5].to_string()))?;

        let side_offset = match to_move {
            Side::White => 0,
            Side::Black => 1,
        };

        Ok(Position {
            board,
            castling_rights,
            en_passant_file,
            ply: (full_move_counter - 1) * 2 + side_offset,
            reversible_plies,
        })
    }

    pub fn to_fen(&self) -> String {
        let mut pieces = String::with_capacity(64 + 7);

        for rank in (0..8).rev() {
            let mut curr_empty_count = 0;
            for file in 0..8 {
                match Square::from_rank_file(rank, file).and_then(|sq| self.piece_at(sq)) {
                    Some(layer) => {
                        if curr_empty_count != 0 {
                            pieces += &curr_empty_count.to_string();
                            curr_empty_count = 0;
                        }
                        pieces.push(layer.to_char());
                    }
                    None => curr_empty_count += 1,
                }
            }
            if curr_empty_count != 0 {
                pieces += &curr_empty_count.to_string();
            }
            if rank != 0 {
                pieces.push('/');
            }
        }

        let side_to_move_char = match self.side_to_move() {
            Side::White => 'w',
            Side::Black => 'b',
        };

        let mut castling_rights = String::with_capacity(4);

        if self.castling_rights.white_king_side {
            castling_rights += "K";
        }
        if self.castling_rights.white_queen_side {
            castling_rights += "Q";
        }
        if self.castling_rights.black_king_side {
            castling_rights += "k";
        }
        if self.castling_rights.black_queen_side {
            castling_rights += "q";
        }

        if castling_rights.is_empty() {
            castling_rights += "-";
        }

        let en_passant = self
            .en_passant_target()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            pieces,
            side_to_move_char,
            castling_rights,
            en_passant,
            self.reversible_plies,
            self.full_move_number()
        )
    }
}

impl FromStr for Position {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

fn castling_rights_from_fen(castling_rights_str: &str) -> Result<CastlingRights, FenParseError> {
    if castling_rights_str == "-" {
        return Ok(CastlingRights::default());
    }

    let mut rights = CastlingRights::default();

    for (idx, ch) in castling_rights_str.chars().enumerate() {
        let right = match ch {
            'K' => &mut rights.white_king_side,
            'Q' => &mut rights.white_queen_side,
            'k' => &mut rights.black_king_side,
            'q' => &mut rights.black_queen_side,
            _ => {
                return Err(FenParseError::CastlingRights(
                    castling_rights_str.to_string(),
                    idx,
                ))
            }
        };
        if *right {
            return Err(FenParseError::CastlingRights(
                castling_rights_str.to_string(),
                idx,
            ));
        }
        *right = true;
    }

    Ok(rights)
}

/// The target square must sit behind a pawn that just double pushed, so its
/// rank is fixed by the side to move.
fn en_passant_file_from_fen(
    en_passant_target_str: &str,
    to_move: Side,
) -> Result<Option<u8>, FenParseError> {
    if en_passant_target_str == "-" {
        return Ok(None);
    }

    let want_rank = match to_move {
        Side::White => 5,
        Side::Black => 2,
    };

    Square::from_coord(en_passant_target_str)
        .filter(|sq| sq.rank() == want_rank)
        .map(|sq| Some(sq.file()))
        .ok_or_else(|| FenParseError::EnPassantTarget(en_passant_target_str.to_string()))
}

fn board_from_fen(pieces_str: &str) -> Result<Board, FenParseError> {
    let ranks = pieces_str.split('/').collect::<Vec<&str>>();
    if ranks.len() != 8 {
        return Err(FenParseError::NumRanks(ranks.len()));
    }

    let mut board = Board::empty();
    let mut ch_idx = 0;
    let placement_err = |idx| FenParseError::PiecePlacement(pieces_str.to_string(), idx);

    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_idx as u8;
        let mut file: u8 = 0;

        for ch in rank_str.chars() {
            if let Some(layer) = Layer::from_char(ch) {
                let square = Square::from_rank_file(rank, file).ok_or(placement_err(ch_idx))?;
                board.set_square(layer, square);
                file += 1;
            } else if let Some(digit) = ch.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += digit as u8;
                if file > 8 {
                    return Err(placement_err(ch_idx));
                }
            } else {
                return Err(placement_err(ch_idx));
            }
            ch_idx += 1;
        }

        if file != 8 {
            return Err(placement_err(ch_idx));
        }
        // Skip the '/'
        ch_idx += 1;
    }

    Ok(board)
}
