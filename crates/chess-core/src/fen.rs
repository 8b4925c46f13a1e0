//! FEN (Forsyth-Edwards Notation) field parsing and validation.

use crate::{Color, Piece, Rank, Square};
use thiserror::Error;

/// Errors raised while parsing a FEN string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 whitespace-separated fields, got {0}")]
    FieldCount(usize),

    #[error("invalid piece placement: {0}")]
    PiecePlacement(String),

    #[error("invalid side to move: expected 'w' or 'b', got '{0}'")]
    SideToMove(String),

    #[error("invalid castling rights: {0}")]
    CastlingRights(String),

    #[error("invalid en passant square: {0}")]
    EnPassant(String),

    #[error("invalid half-move clock: {0}")]
    HalfmoveClock(String),

    #[error("invalid full-move number: {0}")]
    FullmoveNumber(String),
}

/// The six fields of a FEN string, validated and typed.
///
/// The placement and castling fields stay textual; the board layer walks
/// them when it builds its bitboards. The full-move number is validated
/// but otherwise unused by the engine core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Piece placement, ranks 8 down to 1 separated by '/'.
    pub placement: String,
    /// The side to move.
    pub side_to_move: Color,
    /// Castling availability, some subset of "KQkq" (empty for "-").
    pub castling: String,
    /// En passant target square, if one exists.
    pub en_passant: Option<Square>,
    /// Half moves since the last pawn move or capture (50-move rule).
    pub halfmove_clock: u32,
    /// Full-move number, accepted but not consumed by the core.
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses and validates a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        Self::check_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let castling = Self::check_castling(fields[2])?;
        let en_passant = Self::check_en_passant(fields[3])?;

        let halfmove_clock = fields[4]
            .parse::<u32>()
            .map_err(|_| FenError::HalfmoveClock(fields[4].to_string()))?;
        let fullmove_number = fields[5]
            .parse::<u32>()
            .map_err(|_| FenError::FullmoveNumber(fields[5].to_string()))?;

        Ok(Fen {
            placement: fields[0].to_string(),
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn check_placement(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::PiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (i, rank) in ranks.iter().enumerate() {
            let mut squares = 0;
            for c in rank.chars() {
                if let Some(digit) = c.to_digit(10) {
                    if digit == 0 || digit > 8 {
                        return Err(FenError::PiecePlacement(format!(
                            "invalid run length {} in rank {}",
                            digit,
                            8 - i
                        )));
                    }
                    squares += digit;
                } else if Piece::from_fen_char(c).is_some() {
                    squares += 1;
                } else {
                    return Err(FenError::PiecePlacement(format!(
                        "unknown character '{}' in rank {}",
                        c,
                        8 - i
                    )));
                }
            }
            if squares != 8 {
                return Err(FenError::PiecePlacement(format!(
                    "rank {} covers {} squares, expected 8",
                    8 - i,
                    squares
                )));
            }
        }

        Ok(())
    }

    fn check_castling(castling: &str) -> Result<String, FenError> {
        if castling == "-" {
            return Ok(String::new());
        }
        if castling.is_empty() || castling.chars().any(|c| !"KQkq".contains(c)) {
            return Err(FenError::CastlingRights(castling.to_string()));
        }
        Ok(castling.to_string())
    }

    fn check_en_passant(field: &str) -> Result<Option<Square>, FenError> {
        if field == "-" {
            return Ok(None);
        }
        let square = Square::from_algebraic(field)
            .ok_or_else(|| FenError::EnPassant(field.to_string()))?;
        // Only the two ranks a double push can expose.
        if square.rank() != Rank::R3 && square.rank() != Rank::R6 {
            return Err(FenError::EnPassant(field.to_string()));
        }
        Ok(Some(square))
    }
}
