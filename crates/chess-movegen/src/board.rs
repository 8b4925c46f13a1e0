//! Board state, piece queries and reversible move execution.

use crate::movegen::{self, magics};
use crate::Bitboard;
use chess_core::{Color, Fen, FenError, Move, Piece, Rank, Square};
use std::fmt;

/// Castling availability as a 4-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;

    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Returns true if the given side may still castle kingside.
    #[inline]
    pub const fn can_kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        self.0 & flag != 0
    }

    /// Returns true if the given side may still castle queenside.
    #[inline]
    pub const fn can_queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        self.0 & flag != 0
    }

    /// Removes the given right flags.
    #[inline]
    pub fn remove(&mut self, flags: u8) {
        self.0 &= !flags;
    }

    /// Adds the given right flags.
    #[inline]
    pub fn add(&mut self, flags: u8) {
        self.0 |= flags & 0b1111;
    }

    /// Returns the raw flag bits.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Discriminates the special move forms for undo bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveKind {
    Normal,
    Promotion,
    EnPassant,
    WhiteKingside,
    WhiteQueenside,
    BlackKingside,
    BlackQueenside,
}

/// Everything needed to reverse one executed move.
#[derive(Debug, Clone, Copy)]
struct Undo {
    piece: Piece,
    capture: Option<Piece>,
    from: Square,
    to: Square,
    en_passant: Option<Square>,
    castling: CastlingRights,
    halfmove_clock: u32,
    kind: MoveKind,
}

// The fixed king journeys; a king move matching one of these while
// castling rights could exist identifies the castle form.
const WHITE_KINGSIDE_MOVE: Move = Move::normal(Square::E1, Square::G1);
const WHITE_QUEENSIDE_MOVE: Move = Move::normal(Square::E1, Square::C1);
const BLACK_KINGSIDE_MOVE: Move = Move::normal(Square::E8, Square::G8);
const BLACK_QUEENSIDE_MOVE: Move = Move::normal(Square::E8, Square::C8);

impl Undo {
    fn record(board: &Board, mv: Move) -> Self {
        let (piece, _) = board
            .piece_at(mv.from())
            .expect("no piece on the move's start square");
        let mut capture = board.piece_at(mv.to()).map(|(p, _)| p);

        let kind = if piece == Piece::Pawn && board.en_passant == Some(mv.to()) {
            capture = Some(Piece::Pawn);
            MoveKind::EnPassant
        } else if piece == Piece::King && mv == WHITE_KINGSIDE_MOVE {
            MoveKind::WhiteKingside
        } else if piece == Piece::King && mv == WHITE_QUEENSIDE_MOVE {
            MoveKind::WhiteQueenside
        } else if piece == Piece::King && mv == BLACK_KINGSIDE_MOVE {
            MoveKind::BlackKingside
        } else if piece == Piece::King && mv == BLACK_QUEENSIDE_MOVE {
            MoveKind::BlackQueenside
        } else if mv.promotion().is_some() {
            MoveKind::Promotion
        } else {
            MoveKind::Normal
        };

        Undo {
            piece,
            capture,
            from: mv.from(),
            to: mv.to(),
            en_passant: board.en_passant,
            castling: board.castling,
            halfmove_clock: board.halfmove_clock,
            kind,
        }
    }
}

/// The square of the pawn captured by an en passant move to `ep`.
pub(crate) fn en_passant_victim(ep: Square) -> Square {
    let delta = if ep.rank() == Rank::R3 { 8 } else { -8 };
    ep.offset(delta).expect("en passant squares are on rank 3 or 6")
}

/// Complete chess game state.
///
/// Twelve piece bitboards plus the scalar state FEN describes, and an
/// undo stack that makes [`execute_move`](Board::execute_move) fully
/// reversible.
#[derive(Debug, Clone)]
pub struct Board {
    /// Piece bitboards, indexed by color then piece kind.
    pieces: [[Bitboard; 6]; 2],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    undo_stack: Vec<Undo>,
}

/// Positions compare by board and scalar state; the undo history is a
/// private log and takes no part in equality.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
    }
}

impl Eq for Board {}

impl Board {
    /// Creates the standard starting position.
    pub fn new() -> Self {
        Self::from_fen(Fen::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a board from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = Fen::parse(fen)?;
        let mut board = Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            side_to_move: parsed.side_to_move,
            castling: CastlingRights::NONE,
            en_passant: parsed.en_passant,
            halfmove_clock: parsed.halfmove_clock,
            undo_stack: Vec::new(),
        };

        for (rank_idx, rank_str) in parsed.placement.split('/').enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    file += run as u8;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    // Fen::parse validated every character and run length.
                    let sq = unsafe { Square::from_index_unchecked(rank * 8 + file) };
                    board.set(sq, piece, color);
                    file += 1;
                }
            }
        }

        for c in parsed.castling.chars() {
            board.castling.add(match c {
                'K' => CastlingRights::WHITE_KINGSIDE,
                'Q' => CastlingRights::WHITE_QUEENSIDE,
                'k' => CastlingRights::BLACK_KINGSIDE,
                'q' => CastlingRights::BLACK_QUEENSIDE,
                _ => 0,
            });
        }

        Ok(board)
    }

    /// Renders the position as a FEN string.
    ///
    /// The board does not track the full-move number, so the sixth field
    /// is always rendered as 0.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                let sq = unsafe { Square::from_index_unchecked(rank * 8 + file) };
                if let Some((piece, color)) = self.piece_at(sq) {
                    if empty_run > 0 {
                        fen.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    fen.push(piece.to_fen_char(color));
                } else {
                    empty_run += 1;
                }
            }
            if empty_run > 0 {
                fen.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        fen.push_str(&self.castling_field());

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} 0", self.halfmove_clock));
        fen
    }

    /// The castling field as FEN writes it: "KQkq" subsets or "-".
    fn castling_field(&self) -> String {
        if self.castling.raw() == 0 {
            return "-".to_string();
        }
        let mut field = String::new();
        for (flag, c) in [
            (CastlingRights::WHITE_KINGSIDE, 'K'),
            (CastlingRights::WHITE_QUEENSIDE, 'Q'),
            (CastlingRights::BLACK_KINGSIDE, 'k'),
            (CastlingRights::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.castling.raw() & flag != 0 {
                field.push(c);
            }
        }
        field
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the current castling rights.
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the en passant target square, if one exists.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Returns the half moves since the last pawn move or capture.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Returns the number of moves currently held on the undo stack.
    #[inline]
    pub fn ply_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns the bitboard of the given piece kind in the given color.
    #[inline]
    pub fn for_piece(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Returns the bitboard of all pieces of the given color.
    #[inline]
    pub fn for_color(&self, color: Color) -> Bitboard {
        let boards = &self.pieces[color.index()];
        boards[0] | boards[1] | boards[2] | boards[3] | boards[4] | boards[5]
    }

    /// Returns the bitboard of all pieces of both colors.
    #[inline]
    pub fn occupancy(&self) -> Bitboard {
        self.for_color(Color::White) | self.for_color(Color::Black)
    }

    /// Returns the piece and color on the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        for color in [Color::White, Color::Black] {
            if !self.for_color(color).contains(sq) {
                continue;
            }
            for piece in Piece::ALL {
                if self.for_piece(piece, color).contains(sq) {
                    return Some((piece, color));
                }
            }
        }
        None
    }

    /// Returns the square of the given color's king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.for_piece(Piece::King, color)
            .lsb()
            .expect("each side has exactly one king")
    }

    /// Places a piece on a square.
    fn set(&mut self, sq: Square, piece: Piece, color: Color) {
        self.pieces[color.index()][piece.index()].set(sq);
    }

    /// Removes whatever stands on a square.
    fn unset(&mut self, sq: Square) {
        for side in &mut self.pieces {
            for bb in side {
                bb.clear(sq);
            }
        }
    }

    /// Returns the pseudo-legal destinations of a single piece of the
    /// given kind and color standing on `from`, against the given
    /// occupancy. Ignores checks and pins; en passant and castling are
    /// not part of this primitive. Own-color squares are always excluded.
    pub fn get_moves(&self, piece: Piece, color: Color, from: Square, occupancy: Bitboard) -> Bitboard {
        let moves = match piece {
            Piece::Pawn => {
                let origin = Bitboard::from_square(from);
                let forward = |bb: Bitboard| match color {
                    Color::White => bb.north(),
                    Color::Black => bb.south(),
                };
                let mut moves = forward(origin) & !occupancy;
                if from.rank() == color.pawn_rank() && moves.is_not_empty() {
                    moves |= forward(moves) & !occupancy;
                }
                moves | (movegen::pawn_attacks(from, color) & occupancy)
            }
            Piece::Knight => movegen::knight_moves(from),
            Piece::King => movegen::king_moves(from),
            Piece::Bishop => magics::bishop_attacks(from, occupancy),
            Piece::Rook => magics::rook_attacks(from, occupancy),
            Piece::Queen => magics::queen_attacks(from, occupancy),
        };
        moves & !self.for_color(color)
    }

    /// Returns the squares of opposing pieces attacking `sq`, with the
    /// attacked side playing `defender`.
    ///
    /// Uses movement symmetry: a piece on `a` attacks `sq` exactly when
    /// the same kind of piece on `sq` would attack `a`. Pawns are the one
    /// asymmetric kind, which the color-indexed pawn table absorbs: the
    /// defender's own attack pattern from `sq` lands on the squares
    /// opposing pawns attack `sq` from.
    pub fn attackers_of(&self, sq: Square, defender: Color, occupancy: Bitboard) -> Bitboard {
        let mut attackers = Bitboard::EMPTY;
        for piece in Piece::ALL {
            attackers |= self.get_moves(piece, defender, sq, occupancy)
                & self.for_piece(piece, defender.opposite());
        }
        attackers
    }

    /// Returns true if the side to move's king is attacked.
    pub fn is_check(&self) -> bool {
        let king = self.king_square(self.side_to_move);
        self.attackers_of(king, self.side_to_move, self.occupancy())
            .is_not_empty()
    }

    /// Applies a move to the board and pushes an undo record.
    ///
    /// The move must be legal for the current position; feeding an
    /// arbitrary move is a programming error.
    pub fn execute_move(&mut self, mv: Move) {
        let undo = Undo::record(self, mv);
        self.undo_stack.push(undo);
        let us = self.side_to_move;

        if undo.piece == Piece::Pawn || undo.capture.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        // Any touch of a king or rook home square voids the matching
        // rights, whether by the piece itself or by its captor.
        let touched = Bitboard::from_square(mv.from()) | Bitboard::from_square(mv.to());
        let e1h1 = Bitboard::from_square(Square::E1) | Bitboard::from_square(Square::H1);
        let e1a1 = Bitboard::from_square(Square::E1) | Bitboard::from_square(Square::A1);
        let e8h8 = Bitboard::from_square(Square::E8) | Bitboard::from_square(Square::H8);
        let e8a8 = Bitboard::from_square(Square::E8) | Bitboard::from_square(Square::A8);
        if (touched & e1h1).is_not_empty() {
            self.castling.remove(CastlingRights::WHITE_KINGSIDE);
        }
        if (touched & e1a1).is_not_empty() {
            self.castling.remove(CastlingRights::WHITE_QUEENSIDE);
        }
        if (touched & e8h8).is_not_empty() {
            self.castling.remove(CastlingRights::BLACK_KINGSIDE);
        }
        if (touched & e8a8).is_not_empty() {
            self.castling.remove(CastlingRights::BLACK_QUEENSIDE);
        }

        // A double push opens en passant, but only when the pawn could
        // also have made the single push.
        self.en_passant = if undo.piece == Piece::Pawn
            && mv.from().rank() == us.pawn_rank()
            && mv.to().rank() == us.double_push_rank()
        {
            mv.from().offset(us.forward()).filter(|&mid| {
                self.get_moves(Piece::Pawn, us, mid, self.occupancy())
                    .is_not_empty()
            })
        } else {
            None
        };

        if undo.capture.is_some() {
            self.unset(mv.to());
        }

        match undo.kind {
            MoveKind::EnPassant => {
                if let Some(ep) = undo.en_passant {
                    self.unset(en_passant_victim(ep));
                }
            }
            MoveKind::WhiteKingside => {
                self.unset(Square::H1);
                self.set(Square::F1, Piece::Rook, us);
            }
            MoveKind::WhiteQueenside => {
                self.unset(Square::A1);
                self.set(Square::D1, Piece::Rook, us);
            }
            MoveKind::BlackKingside => {
                self.unset(Square::H8);
                self.set(Square::F8, Piece::Rook, us);
            }
            MoveKind::BlackQueenside => {
                self.unset(Square::A8);
                self.set(Square::D8, Piece::Rook, us);
            }
            MoveKind::Normal | MoveKind::Promotion => {}
        }

        self.unset(mv.from());
        self.set(mv.to(), mv.promotion().unwrap_or(undo.piece), us);

        self.side_to_move = us.opposite();
    }

    /// Reverses the most recently executed move, restoring the board
    /// bit for bit.
    ///
    /// # Panics
    /// Panics if no move has been executed.
    pub fn undo_move(&mut self) {
        let undo = self
            .undo_stack
            .pop()
            .expect("undo_move called with no move to undo");

        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.castling = undo.castling;
        self.side_to_move = self.side_to_move.opposite();
        let us = self.side_to_move;
        let them = us.opposite();

        self.unset(undo.to);
        if undo.kind != MoveKind::EnPassant {
            if let Some(captured) = undo.capture {
                self.set(undo.to, captured, them);
            }
        }

        match undo.kind {
            MoveKind::EnPassant => {
                if let Some(ep) = undo.en_passant {
                    self.set(en_passant_victim(ep), Piece::Pawn, them);
                }
            }
            MoveKind::WhiteKingside => {
                self.unset(Square::F1);
                self.set(Square::H1, Piece::Rook, us);
            }
            MoveKind::WhiteQueenside => {
                self.unset(Square::D1);
                self.set(Square::A1, Piece::Rook, us);
            }
            MoveKind::BlackKingside => {
                self.unset(Square::F8);
                self.set(Square::H8, Piece::Rook, us);
            }
            MoveKind::BlackQueenside => {
                self.unset(Square::D8);
                self.set(Square::A8, Piece::Rook, us);
            }
            MoveKind::Normal | MoveKind::Promotion => {}
        }

        let piece = if undo.kind == MoveKind::Promotion {
            Piece::Pawn
        } else {
            undo.piece
        };
        self.set(undo.from, piece, us);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let sq = unsafe { Square::from_index_unchecked(rank * 8 + file) };
                match self.piece_at(sq) {
                    Some((piece, color)) => write!(f, "{} ", piece.to_fen_char(color))?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(
            f,
            "{} to move, castling: {}, en passant: {}, halfmove clock: {}",
            self.side_to_move,
            self.castling_field(),
            match self.en_passant {
                Some(sq) => sq.to_algebraic(),
                None => "-".to_string(),
            },
            self.halfmove_clock
        )
    }
}
