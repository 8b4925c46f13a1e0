//! Bitboard board representation and legal chess move generation.
//!
//! This crate provides:
//! - [`Bitboard`] - a 64-bit square set with efficient operations
//! - [`Board`] - full game state with reversible make/unmake
//! - Legal move generation via check and pin analysis
//! - Magic-bitboard sliding attack lookup
//! - Perft node counting and a static evaluator
//!
//! # Architecture
//!
//! Piece placement is stored as twelve bitboards (six piece kinds per
//! color). Attack sets for knights, kings and pawns come from precomputed
//! tables; bishop, rook and queen attacks come from a magic-bitboard
//! perfect-hash table shared by all squares. The generator analyses
//! checkers and pin rays up front so that every emitted move is legal -
//! there is no retro-filtering pass.
//!
//! # Example
//!
//! ```
//! use chess_movegen::{generate_legal_moves, Board};
//!
//! let mut board = Board::new();
//! let moves = generate_legal_moves(&board);
//! assert_eq!(moves.len(), 20);
//!
//! board.execute_move(moves[0]);
//! board.undo_move();
//! assert_eq!(board, Board::new());
//! ```

mod bitboard;
mod board;
pub mod eval;
pub mod movegen;

pub use bitboard::Bitboard;
pub use board::{Board, CastlingRights};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{
    bishop_attacks, generate_legal_moves, king_moves, knight_moves, pawn_attacks, queen_attacks,
    rook_attacks, MoveList,
};
