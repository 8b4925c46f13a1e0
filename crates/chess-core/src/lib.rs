//! Core vocabulary types for chess.
//!
//! This crate provides the fundamental types shared by the engine layers:
//! - [`Color`] and [`Piece`] for piece identity
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for move representation
//! - [`Fen`] for parsing and validating FEN position strings

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::Move;
pub use piece::Piece;
pub use square::{File, Rank, Square};
