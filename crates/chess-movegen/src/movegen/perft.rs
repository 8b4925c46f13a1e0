//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree at a fixed depth.
//! Comparing the counts against published values exercises every corner
//! of the generator and of make/unmake at once.

use super::generate_legal_moves;
use crate::Board;

/// Counts the leaf positions reachable in exactly `depth` plies.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        board.execute_move(m);
        nodes += perft(board, depth - 1);
        board.undo_move();
    }
    nodes
}

/// Perft split by first move, sorted by move text.
///
/// The per-move subtotals make it easy to pinpoint which move family a
/// miscount hides under.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(String, u64)> {
    let moves = generate_legal_moves(board);
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        board.execute_move(m);
        let nodes = if depth > 1 { perft(board, depth - 1) } else { 1 };
        board.undo_move();
        results.push((m.to_string(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
