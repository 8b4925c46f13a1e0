//! Scenario tests for the legal move generator: pins, checks, castling
//! and the en passant edge cases.

use chess_core::Move;
use chess_movegen::{generate_legal_moves, Board};

/// Asserts the exact legal move set of a position, order-insensitive.
fn assert_moves(fen: &str, expected: &[&str]) {
    let board = Board::from_fen(fen).unwrap();
    let mut moves: Vec<String> = generate_legal_moves(&board)
        .into_iter()
        .map(|m| m.to_string())
        .collect();
    moves.sort();
    let mut expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(moves, expected, "legal moves of {}", fen);
}

fn moves_of(fen: &str) -> Vec<String> {
    let board = Board::from_fen(fen).unwrap();
    generate_legal_moves(&board)
        .into_iter()
        .map(|m| m.to_string())
        .collect()
}

#[test]
fn twenty_moves_in_the_starting_position() {
    assert_eq!(generate_legal_moves(&Board::new()).len(), 20);
}

#[test]
fn pinned_knight_cannot_move() {
    assert_moves("8/8/8/8/8/8/8/K2N2r1 w - - 0 1", &["a1a2", "a1b2", "a1b1"]);
}

#[test]
fn pinned_rook_may_slide_and_capture_along_the_pin() {
    assert_moves("8/8/8/8/8/k7/8/K1Rr4 w - - 0 1", &["a1b1", "c1b1", "c1d1"]);
}

#[test]
fn pinned_bishop_holds_its_diagonal() {
    // Bishop b2 is pinned by the queen on c3 and can only stay on the
    // long diagonal.
    let moves = moves_of("7k/8/8/8/8/2q5/1B6/K7 w - - 0 1");
    assert!(moves.contains(&"b2c3".to_string()));
    assert!(!moves.contains(&"b2a3".to_string()));
    assert!(!moves.contains(&"b2c1".to_string()));
}

#[test]
fn stalemate_yields_no_moves_without_check() {
    let board = Board::from_fen("8/8/8/8/8/1qk5/8/K7 w - - 0 1").unwrap();
    assert!(generate_legal_moves(&board).is_empty());
    assert!(!board.is_check());
}

#[test]
fn checkmate_yields_no_moves_in_check() {
    let board = Board::from_fen("8/8/8/8/8/2k5/1q6/K7 w - - 0 1").unwrap();
    assert!(generate_legal_moves(&board).is_empty());
    assert!(board.is_check());
}

#[test]
fn double_check_allows_only_king_moves() {
    assert_moves("8/7k/8/8/8/1n2Q3/8/K3r3 w - - 0 1", &["a1a2", "a1b2"]);
}

#[test]
fn double_check_by_two_knights() {
    assert_moves("8/7k/8/8/8/1nQ5/2n5/K7 w - - 0 1", &["a1a2", "a1b2", "a1b1"]);
}

#[test]
fn double_check_by_two_rooks() {
    assert_moves("8/7k/8/8/8/r1Q5/8/K1r5 w - - 0 1", &["a1b2"]);
}

#[test]
fn single_check_resolved_by_capture_or_interposition() {
    assert_moves("8/8/8/8/4Q3/k7/8/K3r3 w - - 0 1", &["e4b1", "e4e1"]);
}

#[test]
fn castling_both_sides_is_generated() {
    let moves = moves_of("8/8/8/8/8/4k3/8/R3K2R w KQ - 0 1");
    for expected in ["e1g1", "e1c1", "e1f1", "e1d1"] {
        assert!(moves.contains(&expected.to_string()), "missing {}", expected);
    }
}

#[test]
fn no_castling_without_rights() {
    let moves = moves_of("8/8/8/8/8/4k3/8/R3K2R w - - 0 1");
    assert!(!moves.contains(&"e1g1".to_string()));
    assert!(!moves.contains(&"e1c1".to_string()));
    assert!(moves.contains(&"e1f1".to_string()));
    assert!(moves.contains(&"e1d1".to_string()));
}

#[test]
fn no_castling_through_an_attacked_square() {
    // The rook on d2 guards d1: queenside castling and the plain king
    // step to d1 are both out, the kingside stays available.
    let moves = moves_of("8/8/8/8/8/4k3/3r4/R3K2R w KQ - 0 1");
    assert!(moves.contains(&"e1g1".to_string()));
    assert!(moves.contains(&"e1f1".to_string()));
    assert!(!moves.contains(&"e1c1".to_string()));
    assert!(!moves.contains(&"e1d1".to_string()));
}

#[test]
fn no_castling_while_in_check() {
    assert_moves("8/8/8/8/8/4k3/4r3/R3K2R w KQ - 0 1", &["e1d1", "e1f1"]);
}

#[test]
fn no_castling_into_check() {
    let moves = moves_of("8/8/8/6r1/8/4k3/8/R3K2R w KQ - 0 1");
    assert!(!moves.contains(&"e1g1".to_string()));
    assert!(moves.contains(&"e1c1".to_string()));
}

#[test]
fn castling_blocked_by_a_piece_between() {
    let moves = moves_of("8/8/8/8/8/4k3/8/RN2K2R w KQ - 0 1");
    assert!(moves.contains(&"e1g1".to_string()));
    assert!(!moves.contains(&"e1c1".to_string()));
}

#[test]
fn simple_en_passant_capture() {
    assert_moves(
        "4k3/8/8/3pP3/8/8/2q5/4K3 w - d6 0 1",
        &["e1f1", "e5e6", "e5d6"],
    );
}

#[test]
fn en_passant_horizontal_discovered_check_is_forbidden() {
    // Taking c6 en passant would clear both c5 and d5 from the fifth
    // rank and expose the king on a5 to the queen on h5.
    assert_moves(
        "8/8/8/K1pP3q/8/8/8/8 w - c6 0 1",
        &["d5d6", "a5a6", "a5b6", "a5b5", "a5a4"],
    );
}

#[test]
fn en_passant_capture_of_a_checking_pawn() {
    // The double push d7d5 left white in check from the d5 pawn (king on
    // e4); capturing it en passant is the only pawn answer.
    let board = Board::from_fen("4k3/8/8/3pP3/4K3/8/8/8 w - d6 0 1").unwrap();
    assert!(board.is_check());
    let moves = generate_legal_moves(&board);
    assert!(moves.contains(Move::parse("e5d6").unwrap()));
}

#[test]
fn en_passant_restricted_by_a_diagonal_pin() {
    // The e5 pawn is pinned by the bishop on h8 through its king on c3:
    // its en passant target d6 lies off the pin ray.
    let moves = moves_of("7b/8/8/3pP3/8/2K5/8/7k w - d6 0 1");
    assert!(!moves.contains(&"e5d6".to_string()));
    assert!(!moves.contains(&"e5e6".to_string()));
}

#[test]
fn every_move_leaves_the_mover_out_of_check() {
    let fens = [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "4k3/8/8/3pP3/4K3/8/8/8 w - d6 0 1",
    ];
    for fen in fens {
        let mut board = Board::from_fen(fen).unwrap();
        let mover = board.side_to_move();
        let moves = generate_legal_moves(&board);
        for &m in &moves {
            board.execute_move(m);
            let king = board.king_square(mover);
            assert!(
                board.attackers_of(king, mover, board.occupancy()).is_empty(),
                "{} leaves the king attacked in {}",
                m,
                fen
            );
            board.undo_move();
        }
    }
}
