// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move generation. Pseudo-legal generation per piece kind, the attack-set computer built on the same attack
//! tables, and the legality filter that throws out moves leaving the mover's king attacked.

use crate::board::{Board, Placement};
use crate::core::*;

/// A mapping from every square to a set of destinations, used both for a color's legal moves and for the squares
/// its pieces attack. Squares without a piece of that color map to the empty set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveTable {
    destinations: [SquareSet; 64],
}

impl MoveTable {
    pub fn empty() -> MoveTable {
        MoveTable {
            destinations: [SquareSet::empty(); 64],
        }
    }

    pub fn get(&self, square: Square) -> SquareSet {
        self.destinations[square.index()]
    }

    fn set(&mut self, square: Square, destinations: SquareSet) {
        self.destinations[square.index()] = destinations;
    }

    /// Every destination reachable by some piece.
    pub fn union(&self) -> SquareSet {
        self.destinations
            .iter()
            .fold(SquareSet::empty(), |acc, &set| acc | set)
    }

    /// The total number of (piece, destination) pairs.
    pub fn count(&self) -> u32 {
        self.destinations.iter().map(|set| set.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.iter().all(|set| set.is_empty())
    }

    /// Iterates over the squares with at least one destination, in square order.
    pub fn iter(&self) -> impl Iterator<Item = (Square, SquareSet)> + '_ {
        squares()
            .map(move |sq| (sq, self.get(sq)))
            .filter(|(_, set)| !set.is_empty())
    }
}

impl Default for MoveTable {
    fn default() -> Self {
        MoveTable::empty()
    }
}

/// Squares threatened by the piece on `square`. Sliders see up to and including the first occupied square on each
/// ray, whoever owns it, so squares holding friendly pieces count as attacked (defended). Pawns threaten only their
/// diagonals.
pub fn attack_set(placement: &Placement, square: Square) -> SquareSet {
    match placement.piece_at(square) {
        Some(piece) => attacks(piece.kind, piece.color, square, placement.occupancy()),
        None => SquareSet::empty(),
    }
}

/// The attack-set computer: for every piece of `color`, the squares it attacks.
pub fn attack_table(placement: &Placement, color: Color) -> MoveTable {
    let mut table = MoveTable::empty();
    for square in placement.pieces(color) {
        table.set(square, attack_set(placement, square));
    }

    table
}

pub fn generate_pawn_moves(board: &Board, ply: u32, source: Square, moves: &mut Vec<Move>) {
    let cell = board.cell(source);
    let us = match cell.piece() {
        Some(Piece {
            kind: PieceKind::Pawn,
            color,
        }) => color,
        _ => return,
    };

    let them = us.toggle();
    let ahead = us.pawn_step();
    let promo_rank = match us {
        Color::White => SS_RANK_8,
        Color::Black => SS_RANK_1,
    };

    let push = |moves: &mut Vec<Move>, dest: Square, capture: bool| {
        if promo_rank.contains(dest) {
            for kind in [
                PieceKind::Queen,
                PieceKind::Rook,
                PieceKind::Bishop,
                PieceKind::Knight,
            ] {
                if capture {
                    moves.push(Move::promotion_capture(source, dest, kind));
                } else {
                    moves.push(Move::promotion(source, dest, kind));
                }
            }
        } else if capture {
            moves.push(Move::capture(source, dest));
        } else {
            moves.push(Move::quiet(source, dest));
        }
    };

    // Single and double pushes. The double push needs both squares clear and a pawn that has never moved.
    if let Some(single) = source.offset(ahead, 0) {
        if board.cell(single).is_empty() {
            push(moves, single, false);
            if !cell.has_moved() {
                if let Some(double) = single.offset(ahead, 0) {
                    if board.cell(double).is_empty() {
                        moves.push(Move::double_pawn_push(source, double));
                    }
                }
            }
        }
    }

    for target in pawn_attacks(source, us) {
        if board.cell(target).color() == Some(them) {
            push(moves, target, true);
        }
    }

    // En-passant: our pawn stands on its fifth rank and an enemy pawn beside it has made exactly one move, a
    // two-square advance, on the previous ply.
    if source.rank().relative_to(us) != RANK_5 {
        return;
    }

    for files in [-1, 1] {
        let beside = match source.offset(0, files) {
            Some(sq) => board.cell(sq),
            None => continue,
        };

        if beside.piece() != Some(Piece::new(them, PieceKind::Pawn)) {
            continue;
        }

        let advanced_twice_last_ply = match beside.history() {
            [step] => {
                step.ply + 1 == ply
                    && (step.from.rank().as_u8() as i8 - beside.square().rank().as_u8() as i8)
                        .abs()
                        == 2
            }
            _ => false,
        };

        if !advanced_twice_last_ply {
            continue;
        }

        if let Some(dest) = beside.square().offset(ahead, 0) {
            if board.cell(dest).is_empty() {
                moves.push(Move::en_passant(source, dest));
            }
        }
    }
}

/// Knights and sliders: every attacked square not holding a friendly piece.
pub fn generate_moves_for_piece(board: &Board, source: Square, moves: &mut Vec<Move>) {
    let piece = match board.piece_at(source) {
        Some(piece) => piece,
        None => return,
    };

    debug_assert!(
        piece.kind != PieceKind::King && piece.kind != PieceKind::Pawn,
        "kings and pawns have their own movegen routines"
    );

    let placement = board.placement();
    let enemy_pieces = placement.pieces(piece.color.toggle());
    let our_pieces = placement.pieces(piece.color);
    for atk in attacks(piece.kind, piece.color, source, placement.occupancy()) & !our_pieces {
        if enemy_pieces.contains(atk) {
            moves.push(Move::capture(source, atk));
        } else {
            moves.push(Move::quiet(source, atk));
        }
    }
}

/// King steps and castles. `their_attacks` is the opponent's current attack set; it already covers the squares
/// next to the opponent's king.
pub fn generate_king_moves(
    board: &Board,
    source: Square,
    their_attacks: SquareSet,
    moves: &mut Vec<Move>,
) {
    let cell = board.cell(source);
    let us = match cell.piece() {
        Some(Piece {
            kind: PieceKind::King,
            color,
        }) => color,
        _ => return,
    };

    for target in king_attacks(source) {
        if their_attacks.contains(target) {
            continue;
        }

        match board.cell(target).color() {
            Some(color) if color == us => {}
            Some(_) => moves.push(Move::capture(source, target)),
            None => moves.push(Move::quiet(source, target)),
        }
    }

    let home_rank = us.back_rank();
    if cell.has_moved() || source != Square::of(home_rank, FILE_E) {
        return;
    }

    // (rook file, squares strictly between king and rook, squares the king stands on or crosses, landing file)
    let sides: [(File, &[File], [File; 3], File); 2] = [
        (FILE_H, &[FILE_F, FILE_G], [FILE_E, FILE_F, FILE_G], FILE_G),
        (FILE_A, &[FILE_B, FILE_C, FILE_D], [FILE_E, FILE_D, FILE_C], FILE_C),
    ];

    for (rook_file, between, king_path, landing) in sides {
        let rook = board.cell(Square::of(home_rank, rook_file));
        if rook.piece() != Some(Piece::new(us, PieceKind::Rook)) || rook.has_moved() {
            continue;
        }

        if between
            .iter()
            .any(|&file| !board.cell(Square::of(home_rank, file)).is_empty())
        {
            continue;
        }

        if king_path
            .iter()
            .any(|&file| their_attacks.contains(Square::of(home_rank, file)))
        {
            continue;
        }

        let dest = Square::of(home_rank, landing);
        if landing == FILE_G {
            moves.push(Move::kingside_castle(source, dest));
        } else {
            moves.push(Move::queenside_castle(source, dest));
        }
    }
}

/// Generates the pseudo-legal moves of the piece on `source`, ignoring whether they expose its own king.
pub fn generate_pseudo_legal(
    board: &Board,
    ply: u32,
    source: Square,
    their_attacks: SquareSet,
    moves: &mut Vec<Move>,
) {
    match board.cell(source).kind() {
        Some(PieceKind::Pawn) => generate_pawn_moves(board, ply, source, moves),
        Some(PieceKind::King) => generate_king_moves(board, source, their_attacks, moves),
        Some(_) => generate_moves_for_piece(board, source, moves),
        None => {}
    }
}

/// Legality test for moves that are already known to be pseudolegal: plays the move on a scratch copy of the
/// placement and checks that the mover's king is not attacked afterwards.
pub fn is_legal_given_pseudolegal(placement: &Placement, mov: Move) -> bool {
    let us = match placement.piece_at(mov.source()) {
        Some(piece) => piece.color,
        None => return false,
    };

    let mut scratch = *placement;
    scratch.play(mov);
    match scratch.king(us) {
        Some(king) => !scratch.is_attacked(king, us.toggle()),
        None => true,
    }
}

/// Generates the legal moves of the piece on `source`.
pub fn generate_legal(
    board: &Board,
    ply: u32,
    source: Square,
    their_attacks: SquareSet,
    moves: &mut Vec<Move>,
) {
    let start = moves.len();
    generate_pseudo_legal(board, ply, source, their_attacks, moves);
    let placement = board.placement();
    let mut i = start;
    while i < moves.len() {
        if is_legal_given_pseudolegal(&placement, moves[i]) {
            i += 1;
        } else {
            moves.swap_remove(i);
        }
    }
}

/// The legal destinations of every piece of `us`.
pub fn legal_table(board: &Board, ply: u32, us: Color, their_attacks: SquareSet) -> MoveTable {
    let mut table = MoveTable::empty();
    let mut moves = Vec::new();
    for square in board.placement().pieces(us) {
        moves.clear();
        generate_legal(board, ply, square, their_attacks, &mut moves);
        table.set(square, moves.iter().map(|m| m.destination()).collect());
    }

    table
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::board::Board;

    fn legal_moves(layout: &str, ply: u32, source: Square) -> Vec<Move> {
        let board = Board::from_setup(layout).unwrap();
        let us = board.piece_at(source).unwrap().color;
        let their_attacks = attack_table(&board.placement(), us.toggle()).union();
        let mut moves = Vec::new();
        generate_legal(&board, ply, source, their_attacks, &mut moves);
        moves
    }

    fn assert_moves_generated(layout: &str, source: Square, expected: &[Move]) {
        let moves = legal_moves(layout, 1, source);
        let generated: HashSet<_> = moves.iter().collect();
        let expected: HashSet<_> = expected.iter().collect();
        if generated != expected {
            println!("{}", Board::from_setup(layout).unwrap().as_setup());
            println!("generated: {:?}", moves);
            panic!("expected {:?}", expected);
        }
    }

    fn assert_moves_does_not_contain(layout: &str, source: Square, banned: &[Move]) {
        let moves = legal_moves(layout, 1, source);
        for mov in banned {
            if moves.contains(mov) {
                println!("moves: {:?}", moves);
                panic!("move list contained banned move: {}", mov)
            }
        }
    }

    mod pawns {
        use super::*;

        #[test]
        fn single_and_double_push() {
            assert_moves_generated(
                concat!(
                    "____k___", "________", "________", "________", "________", "________",
                    "__P_____", "____K___",
                ),
                C2,
                &[Move::quiet(C2, C3), Move::double_pawn_push(C2, C4)],
            );
        }

        #[test]
        fn moved_pawn_pushes_once() {
            assert_moves_generated(
                concat!(
                    "____k___", "________", "________", "________", "__P_____", "________",
                    "________", "____K___",
                ),
                C4,
                &[Move::quiet(C4, C5)],
            );
        }

        #[test]
        fn no_double_pawn_push_when_blocked() {
            assert_moves_does_not_contain(
                concat!(
                    "____k___", "________", "________", "________", "________", "__p_____",
                    "__P_____", "____K___",
                ),
                C2,
                &[Move::quiet(C2, C3), Move::double_pawn_push(C2, C4)],
            );
        }

        #[test]
        fn black_pawn_captures() {
            assert_moves_generated(
                concat!(
                    "____k___", "___p____", "__N_B___", "________", "________", "________",
                    "________", "____K___",
                ),
                D7,
                &[
                    Move::quiet(D7, D6),
                    Move::double_pawn_push(D7, D5),
                    Move::capture(D7, C6),
                    Move::capture(D7, E6),
                ],
            );
        }

        #[test]
        fn pawn_promo_captures() {
            assert_moves_generated(
                concat!(
                    "__nnn__k", "___P____", "________", "________", "________", "________",
                    "________", "____K___",
                ),
                D7,
                &[
                    Move::promotion_capture(D7, C8, PieceKind::Bishop),
                    Move::promotion_capture(D7, C8, PieceKind::Knight),
                    Move::promotion_capture(D7, C8, PieceKind::Rook),
                    Move::promotion_capture(D7, C8, PieceKind::Queen),
                    Move::promotion_capture(D7, E8, PieceKind::Bishop),
                    Move::promotion_capture(D7, E8, PieceKind::Knight),
                    Move::promotion_capture(D7, E8, PieceKind::Rook),
                    Move::promotion_capture(D7, E8, PieceKind::Queen),
                ],
            )
        }

        #[test]
        fn en_passant_after_double_advance() {
            let mut board = Board::from_setup(concat!(
                "____k___", "___p____", "________", "____P___", "________", "________",
                "________", "____K___",
            ))
            .unwrap();
            board.carry_out(Move::double_pawn_push(D7, D5), 4);
            let their_attacks = attack_table(&board.placement(), Color::Black).union();

            let mut moves = Vec::new();
            generate_legal(&board, 5, E5, their_attacks, &mut moves);
            assert!(moves.contains(&Move::en_passant(E5, D6)));

            // one ply too late
            moves.clear();
            generate_legal(&board, 7, E5, their_attacks, &mut moves);
            assert!(!moves.contains(&Move::en_passant(E5, D6)));
        }

        #[test]
        fn no_en_passant_after_two_single_steps() {
            let mut board = Board::from_setup(concat!(
                "____k___", "________", "___p____", "____P___", "________", "________",
                "________", "____K___",
            ))
            .unwrap();
            // d6 is not the pawn's starting square, so it already counts as moved with no history. One single step
            // to d5 leaves one history entry, but not a two-square advance.
            board.carry_out(Move::quiet(D6, D5), 4);
            let their_attacks = attack_table(&board.placement(), Color::Black).union();
            let mut moves = Vec::new();
            generate_legal(&board, 5, E5, their_attacks, &mut moves);
            assert!(!moves.contains(&Move::en_passant(E5, D6)));
        }
    }

    mod pieces {
        use super::*;

        #[test]
        fn bishop_captures_and_stops() {
            assert_moves_generated(
                concat!(
                    "____k___", "________", "________", "__p_p___", "___B____", "__P_p___",
                    "________", "____K___",
                ),
                D4,
                &[
                    Move::capture(D4, E5),
                    Move::capture(D4, E3),
                    Move::capture(D4, C5),
                ],
            );
        }

        #[test]
        fn knight_jumps_over_pieces() {
            assert_moves_generated(
                concat!(
                    "____k___", "________", "________", "________", "________", "________",
                    "PPP_____", "RN__K___",
                ),
                B1,
                &[Move::quiet(B1, A3), Move::quiet(B1, C3), Move::quiet(B1, D2)],
            );
        }

        #[test]
        fn queen_is_rook_and_bishop() {
            let moves = legal_moves(
                concat!(
                    "k_______", "________", "________", "________", "___Q____", "________",
                    "________", "_______K",
                ),
                1,
                D4,
            );
            assert_eq!(27, moves.len());
        }

        #[test]
        fn pinned_rook_moves_along_pin() {
            assert_moves_generated(
                concat!(
                    "____r__k", "________", "________", "________", "________", "________",
                    "____R___", "____K___",
                ),
                E2,
                &[
                    Move::quiet(E2, E3),
                    Move::quiet(E2, E4),
                    Move::quiet(E2, E5),
                    Move::quiet(E2, E6),
                    Move::quiet(E2, E7),
                    Move::capture(E2, E8),
                ],
            );
        }
    }

    mod kings {
        use super::*;

        #[test]
        fn king_avoids_attacked_squares() {
            assert_moves_generated(
                concat!(
                    "___r___k", "________", "________", "________", "________", "________",
                    "________", "____K___",
                ),
                E1,
                &[
                    Move::quiet(E1, E2),
                    Move::quiet(E1, F2),
                    Move::quiet(E1, F1),
                ],
            );
        }

        #[test]
        fn king_keeps_distance_from_king() {
            assert_moves_does_not_contain(
                concat!(
                    "________", "________", "________", "____k___", "________", "____K___",
                    "________", "________",
                ),
                E3,
                &[
                    Move::quiet(E3, D4),
                    Move::quiet(E3, E4),
                    Move::quiet(E3, F4),
                ],
            );
        }

        #[test]
        fn king_cannot_retreat_along_checking_ray() {
            assert_moves_does_not_contain(
                concat!(
                    "____r__k", "________", "________", "________", "________", "________",
                    "____K___", "________",
                ),
                E2,
                &[Move::quiet(E2, E1)],
            );
        }

        #[test]
        fn king_cannot_capture_defended_piece() {
            assert_moves_does_not_contain(
                concat!(
                    "____r__k", "________", "________", "________", "________", "________",
                    "____r___", "____K___",
                ),
                E1,
                &[Move::capture(E1, E2)],
            );
        }

        #[test]
        fn both_castles() {
            let moves = legal_moves(
                concat!(
                    "____k___", "________", "________", "________", "________", "________",
                    "________", "R___K__R",
                ),
                1,
                E1,
            );
            assert!(moves.contains(&Move::kingside_castle(E1, G1)));
            assert!(moves.contains(&Move::queenside_castle(E1, C1)));
        }

        #[test]
        fn no_castle_through_attack() {
            let moves = legal_moves(
                concat!(
                    "____k___", "________", "________", "________", "________", "_____r__",
                    "________", "R___K__R",
                ),
                1,
                E1,
            );
            assert!(!moves.contains(&Move::kingside_castle(E1, G1)));
            assert!(moves.contains(&Move::queenside_castle(E1, C1)));
        }

        #[test]
        fn no_castle_when_blocked_or_in_check() {
            let moves = legal_moves(
                concat!(
                    "____k___", "________", "________", "________", "____r___", "________",
                    "________", "R___K__R",
                ),
                1,
                E1,
            );
            assert!(!moves.iter().any(|m| m.is_castle()));

            let moves = legal_moves(
                concat!(
                    "____k___", "________", "________", "________", "________", "________",
                    "________", "RN__K_NR",
                ),
                1,
                E1,
            );
            assert!(!moves.iter().any(|m| m.is_castle()));
        }

        #[test]
        fn queenside_b_file_may_be_attacked() {
            let moves = legal_moves(
                concat!(
                    "____k___", "________", "________", "________", "________", "_r______",
                    "________", "R___K___",
                ),
                1,
                E1,
            );
            assert!(moves.contains(&Move::queenside_castle(E1, C1)));
        }
    }

    mod tables {
        use super::*;
        use crate::board::STANDARD_SETUP;

        #[test]
        fn attack_table_excludes_pawn_pushes() {
            let board = Board::from_setup(STANDARD_SETUP).unwrap();
            let attacks = attack_table(&board.placement(), Color::White);
            assert_eq!(
                vec![D3, F3].into_iter().collect::<SquareSet>(),
                attacks.get(E2)
            );
            assert!(!attacks.union().contains(E4));
            assert!(attacks.union().contains(F3));
        }

        #[test]
        fn legal_table_from_start() {
            let board = Board::from_setup(STANDARD_SETUP).unwrap();
            let black_attacks = attack_table(&board.placement(), Color::Black).union();
            let table = legal_table(&board, 1, Color::White, black_attacks);
            assert_eq!(20, table.count());
            assert_eq!(
                vec![A3, C3].into_iter().collect::<SquareSet>(),
                table.get(B1)
            );
            assert!(table.get(A1).is_empty());
            assert_eq!(10, table.iter().count());
        }
    }
}
