// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::core::*;
use std::fmt;

/// The category of a move. Everything the position needs to know to carry a move out, beyond its two squares,
/// lives here.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    DoublePawnPush,
    KingsideCastle,
    QueensideCastle,
    Capture,
    EnPassant,
    Promotion(PieceKind),
    PromotionCapture(PieceKind),
}

/// A move from a source square to a destination square.
///
/// Castles are encoded using the king's start and stop squares; the rook's movement is implied. En-passant
/// captures are encoded with the capturing pawn's destination, which is not the square of the captured pawn.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    source: Square,
    destination: Square,
    kind: MoveKind,
}

impl Move {
    pub fn new(source: Square, destination: Square, kind: MoveKind) -> Move {
        debug_assert!(
            match kind {
                MoveKind::Promotion(piece) | MoveKind::PromotionCapture(piece) =>
                    piece.is_promotion_target(),
                _ => true,
            },
            "invalid promotion piece"
        );
        Move {
            source,
            destination,
            kind,
        }
    }

    /// Constructs a new quiet move from the source square to the destination square.
    pub fn quiet(source: Square, dest: Square) -> Move {
        Move::new(source, dest, MoveKind::Quiet)
    }

    /// Constructs a new capture move from the source square to the destination square.
    pub fn capture(source: Square, dest: Square) -> Move {
        Move::new(source, dest, MoveKind::Capture)
    }

    pub fn en_passant(source: Square, dest: Square) -> Move {
        Move::new(source, dest, MoveKind::EnPassant)
    }

    pub fn double_pawn_push(source: Square, dest: Square) -> Move {
        Move::new(source, dest, MoveKind::DoublePawnPush)
    }

    pub fn promotion(source: Square, dest: Square, promoted: PieceKind) -> Move {
        Move::new(source, dest, MoveKind::Promotion(promoted))
    }

    pub fn promotion_capture(source: Square, dest: Square, promoted: PieceKind) -> Move {
        Move::new(source, dest, MoveKind::PromotionCapture(promoted))
    }

    pub fn kingside_castle(source: Square, dest: Square) -> Move {
        Move::new(source, dest, MoveKind::KingsideCastle)
    }

    pub fn queenside_castle(source: Square, dest: Square) -> Move {
        Move::new(source, dest, MoveKind::QueensideCastle)
    }

    pub fn kind(self) -> MoveKind {
        self.kind
    }

    /// If this move is a promotion, returns the piece kind that the pawn is being promoted to.
    pub fn promotion_piece(self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promotion(piece) | MoveKind::PromotionCapture(piece) => Some(piece),
            _ => None,
        }
    }

    /// Returns the source square of this move.
    pub fn source(self) -> Square {
        self.source
    }

    /// Returns the destination square of this move.
    pub fn destination(self) -> Square {
        self.destination
    }

    pub fn is_quiet(self) -> bool {
        self.kind == MoveKind::Quiet
    }

    pub fn is_capture(self) -> bool {
        matches!(
            self.kind,
            MoveKind::Capture | MoveKind::EnPassant | MoveKind::PromotionCapture(_)
        )
    }

    pub fn is_en_passant(self) -> bool {
        self.kind == MoveKind::EnPassant
    }

    pub fn is_double_pawn_push(self) -> bool {
        self.kind == MoveKind::DoublePawnPush
    }

    pub fn is_promotion(self) -> bool {
        self.promotion_piece().is_some()
    }

    pub fn is_kingside_castle(self) -> bool {
        self.kind == MoveKind::KingsideCastle
    }

    pub fn is_queenside_castle(self) -> bool {
        self.kind == MoveKind::QueensideCastle
    }

    pub fn is_castle(self) -> bool {
        self.is_kingside_castle() || self.is_queenside_castle()
    }

    /// Returns the square of the piece this move captures, if any. For en-passant this is the square beside the
    /// capturing pawn, behind the destination.
    pub fn capture_square(self) -> Option<Square> {
        match self.kind {
            MoveKind::EnPassant => Some(Square::of(self.source.rank(), self.destination.file())),
            MoveKind::Capture | MoveKind::PromotionCapture(_) => Some(self.destination),
            _ => None,
        }
    }

    /// For castles, returns the rook's source and destination squares.
    pub fn castle_rook_squares(self) -> Option<(Square, Square)> {
        let rank = self.source.rank();
        match self.kind {
            MoveKind::KingsideCastle => Some((Square::of(rank, FILE_H), Square::of(rank, FILE_F))),
            MoveKind::QueensideCastle => Some((Square::of(rank, FILE_A), Square::of(rank, FILE_D))),
            _ => None,
        }
    }

    /// Returns a coordinate string for this move, source and destination followed by an optional promotion
    /// letter (e.g. `e7e8q`).
    pub fn as_coordinates(self) -> String {
        match self.promotion_piece() {
            Some(piece) => format!("{}{}{}", self.source, self.destination, piece),
            None => format!("{}{}", self.source, self.destination),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_coordinates())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} ({:?})", self.as_coordinates(), self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::Move;
    use crate::core::*;

    #[test]
    fn quiet() {
        let quiet = Move::quiet(A4, A5);
        assert_eq!(A4, quiet.source());
        assert_eq!(A5, quiet.destination());
        assert!(quiet.is_quiet());
        assert_eq!(None, quiet.capture_square());
    }

    #[test]
    fn capture() {
        let capture = Move::capture(B4, C4);
        assert!(!capture.is_quiet());
        assert!(capture.is_capture());
        assert_eq!(Some(C4), capture.capture_square());
    }

    #[test]
    fn en_passant_captures_beside_source() {
        let ep = Move::en_passant(E5, D6);
        assert!(ep.is_en_passant());
        assert!(ep.is_capture());
        assert_eq!(Some(D5), ep.capture_square());
    }

    #[test]
    fn double_pawn_push() {
        let dpp = Move::double_pawn_push(D2, D4);
        assert!(dpp.is_double_pawn_push());
        assert!(!dpp.is_capture());
    }

    #[test]
    fn promotions() {
        let promo = Move::promotion(A7, A8, PieceKind::Knight);
        assert!(promo.is_promotion());
        assert!(!promo.is_capture());
        assert_eq!(Some(PieceKind::Knight), promo.promotion_piece());

        let promo = Move::promotion_capture(B7, C8, PieceKind::Queen);
        assert!(promo.is_promotion());
        assert!(promo.is_capture());
        assert_eq!(Some(PieceKind::Queen), promo.promotion_piece());
    }

    #[test]
    fn castle_rooks() {
        let mv = Move::kingside_castle(E1, G1);
        assert!(mv.is_castle());
        assert_eq!(Some((H1, F1)), mv.castle_rook_squares());
        let mv = Move::queenside_castle(E8, C8);
        assert!(mv.is_queenside_castle());
        assert_eq!(Some((A8, D8)), mv.castle_rook_squares());
    }

    #[test]
    fn coordinates() {
        assert_eq!("a1a2", Move::quiet(A1, A2).as_coordinates());
        assert_eq!(
            "a7a8q",
            Move::promotion(A7, A8, PieceKind::Queen).as_coordinates()
        );
    }
}
