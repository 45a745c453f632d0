// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::{self, Write};

use crate::{
    board::{Board, Placement, STANDARD_SETUP},
    core::{self, *},
    error::{EngineError, Result},
    movegen::{self, MoveTable},
    notation,
    state::GameState,
};

/// A position, representing a chess game that has progressed up to this point: the board with every piece's move
/// history, whose turn it is, the ply counter and the notation of every move played so far.
///
/// Positions are never mutated once built. Applying a move produces a new position and leaves the receiver as it
/// was, so a failed move never disturbs anything.
#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    /// Starts at 1 and increases by one per applied move.
    ply: u32,
    /// Number of the move pair currently being played, as it appears in the notation.
    fullmove: u32,
    notation: String,
    /// Legal destinations for each color, indexed by `Color as usize`.
    legal: [MoveTable; 2],
    /// Attacked squares for each color, indexed by `Color as usize`.
    attacked: [MoveTable; 2],
    state: GameState,
}

impl Position {
    /// Builds a position from a 64-character setup layout with white to move.
    pub fn from_setup(layout: &str) -> Result<Position> {
        let board = Board::from_setup(layout)?;
        Ok(Position::with_board(board, Color::White))
    }

    /// The standard starting position.
    pub fn standard() -> Position {
        Position::from_setup(STANDARD_SETUP).unwrap_or_else(|err| {
            unreachable!("standard setup failed to parse: {}", err);
        })
    }

    /// The same position with `color` to move. The move tables and state are recomputed for the new mover.
    pub fn with_side_to_move(&self, color: Color) -> Position {
        let mut pos = self.clone();
        pos.side_to_move = color;
        pos.recompute();
        pos
    }

    fn with_board(board: Board, side_to_move: Color) -> Position {
        let mut pos = Position {
            board,
            side_to_move,
            ply: 1,
            fullmove: 1,
            notation: String::new(),
            legal: [MoveTable::empty(), MoveTable::empty()],
            attacked: [MoveTable::empty(), MoveTable::empty()],
            state: GameState::Normal,
        };

        pos.recompute();
        pos
    }

    /// Rebuilds both colors' attack tables and then both colors' legal tables, and reclassifies the state of the
    /// side to move. Attack tables come first since king moves and castling read the opponent's.
    fn recompute(&mut self) {
        let placement = self.board.placement();
        for color in core::colors() {
            self.attacked[color as usize] = movegen::attack_table(&placement, color);
        }

        for color in core::colors() {
            let their_attacks = self.attacked[color.toggle() as usize].union();
            self.legal[color as usize] =
                movegen::legal_table(&self.board, self.ply, color, their_attacks);
        }

        let has_legal_moves = !self.legal[self.side_to_move as usize].is_empty();
        self.state = GameState::classify(self.is_check(), has_legal_moves);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn placement(&self) -> Placement {
        self.board.placement()
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn fullmove(&self) -> u32 {
        self.fullmove
    }

    /// The notation of every move applied so far, e.g. `1. e4 e5 2. Nf3`.
    pub fn notation(&self) -> &str {
        &self.notation
    }

    /// The state of the side to move.
    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    pub fn king(&self, color: Color) -> Option<Square> {
        self.board.king(color)
    }

    /// The legal destinations of the piece on `square`. Empty if the square is empty or holds a piece of the side
    /// not to move.
    pub fn legal_moves(&self, square: Square) -> SquareSet {
        match self.piece_at(square) {
            Some(piece) if piece.color == self.side_to_move => {
                self.legal[piece.color as usize].get(square)
            }
            _ => SquareSet::empty(),
        }
    }

    /// The legal destinations of every piece of `color`.
    pub fn legal_table(&self, color: Color) -> &MoveTable {
        &self.legal[color as usize]
    }

    /// The squares attacked by each piece of `color`.
    pub fn attack_table(&self, color: Color) -> &MoveTable {
        &self.attacked[color as usize]
    }

    /// Every square attacked by `color`.
    pub fn attack_set(&self, color: Color) -> SquareSet {
        self.attacked[color as usize].union()
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        let us = self.side_to_move;
        match self.king(us) {
            Some(king) => self.attack_set(us.toggle()).contains(king),
            None => false,
        }
    }

    /// The legal moves of the piece on `square`, with their kinds.
    pub fn moves_from(&self, square: Square) -> Vec<Move> {
        let mut moves = Vec::new();
        if self.legal_moves(square).is_empty() {
            return moves;
        }

        let their_attacks = self.attack_set(self.side_to_move.toggle());
        movegen::generate_legal(&self.board, self.ply, square, their_attacks, &mut moves);
        moves
    }

    /// Every legal move of the side to move.
    pub fn all_moves(&self) -> Vec<Move> {
        self.legal[self.side_to_move as usize]
            .iter()
            .flat_map(|(square, _)| self.moves_from(square))
            .collect()
    }

    /// Whether moving from `from` to `to` is a legal pawn move onto the back rank, which needs a replacement
    /// piece before it can be applied.
    pub fn is_promotion(&self, from: Square, to: Square) -> bool {
        self.legal_moves(from).contains(to)
            && self.board.cell(from).kind() == Some(PieceKind::Pawn)
            && (SS_RANK_1 | SS_RANK_8).contains(to)
    }

    /// Finds the legal move from `from` to `to`. A promotion kind is required when the move promotes and ignored
    /// otherwise.
    pub fn find_move(&self, from: Square, to: Square, promotion: Option<PieceKind>) -> Result<Move> {
        if !self.legal_moves(from).contains(to) {
            return Err(EngineError::IllegalMove { from, to });
        }

        let mut candidates = self
            .moves_from(from)
            .into_iter()
            .filter(|mov| mov.destination() == to)
            .peekable();

        let first = match candidates.peek() {
            Some(&mov) => mov,
            None => return Err(EngineError::IllegalMove { from, to }),
        };

        if !first.is_promotion() {
            return Ok(first);
        }

        match promotion {
            Some(kind) => candidates
                .find(|mov| mov.promotion_piece() == Some(kind))
                .ok_or(EngineError::IllegalMove { from, to }),
            None => Err(EngineError::UnresolvedPromotion { from, to }),
        }
    }

    /// Applies the move from `from` to `to`, returning the resulting position and the state of the side that
    /// moves next. The receiver is left untouched, whether or not the move succeeds.
    pub fn apply_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<(Position, GameState)> {
        if self.state.is_terminal() {
            return Err(EngineError::GameOver(self.state));
        }

        let mov = self.find_move(from, to, promotion)?;
        let (next, _) = self.make_move(mov);
        let state = next.state;
        Ok((next, state))
    }

    /// Makes a move already known to be legal, returning the new position and the move's notation.
    pub(crate) fn make_move(&self, mov: Move) -> (Position, String) {
        let body = notation::describe(self, mov);
        let mover = self.side_to_move;

        let mut next = self.clone();
        next.board.carry_out(mov, self.ply);
        next.ply += 1;
        next.side_to_move = mover.toggle();
        if mover == Color::Black {
            next.fullmove += 1;
        }

        next.recompute();

        let san = format!("{}{}", body, next.state.notation_suffix());
        match mover {
            Color::White => {
                if !next.notation.is_empty() {
                    next.notation.push(' ');
                }

                // writing to a String can't fail
                let _ = write!(&mut next.notation, "{}. {}", self.fullmove, san);
            }
            Color::Black if next.notation.is_empty() => {
                let _ = write!(&mut next.notation, "{}... {}", self.fullmove, san);
            }
            Color::Black => {
                next.notation.push(' ');
                next.notation.push_str(&san);
            }
        }

        tracing::debug!(
            "applied {} ({} to {}) at ply {}, {} to move is {}",
            san,
            mov.source(),
            mov.destination(),
            self.ply,
            next.side_to_move,
            next.state
        );

        (next, san)
    }

    /// Renders the board back into a 64-character setup layout.
    pub fn as_setup(&self) -> String {
        self.board.as_setup()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in core::ranks().rev() {
            for file in core::files() {
                let sq = Square::of(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in core::files() {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in core::files() {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::standard()
    }
}
