// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The board: a grid of cells that remember which piece sits on them and how that piece has moved, and the
//! `Placement` snapshot used to test king safety on scratch copies.

use std::convert::TryFrom;

use thiserror::Error;

use crate::core::{self, *};

/// The standard starting layout, rank 8 first, white in uppercase.
pub const STANDARD_SETUP: &str = concat!(
    "rnbqkbnr", "pppppppp", "________", "________", "________", "________", "PPPPPPPP", "RNBQKBNR",
);

/// Possible errors that can arise when parsing a board setup.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum SetupError {
    #[error("setup has {0} squares, expected 64")]
    WrongLength(usize),
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("no {0} king")]
    MissingKing(Color),
    #[error("more than one {0} king")]
    ExtraKing(Color),
    #[error("pawn on its promotion rank at {0}")]
    PawnOnBackRank(Square),
}

/// One entry in a piece's move history: the ply it moved on and the square it left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    pub ply: u32,
    pub from: Square,
}

/// A single board cell. A cell's square never changes; the piece standing on it, and that piece's movement
/// history, travel with the piece when it moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    square: Square,
    piece: Option<Piece>,
    moved: bool,
    history: Vec<Step>,
}

impl Cell {
    fn vacant(square: Square) -> Cell {
        Cell {
            square,
            piece: None,
            moved: false,
            history: Vec::new(),
        }
    }

    pub fn square(&self) -> Square {
        self.square
    }

    pub fn piece(&self) -> Option<Piece> {
        self.piece
    }

    pub fn kind(&self) -> Option<PieceKind> {
        self.piece.map(|p| p.kind)
    }

    /// The owner of the piece on this cell; `None` for an empty cell.
    pub fn color(&self) -> Option<Color> {
        self.piece.map(|p| p.color)
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }

    /// Whether the piece on this cell has ever moved.
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Every move the piece on this cell has made, oldest first.
    pub fn history(&self) -> &[Step] {
        &self.history
    }

    fn take(&mut self) -> Cell {
        let square = self.square;
        std::mem::replace(self, Cell::vacant(square))
    }
}

/// The grid of 64 cells, indexed by square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    pub fn empty() -> Board {
        Board {
            cells: core::squares().map(Cell::vacant).collect(),
        }
    }

    /// Builds a board from a 64-character layout: rank 8 first, files a to h within a rank, uppercase letters for
    /// white, lowercase for black and `_` for an empty square. Whitespace is ignored, so a layout may be split
    /// over eight lines.
    ///
    /// Pieces that stand away from their starting squares are considered to have moved already.
    pub fn from_setup(layout: &str) -> Result<Board, SetupError> {
        let chars: Vec<char> = layout.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != 64 {
            return Err(SetupError::WrongLength(chars.len()));
        }

        let mut board = Board::empty();
        let layout_order = core::ranks()
            .rev()
            .flat_map(|rank| core::files().map(move |file| Square::of(rank, file)));
        for (square, c) in layout_order.zip(chars) {
            if c == '_' {
                continue;
            }

            let piece = Piece::try_from(c).map_err(|_| SetupError::UnknownPiece(c))?;
            let rank = square.rank();
            if piece.kind == PieceKind::Pawn && (rank == RANK_1 || rank == RANK_8) {
                return Err(SetupError::PawnOnBackRank(square));
            }

            board.place(square, piece, !on_starting_square(square, piece));
        }

        for color in core::colors() {
            match board.pieces_of_kind(color, PieceKind::King).len() {
                0 => return Err(SetupError::MissingKing(color)),
                1 => {}
                _ => return Err(SetupError::ExtraKing(color)),
            }
        }

        Ok(board)
    }

    /// Renders the board back into the layout accepted by `from_setup`.
    pub fn as_setup(&self) -> String {
        let mut buf = String::with_capacity(64);
        for rank in core::ranks().rev() {
            for file in core::files() {
                match self.piece_at(Square::of(rank, file)) {
                    Some(piece) => buf.push_str(&piece.to_string()),
                    None => buf.push('_'),
                }
            }
        }

        buf
    }

    pub fn cell(&self, square: Square) -> &Cell {
        &self.cells[square.index()]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cell(square).piece
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> SquareSet {
        self.cells
            .iter()
            .filter(|cell| cell.piece == Some(Piece::new(color, kind)))
            .map(|cell| cell.square)
            .collect()
    }

    pub fn king(&self, color: Color) -> Option<Square> {
        self.pieces_of_kind(color, PieceKind::King)
            .into_iter()
            .next()
    }

    /// A copy of the piece placement, without any of the cells' history.
    pub fn placement(&self) -> Placement {
        let mut placement = Placement::empty();
        for cell in &self.cells {
            placement.squares[cell.square.index()] = cell.piece;
        }

        placement
    }

    pub(crate) fn place(&mut self, square: Square, piece: Piece, moved: bool) {
        let cell = &mut self.cells[square.index()];
        cell.piece = Some(piece);
        cell.moved = moved;
        cell.history.clear();
    }

    /// Carries out a move that is already known to be legal. The moving piece, and the rook of a castle, take their
    /// history with them and record this ply as their latest move.
    pub(crate) fn carry_out(&mut self, mov: Move, ply: u32) {
        if let Some(captured) = mov.capture_square() {
            self.cells[captured.index()].take();
        }

        if let Some((rook_from, rook_to)) = mov.castle_rook_squares() {
            self.relocate(rook_from, rook_to, ply);
        }

        self.relocate(mov.source(), mov.destination(), ply);
        if let Some(kind) = mov.promotion_piece() {
            let cell = &mut self.cells[mov.destination().index()];
            if let Some(pawn) = cell.piece {
                cell.piece = Some(Piece::new(pawn.color, kind));
            }
        }
    }

    fn relocate(&mut self, from: Square, to: Square, ply: u32) {
        let mut moving = self.cells[from.index()].take();
        moving.square = to;
        moving.moved = true;
        moving.history.push(Step { ply, from });
        self.cells[to.index()] = moving;
    }
}

fn on_starting_square(square: Square, piece: Piece) -> bool {
    let rank = square.rank().relative_to(piece.color);
    match piece.kind {
        PieceKind::Pawn => rank == RANK_2,
        PieceKind::King => rank == RANK_1 && square.file() == FILE_E,
        PieceKind::Rook => {
            rank == RANK_1 && (square.file() == FILE_A || square.file() == FILE_H)
        }
        _ => rank == RANK_1,
    }
}

/// Piece placement only, by value. Scratch copies of a placement are how moves are simulated when testing whether
/// they leave a king attacked; a copy is cheap and never shared.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    squares: [Option<Piece>; 64],
}

impl Placement {
    pub fn empty() -> Placement {
        Placement { squares: [None; 64] }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    pub fn pieces(&self, color: Color) -> SquareSet {
        core::squares()
            .filter(|&sq| self.piece_at(sq).map(|p| p.color) == Some(color))
            .collect()
    }

    pub fn occupancy(&self) -> SquareSet {
        core::squares()
            .filter(|&sq| self.piece_at(sq).is_some())
            .collect()
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> SquareSet {
        core::squares()
            .filter(|&sq| self.piece_at(sq) == Some(Piece::new(color, kind)))
            .collect()
    }

    pub fn king(&self, color: Color) -> Option<Square> {
        self.pieces_of_kind(color, PieceKind::King)
            .into_iter()
            .next()
    }

    /// Moves pieces around as `mov` would, with no regard for legality.
    pub fn play(&mut self, mov: Move) {
        if let Some(captured) = mov.capture_square() {
            self.squares[captured.index()] = None;
        }

        if let Some((rook_from, rook_to)) = mov.castle_rook_squares() {
            self.squares[rook_to.index()] = self.squares[rook_from.index()].take();
        }

        let moving = self.squares[mov.source().index()].take();
        self.squares[mov.destination().index()] = match (moving, mov.promotion_piece()) {
            (Some(pawn), Some(kind)) => Some(Piece::new(pawn.color, kind)),
            (moving, _) => moving,
        };
    }

    /// Returns the squares holding pieces of color `by` that attack `target`.
    pub fn squares_attacking(&self, by: Color, target: Square) -> SquareSet {
        let mut attackers = SquareSet::empty();
        let occupancy = self.occupancy();

        // Pretend that there's a "super-piece" at the target square and see which sliders it sees. A rook ray can
        // only be answered by a rook or queen, a diagonal ray by a bishop or queen.
        let straight = self.pieces_of_kind(by, PieceKind::Rook)
            | self.pieces_of_kind(by, PieceKind::Queen);
        let diagonal = self.pieces_of_kind(by, PieceKind::Bishop)
            | self.pieces_of_kind(by, PieceKind::Queen);
        attackers |= rook_attacks(target, occupancy) & straight;
        attackers |= bishop_attacks(target, occupancy) & diagonal;

        // Knight and king moves are symmetric.
        attackers |= knight_attacks(target) & self.pieces_of_kind(by, PieceKind::Knight);
        attackers |= king_attacks(target) & self.pieces_of_kind(by, PieceKind::King);

        // A pawn of `by` attacks the target if a pawn of the other color on the target would attack it.
        attackers |= pawn_attacks(target, by.toggle()) & self.pieces_of_kind(by, PieceKind::Pawn);
        attackers
    }

    pub fn is_attacked(&self, target: Square, by: Color) -> bool {
        !self.squares_attacking(by, target).is_empty()
    }
}
