// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack tables. Every table answers "which squares does a piece on this square threaten", given the occupancy
//! of the board for sliding pieces. Tables are built once, on first use.

use lazy_static::lazy_static;

use crate::core::*;

const KING_STEPS: [(i8, i8); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
];

const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

fn step(dir: Direction) -> (i8, i8) {
    match dir {
        Direction::North => (1, 0),
        Direction::NorthEast => (1, 1),
        Direction::East => (0, 1),
        Direction::SouthEast => (-1, 1),
        Direction::South => (-1, 0),
        Direction::SouthWest => (-1, -1),
        Direction::West => (0, -1),
        Direction::NorthWest => (1, -1),
    }
}

/// A table of fixed-offset targets, for the pieces that jump or step rather than slide.
struct JumpTable {
    table: [SquareSet; 64],
}

impl JumpTable {
    fn new(offsets: &[(i8, i8)]) -> JumpTable {
        let mut jt = JumpTable {
            table: [SquareSet::empty(); 64],
        };

        for sq in squares() {
            jt.table[sq.index()] = offsets
                .iter()
                .filter_map(|&(ranks, files)| sq.offset(ranks, files))
                .collect();
        }

        jt
    }

    fn attacks(&self, sq: Square) -> SquareSet {
        self.table[sq.index()]
    }
}

struct PawnTable {
    table: [[SquareSet; 2]; 64],
}

impl PawnTable {
    fn new() -> PawnTable {
        let mut pt = PawnTable {
            table: [[SquareSet::empty(); 2]; 64],
        };

        for sq in squares() {
            for color in colors() {
                let ahead = match color {
                    Color::White => 1,
                    Color::Black => -1,
                };

                pt.table[sq.index()][color as usize] = [-1, 1]
                    .iter()
                    .filter_map(|&files| sq.offset(ahead, files))
                    .collect();
            }
        }

        pt
    }

    fn attacks(&self, sq: Square, color: Color) -> SquareSet {
        self.table[sq.index()][color as usize]
    }
}

/// Unobstructed rays from every square in every direction. Row 64 is an empty sentinel, used when a ray has no
/// blocker.
struct RayTable {
    table: [[SquareSet; 8]; 65],
}

impl RayTable {
    fn new() -> RayTable {
        let mut rt = RayTable {
            table: [[SquareSet::empty(); 8]; 65],
        };

        for sq in squares() {
            for dir in ALL_DIRECTIONS {
                let (ranks, files) = step(dir);
                let mut entry = SquareSet::empty();
                let mut cursor = sq;
                while let Some(next) = cursor.offset(ranks, files) {
                    entry.insert(next);
                    cursor = next;
                }
                rt.table[sq.index()][dir as usize] = entry;
            }
        }

        rt
    }

    fn attacks(&self, sq: usize, dir: Direction) -> SquareSet {
        self.table[sq][dir as usize]
    }
}

lazy_static! {
    static ref KING_TABLE: JumpTable = JumpTable::new(&KING_STEPS);
    static ref KNIGHT_TABLE: JumpTable = JumpTable::new(&KNIGHT_JUMPS);
    static ref PAWN_TABLE: PawnTable = PawnTable::new();
    static ref RAY_TABLE: RayTable = RayTable::new();
}

// A ray stops at the first occupied square and includes it. The blocker is the nearest set bit along the ray, and
// everything beyond the blocker is the blocker's own ray in the same direction.
fn positive_ray_attacks(sq: Square, occupancy: SquareSet, dir: Direction) -> SquareSet {
    debug_assert!(dir.as_vector() > 0);
    let attacks = RAY_TABLE.attacks(sq.index(), dir);
    let blocker = attacks.and(occupancy).bits();
    let blocking_square = blocker.trailing_zeros() as usize;
    let blocking_ray = RAY_TABLE.attacks(blocking_square, dir);
    attacks.xor(blocking_ray)
}

fn negative_ray_attacks(sq: Square, occupancy: SquareSet, dir: Direction) -> SquareSet {
    debug_assert!(dir.as_vector() < 0);
    let attacks = RAY_TABLE.attacks(sq.index(), dir);
    let blocker = attacks.and(occupancy).bits();
    let blocking_square = (64 - blocker.leading_zeros()).checked_sub(1).unwrap_or(64) as usize;
    let blocking_ray = RAY_TABLE.attacks(blocking_square, dir);
    attacks.xor(blocking_ray)
}

/// Squares a pawn of the given color on `sq` threatens. These are its diagonal capture squares, never the squares
/// it advances to.
pub fn pawn_attacks(sq: Square, color: Color) -> SquareSet {
    PAWN_TABLE.attacks(sq, color)
}

pub fn bishop_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    positive_ray_attacks(sq, occupancy, Direction::NorthWest)
        | negative_ray_attacks(sq, occupancy, Direction::SouthEast)
        | positive_ray_attacks(sq, occupancy, Direction::NorthEast)
        | negative_ray_attacks(sq, occupancy, Direction::SouthWest)
}

pub fn knight_attacks(sq: Square) -> SquareSet {
    KNIGHT_TABLE.attacks(sq)
}

pub fn rook_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    positive_ray_attacks(sq, occupancy, Direction::North)
        | negative_ray_attacks(sq, occupancy, Direction::South)
        | positive_ray_attacks(sq, occupancy, Direction::East)
        | negative_ray_attacks(sq, occupancy, Direction::West)
}

pub fn queen_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}

pub fn king_attacks(sq: Square) -> SquareSet {
    KING_TABLE.attacks(sq)
}

pub fn attacks(kind: PieceKind, color: Color, sq: Square, occupancy: SquareSet) -> SquareSet {
    match kind {
        PieceKind::Pawn => pawn_attacks(sq, color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupancy),
        PieceKind::Rook => rook_attacks(sq, occupancy),
        PieceKind::Queen => queen_attacks(sq, occupancy),
        PieceKind::King => king_attacks(sq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_in_corner() {
        let expected: SquareSet = vec![B3, C2].into_iter().collect();
        assert_eq!(expected, knight_attacks(A1));
        assert_eq!(8, knight_attacks(D4).len());
    }

    #[test]
    fn king_on_edge() {
        assert_eq!(5, king_attacks(E1).len());
        assert_eq!(3, king_attacks(H8).len());
    }

    #[test]
    fn pawn_attacks_do_not_wrap() {
        assert_eq!(SquareSet::single(B3), pawn_attacks(A2, Color::White));
        assert_eq!(SquareSet::single(G6), pawn_attacks(H7, Color::Black));
        assert!(pawn_attacks(E8, Color::White).is_empty());
    }

    #[test]
    fn rook_ray_stops_at_blocker() {
        let occupancy: SquareSet = vec![D6, F4].into_iter().collect();
        let attacks = rook_attacks(D4, occupancy);
        assert!(attacks.contains(D6));
        assert!(!attacks.contains(D7));
        assert!(attacks.contains(F4));
        assert!(!attacks.contains(G4));
        assert!(attacks.contains(D1));
        assert!(attacks.contains(A4));
        assert_eq!(3 + 2 + 2 + 3, attacks.len());
    }

    #[test]
    fn bishop_ray_stops_at_blocker() {
        let occupancy = SquareSet::single(F6);
        let attacks = bishop_attacks(D4, occupancy);
        assert!(attacks.contains(F6));
        assert!(!attacks.contains(G7));
        assert!(attacks.contains(A1));
        assert!(attacks.contains(A7));
        assert!(attacks.contains(G1));
    }
}
