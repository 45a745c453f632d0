// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Algebraic notation. Encoding turns a legal move into its disambiguated text (`Nbd2`, `exd6ep`, `a8=Q+`,
//! `O-O`); decoding replays a stream of such tokens against a position.

use std::fmt::Write;

use bitflags::bitflags;

use crate::{
    core::*,
    error::{EngineError, Result},
    position::Position,
    state::GameState,
};

bitflags! {
    /// Annotations read out of a notation token.
    pub struct Markers: u8 {
        const CAPTURE = 0b0000_0001;
        const CHECK = 0b0000_0010;
        const CHECKMATE = 0b0000_0100;
        const CASTLE = 0b0000_1000;
        const EN_PASSANT = 0b0001_0000;
        const PROMOTION = 0b0010_0000;
    }
}

/// A decoded token: the legal move it names and the markers it was written with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub mov: Move,
    pub markers: Markers,
}

impl Resolved {
    /// Logs a warning if the token's check or checkmate annotation disagrees with the state the move produced.
    pub fn check_annotation(&self, token: &str, state: GameState) {
        let annotated = if self.markers.contains(Markers::CHECKMATE) {
            Some(GameState::Checkmate)
        } else if self.markers.contains(Markers::CHECK) {
            Some(GameState::Check)
        } else {
            None
        };

        let actual = match state {
            GameState::Check | GameState::Checkmate => Some(state),
            _ => None,
        };

        if annotated != actual {
            tracing::warn!(
                "notation {:?} is annotated as {:?} but the move results in {}",
                token,
                annotated,
                state
            );
        }
    }
}

/// Encodes a legal move of the side to move, including its check or checkmate suffix.
pub fn encode(position: &Position, mov: Move) -> Result<String> {
    if position.state().is_terminal() {
        return Err(EngineError::GameOver(position.state()));
    }

    let mov = position.find_move(mov.source(), mov.destination(), mov.promotion_piece())?;
    let (_, san) = position.make_move(mov);
    Ok(san)
}

/// The notation of a legal move without its check suffix, which depends on the position the move produces.
pub(crate) fn describe(position: &Position, mov: Move) -> String {
    if mov.is_kingside_castle() {
        return "O-O".to_owned();
    }

    if mov.is_queenside_castle() {
        return "O-O-O".to_owned();
    }

    let piece = match position.piece_at(mov.source()) {
        Some(piece) => piece,
        None => return mov.as_coordinates(),
    };

    let mut text = String::new();
    match piece.kind.notation_letter() {
        Some(letter) => {
            text.push(letter);
            disambiguate(position, piece, mov, &mut text);
        }
        // pawn captures always name the file they left
        None if mov.is_capture() => {
            let _ = write!(&mut text, "{}", mov.source().file());
        }
        None => {}
    }

    if mov.is_capture() {
        text.push('x');
    }

    let _ = write!(&mut text, "{}", mov.destination());
    if let Some(letter) = mov.promotion_piece().and_then(PieceKind::notation_letter) {
        text.push('=');
        text.push(letter);
    }

    if mov.is_en_passant() {
        text.push_str("ep");
    }

    text
}

/// Appends the file and/or rank of the source square when other pieces of the same kind and color can legally
/// reach the destination too.
fn disambiguate(position: &Position, piece: Piece, mov: Move, text: &mut String) {
    let source = mov.source();
    let rivals: Vec<Square> = position
        .board()
        .pieces_of_kind(piece.color, piece.kind)
        .into_iter()
        .filter(|&sq| sq != source && position.legal_moves(sq).contains(mov.destination()))
        .collect();

    let shares_rank = rivals.iter().any(|sq| sq.rank() == source.rank());
    let shares_file = rivals.iter().any(|sq| sq.file() == source.file());
    let shares_neither = rivals
        .iter()
        .any(|sq| sq.rank() != source.rank() && sq.file() != source.file());

    if shares_rank || shares_neither {
        let _ = write!(text, "{}", source.file());
    }

    if shares_file {
        let _ = write!(text, "{}", source.rank());
    }
}

fn is_result(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "½-½" | "*")
}

/// Strips a move number prefix (`12.e4`, `12...e5`) from a token. Standalone move numbers such as `12.` and result
/// tokens carry no move and give `None`.
pub(crate) fn strip_numbering(token: &str) -> Option<&str> {
    if is_result(token) {
        return None;
    }

    let rest = token.trim_start_matches(|c: char| c.is_ascii_digit());
    let text = if rest.len() != token.len() && rest.starts_with('.') {
        rest.trim_start_matches('.')
    } else {
        token
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Resolves one notation token to the legal move it names. Move numbers and result tokens resolve to `None`.
pub fn resolve(position: &Position, token: &str) -> Result<Option<Resolved>> {
    let text = match strip_numbering(token) {
        Some(text) => text,
        None => return Ok(None),
    };

    if position.state().is_terminal() {
        return Err(EngineError::GameOver(position.state()));
    }

    let malformed = |reason: &'static str| EngineError::MalformedNotation {
        token: token.to_owned(),
        reason,
    };
    let no_match = || EngineError::NoMatchingPiece {
        token: token.to_owned(),
    };

    let mut markers = Markers::empty();
    let mut chars: Vec<char> = text
        .trim_end_matches(|c: char| c == '!' || c == '?')
        .chars()
        .collect();

    match chars.last() {
        Some('#') => {
            markers |= Markers::CHECKMATE;
            chars.pop();
        }
        Some('+') => {
            markers |= Markers::CHECK;
            chars.pop();
        }
        _ => {}
    }

    if chars.ends_with(&['e', 'p']) {
        markers |= Markers::EN_PASSANT;
        chars.truncate(chars.len() - 2);
    } else if chars.ends_with(&['e', '.', 'p', '.']) {
        markers |= Markers::EN_PASSANT;
        chars.truncate(chars.len() - 4);
    }

    let us = position.side_to_move();
    let body: String = chars.iter().collect();
    let castle_file = match body.as_str() {
        "O-O" | "0-0" => Some(FILE_G),
        "O-O-O" | "0-0-0" => Some(FILE_C),
        _ => None,
    };

    // Castles name the king's two-square move; the rook follows when it is carried out.
    if let Some(file) = castle_file {
        markers |= Markers::CASTLE;
        let from = Square::of(us.back_rank(), FILE_E);
        let to = Square::of(us.back_rank(), file);
        if position.board().cell(from).kind() != Some(PieceKind::King)
            || !position.legal_moves(from).contains(to)
        {
            return Err(no_match());
        }

        let mov = position.find_move(from, to, None)?;
        if !mov.is_castle() {
            return Err(no_match());
        }

        return Ok(Some(Resolved { mov, markers }));
    }

    let mut promotion = None;
    if let Some(eq) = chars.iter().position(|&c| c == '=') {
        let letter = match chars[eq + 1..] {
            [letter] => letter,
            _ => return Err(malformed("promotion must name exactly one piece")),
        };

        let kind = PieceKind::from_notation_letter(letter)
            .filter(|kind| kind.is_promotion_target())
            .ok_or_else(|| malformed("pawns cannot promote to that piece"))?;
        promotion = Some(kind);
        chars.truncate(eq);
    } else {
        // bare trailing letter, as in `e8Q`
        let bare = match chars[..] {
            [.., '1' | '8', letter] => {
                PieceKind::from_notation_letter(letter).filter(|kind| kind.is_promotion_target())
            }
            _ => None,
        };

        if bare.is_some() {
            promotion = bare;
            chars.pop();
        }
    }

    if promotion.is_some() {
        markers |= Markers::PROMOTION;
    }

    let kind = match chars.first().copied().and_then(PieceKind::from_notation_letter) {
        Some(kind) => {
            chars.remove(0);
            kind
        }
        None => PieceKind::Pawn,
    };

    if let Some(x) = chars.iter().position(|&c| c == 'x') {
        markers |= Markers::CAPTURE;
        chars.remove(x);
    }

    if chars.len() < 2 {
        return Err(malformed("missing destination square"));
    }

    let (hints, destination) = chars.split_at(chars.len() - 2);
    let destination: Square = destination
        .iter()
        .collect::<String>()
        .parse()
        .map_err(|_| malformed("destination is not a square"))?;

    let mut file_hint = None;
    let mut rank_hint = None;
    for &c in hints {
        let duplicate = if let Ok(file) = File::try_from(c) {
            file_hint.replace(file).is_some()
        } else if let Ok(rank) = Rank::try_from(c) {
            rank_hint.replace(rank).is_some()
        } else {
            return Err(malformed("unexpected character"));
        };

        if duplicate {
            return Err(malformed("source given more than once"));
        }
    }

    // A pawn written without a capture or a source file pushes along its own file.
    let capture = markers.contains(Markers::CAPTURE);
    let pawn_push = kind == PieceKind::Pawn && !capture && file_hint.is_none();
    let candidates: Vec<Square> = position
        .board()
        .pieces_of_kind(us, kind)
        .into_iter()
        .filter(|&sq| position.legal_moves(sq).contains(destination))
        .filter(|sq| !pawn_push || sq.file() == destination.file())
        .filter(|sq| file_hint.map_or(true, |file| sq.file() == file))
        .filter(|sq| rank_hint.map_or(true, |rank| sq.rank() == rank))
        .collect();

    let source = match candidates[..] {
        [] => return Err(no_match()),
        [source] => source,
        _ => {
            return Err(EngineError::AmbiguousNotation {
                token: token.to_owned(),
                candidates: candidates.len(),
            })
        }
    };

    let mov = position.find_move(source, destination, promotion)?;
    if promotion.is_some() && !mov.is_promotion() {
        return Err(malformed("only pawns reaching the last rank promote"));
    }

    match (capture, mov.is_capture()) {
        (true, false) => return Err(malformed("capture marker on a move that takes nothing")),
        (false, true) => return Err(malformed("capture written without x")),
        _ => {}
    }

    Ok(Some(Resolved { mov, markers }))
}

/// Replays a stream of notation tokens against `position`, returning the position reached and its state. The
/// input position is untouched; on failure nothing is returned but the error.
pub fn decode<I, S>(position: &Position, tokens: I) -> Result<(Position, GameState)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let _span = tracing::debug_span!("decode", ply = position.ply()).entered();
    let mut pos = position.clone();
    for token in tokens {
        let token = token.as_ref();
        tracing::trace!("decoding {:?} at ply {}", token, pos.ply());
        let resolved = match resolve(&pos, token)? {
            Some(resolved) => resolved,
            None => continue,
        };

        let (next, _) = pos.make_move(resolved.mov);
        resolved.check_annotation(token, next.state());
        pos = next;
    }

    let state = pos.state();
    Ok((pos, state))
}

/// Decodes whitespace-separated movetext, such as `1. e4 e5 2. Nf3`.
pub fn decode_str(position: &Position, movetext: &str) -> Result<(Position, GameState)> {
    decode(position, movetext.split_whitespace())
}
