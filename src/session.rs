// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A game in progress: one position and the record of how it was reached.

use crate::{
    core::{Move, PieceKind, Square, SquareSet},
    error::{EngineError, Result},
    notation,
    position::Position,
    record::{GameRecord, Tags},
    state::GameState,
};

/// Owns the current position of a game and its record. Every accepted move replaces the position and appends to
/// the record; a rejected move changes neither.
#[derive(Clone, Debug)]
pub struct Session {
    position: Position,
    record: GameRecord,
}

impl Session {
    pub fn new(setup: &str, tags: Tags) -> Result<Session> {
        Ok(Session {
            position: Position::from_setup(setup)?,
            record: GameRecord::new(tags),
        })
    }

    pub fn standard(tags: Tags) -> Session {
        Session {
            position: Position::standard(),
            record: GameRecord::new(tags),
        }
    }

    /// Rebuilds a session from a persisted record, replaying its movetext against `setup`. The moves of the
    /// returned record are re-encoded from the replayed positions, and the result tag is only kept if the replay
    /// actually ends the game.
    pub fn from_record(setup: &str, text: &str) -> Result<Session> {
        let parsed = GameRecord::parse(text)?;
        let tags = Tags {
            result: Tags::default().result,
            ..parsed.tags
        };

        let mut session = Session::new(setup, tags)?;
        session.play_notation(&parsed.moves.join(" "))?;
        Ok(session)
    }

    /// Plays every move in a stream of notation tokens, returning the state after the last one. The tokens are
    /// played against a copy of the game; if any of them fails, the session is left as it was.
    pub fn play_notation(&mut self, movetext: &str) -> Result<GameState> {
        let mut position = self.position.clone();
        let mut record = self.record.clone();
        for token in movetext.split_whitespace() {
            tracing::trace!("playing {:?} at ply {}", token, position.ply());
            if let Some(resolved) = notation::resolve(&position, token)? {
                let state = commit(&mut position, &mut record, resolved.mov);
                resolved.check_annotation(token, state);
            }
        }

        self.position = position;
        self.record = record;
        Ok(self.state())
    }

    pub fn legal_moves(&self, square: Square) -> SquareSet {
        self.position.legal_moves(square)
    }

    /// Whether the move from `source` to `destination` promotes, so that a replacement piece must be chosen
    /// before calling `play`.
    pub fn needs_promotion(&self, source: Square, destination: Square) -> bool {
        self.position.is_promotion(source, destination)
    }

    /// Plays a move, returning the state of the side that moves next.
    pub fn play(
        &mut self,
        source: Square,
        destination: Square,
        promotion: Option<PieceKind>,
    ) -> Result<GameState> {
        if self.state().is_terminal() {
            return Err(EngineError::GameOver(self.state()));
        }

        let mov = self.position.find_move(source, destination, promotion)?;
        Ok(commit(&mut self.position, &mut self.record, mov))
    }

    /// Like `play`, with the squares given by name (`"e2"`, `"e4"`).
    pub fn play_named(
        &mut self,
        source: &str,
        destination: &str,
        promotion: Option<PieceKind>,
    ) -> Result<GameState> {
        let source: Square = source.parse()?;
        let destination: Square = destination.parse()?;
        self.play(source, destination, promotion)
    }

    /// True until the first move has been played.
    pub fn is_new_game(&self) -> bool {
        self.record.moves.is_empty()
    }

    pub fn state(&self) -> GameState {
        self.position.state()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }
}

fn commit(position: &mut Position, record: &mut GameRecord, mov: Move) -> GameState {
    let mover = position.side_to_move();
    let (next, san) = position.make_move(mov);
    *position = next;
    record.push(san);

    let state = position.state();
    if state.is_terminal() {
        record.close(state.result_tag(mover));
        tracing::debug!("game over: {} ({})", state, record.tags.result);
    }

    state
}

impl Default for Session {
    fn default() -> Self {
        Session::standard(Tags::default())
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::{
        board::STANDARD_SETUP,
        core::*,
        error::EngineError,
        record::Tags,
        state::GameState,
    };

    #[test]
    fn new_game() {
        let session = Session::default();
        assert!(session.is_new_game());
        assert_eq!(GameState::Normal, session.state());
        assert_eq!(
            vec![A3, C3].into_iter().collect::<SquareSet>(),
            session.legal_moves(B1)
        );
    }

    #[test]
    fn play_appends_to_record() {
        let mut session = Session::default();
        assert_eq!(GameState::Normal, session.play(E2, E4, None).unwrap());
        assert_eq!(GameState::Normal, session.play(E7, E5, None).unwrap());
        assert!(!session.is_new_game());
        assert_eq!(vec!["e4", "e5"], session.record().moves);
        assert_eq!("1. e4 e5 *", session.record().movetext());
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut session = Session::default();
        session.play(E2, E4, None).unwrap();
        let err = session.play(E2, E4, None).unwrap_err();
        assert_eq!(EngineError::IllegalMove { from: E2, to: E4 }, err);
        assert_eq!(1, session.record().moves.len());
        assert_eq!(2, session.position().ply());
    }

    #[test]
    fn failed_movetext_changes_nothing() {
        let mut session = Session::default();
        assert!(matches!(
            session.play_notation("e4 e5 Zz9"),
            Err(EngineError::MalformedNotation { ref token, .. }) if token == "Zz9"
        ));
        assert!(session.is_new_game());
        assert_eq!(1, session.position().ply());
        assert_eq!(Color::White, session.position().side_to_move());

        session.play_notation("e4 e5").unwrap();
        assert!(session.play_notation("Nf3 Ke7 Qh6").is_err());
        assert_eq!(vec!["e4", "e5"], session.record().moves);
        assert_eq!(3, session.position().ply());
    }

    #[test]
    fn play_named_squares() {
        let mut session = Session::default();
        assert_eq!(
            GameState::Normal,
            session.play_named("g1", "f3", None).unwrap()
        );
        assert_eq!(vec!["Nf3"], session.record().moves);
        assert_eq!(
            EngineError::InvalidSquare(SquareParseError::InvalidName("e9".to_owned())),
            session.play_named("e7", "e9", None).unwrap_err()
        );
        assert_eq!(1, session.record().moves.len());
    }

    #[test]
    fn checkmate_closes_record() {
        let mut session = Session::standard(Tags {
            white: "Alice".to_owned(),
            black: "Bob".to_owned(),
            ..Tags::default()
        });
        let state = session.play_notation("f3 e5 g4").unwrap();
        assert_eq!(GameState::Normal, state);
        assert_eq!(GameState::Checkmate, session.play(D8, H4, None).unwrap());
        assert_eq!("0-1", session.record().tags.result);
        assert!(session.record().is_closed());
        assert_eq!(
            EngineError::GameOver(GameState::Checkmate),
            session.play(E1, F2, None).unwrap_err()
        );
    }

    #[test]
    fn stalemate_closes_record_as_draw() {
        let mut session = Session::new(
            concat!(
                "_______k", "_____K__", "________", "______Q_", "________", "________",
                "________", "________",
            ),
            Tags::default(),
        )
        .unwrap();
        assert_eq!(GameState::Stalemate, session.play(G5, G6, None).unwrap());
        assert_eq!("1/2-1/2", session.record().tags.result);
    }

    #[test]
    fn promotion_needs_a_piece() {
        let mut session = Session::new(
            concat!(
                "_______k", "P_______", "________", "________", "________", "________",
                "________", "____K___",
            ),
            Tags::default(),
        )
        .unwrap();
        assert!(session.needs_promotion(A7, A8));
        assert_eq!(
            EngineError::UnresolvedPromotion { from: A7, to: A8 },
            session.play(A7, A8, None).unwrap_err()
        );
        assert!(session.is_new_game());
        assert_eq!(
            GameState::Check,
            session.play(A7, A8, Some(PieceKind::Queen)).unwrap()
        );
        assert_eq!(vec!["a8=Q+"], session.record().moves);
    }

    #[test]
    fn replay_record() {
        let mut played = Session::default();
        played.play_notation("e4 e5 Bc4 Nc6 Qh5 Nf6 Qxf7#").unwrap();
        let text = played.record().to_string();

        let replayed = Session::from_record(STANDARD_SETUP, &text).unwrap();
        assert_eq!(GameState::Checkmate, replayed.state());
        assert_eq!(played.record(), replayed.record());
        assert_eq!(
            played.position().as_setup(),
            replayed.position().as_setup()
        );
    }

    #[test]
    fn replay_rebuilds_notation() {
        let session = Session::from_record(
            STANDARD_SETUP,
            "[White \"A\"]\n\n1.e4 d5 2.exd5 Qxd5 3.Nc3 Qa5 *\n",
        )
        .unwrap();
        assert_eq!(
            vec!["e4", "d5", "exd5", "Qxd5", "Nc3", "Qa5"],
            session.record().moves
        );
        assert_eq!("A", session.record().tags.white);
        assert_eq!(Color::White, session.position().side_to_move());
    }

    #[test]
    fn replay_drops_result_of_unfinished_game() {
        let mut session = Session::from_record(
            STANDARD_SETUP,
            "[Result \"1-0\"]\n\n1. e4 e5 1-0\n",
        )
        .unwrap();
        assert_eq!("*", session.record().tags.result);
        assert!(!session.record().is_closed());
        assert_eq!(GameState::Normal, session.play(G1, F3, None).unwrap());
        assert_eq!("1. e4 e5 2. Nf3 *", session.record().movetext());
    }

    #[test]
    fn replay_bad_record() {
        assert!(matches!(
            Session::from_record(STANDARD_SETUP, "1. e4 e5 2. Ke3"),
            Err(EngineError::NoMatchingPiece { .. })
        ));
        assert!(matches!(
            Session::from_record(STANDARD_SETUP, "[Event]\n1. e4"),
            Err(EngineError::InvalidRecord(_))
        ));
    }
}
