// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The game-state classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::Color;

/// The state of the game for the side to move, as classified immediately after a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    Normal,
    Check,
    Checkmate,
    Stalemate,
}

impl GameState {
    /// Classifies the state of the side to move from whether its king is attacked and whether it has any legal
    /// move at all.
    pub fn classify(in_check: bool, has_legal_moves: bool) -> GameState {
        match (in_check, has_legal_moves) {
            (true, true) => GameState::Check,
            (true, false) => GameState::Checkmate,
            (false, false) => GameState::Stalemate,
            (false, true) => GameState::Normal,
        }
    }

    /// Checkmate and stalemate end the game; no further moves are accepted.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Checkmate | GameState::Stalemate)
    }

    /// The suffix appended to a move's notation when it produces this state.
    pub fn notation_suffix(self) -> &'static str {
        match self {
            GameState::Check => "+",
            GameState::Checkmate => "#",
            GameState::Normal | GameState::Stalemate => "",
        }
    }

    /// The result tag for a game that ended in this state, `mover` having made the last move. Games that have not
    /// ended are `*`.
    pub fn result_tag(self, mover: Color) -> &'static str {
        match (self, mover) {
            (GameState::Checkmate, Color::White) => "1-0",
            (GameState::Checkmate, Color::Black) => "0-1",
            (GameState::Stalemate, _) => "1/2-1/2",
            _ => "*",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameState::Normal => "normal",
            GameState::Check => "check",
            GameState::Checkmate => "checkmate",
            GameState::Stalemate => "stalemate",
        };

        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::core::Color;

    #[test]
    fn classification_table() {
        assert_eq!(GameState::Normal, GameState::classify(false, true));
        assert_eq!(GameState::Check, GameState::classify(true, true));
        assert_eq!(GameState::Checkmate, GameState::classify(true, false));
        assert_eq!(GameState::Stalemate, GameState::classify(false, false));
    }

    #[test]
    fn terminal_states() {
        assert!(GameState::Checkmate.is_terminal());
        assert!(GameState::Stalemate.is_terminal());
        assert!(!GameState::Check.is_terminal());
        assert!(!GameState::Normal.is_terminal());
    }

    #[test]
    fn result_tags() {
        assert_eq!("1-0", GameState::Checkmate.result_tag(Color::White));
        assert_eq!("0-1", GameState::Checkmate.result_tag(Color::Black));
        assert_eq!("1/2-1/2", GameState::Stalemate.result_tag(Color::White));
        assert_eq!("*", GameState::Check.result_tag(Color::Black));
    }
}
