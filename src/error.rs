// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

use crate::{
    board::SetupError,
    core::{Square, SquareParseError},
    record::RecordError,
    state::GameState,
};

/// Errors produced by the rules engine. Every one of them is recoverable: a request that fails leaves the
/// position it was made against untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid square: {0}")]
    InvalidSquare(#[from] SquareParseError),
    #[error("invalid board setup: {0}")]
    InvalidSetup(#[from] SetupError),
    #[error("invalid game record: {0}")]
    InvalidRecord(#[from] RecordError),
    #[error("illegal move: {from} to {to}")]
    IllegalMove { from: Square, to: Square },
    #[error("move {from} to {to} promotes and needs a replacement piece")]
    UnresolvedPromotion { from: Square, to: Square },
    #[error("notation {token:?} matches {candidates} pieces")]
    AmbiguousNotation { token: String, candidates: usize },
    #[error("notation {token:?} is malformed: {reason}")]
    MalformedNotation { token: String, reason: &'static str },
    #[error("notation {token:?} matches no piece that can make it")]
    NoMatchingPiece { token: String },
    #[error("the game is over ({0})")]
    GameOver(GameState),
}

pub type Result<T> = std::result::Result<T, EngineError>;
