// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `chess3d`, a chess rules engine.
//!
//! Given a board setup, `chess3d` generates the legal moves of every piece (castling, en passant and promotion
//! included), applies moves to produce new positions, classifies each position as normal, check, checkmate or
//! stalemate, and reads and writes algebraic notation so that games can be recorded and replayed.

pub mod board;
pub mod core;
pub mod error;
pub mod movegen;
pub mod notation;
pub mod position;
pub mod record;
pub mod session;
pub mod state;

pub use crate::board::STANDARD_SETUP;
pub use crate::error::{EngineError, Result};
pub use crate::position::Position;
pub use crate::record::{GameRecord, Tags};
pub use crate::session::Session;
pub use crate::state::GameState;
