// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{fs, path::PathBuf};

use chess3d::{core::Square, Session, Tags, STANDARD_SETUP};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

/// Prints the legal moves of the side to move.
#[derive(Debug, StructOpt)]
struct Options {
    /// A file holding a 64-character board setup. The standard starting position if not given.
    #[structopt(long, parse(from_os_str))]
    setup: Option<PathBuf>,

    /// Moves to play before listing, in algebraic notation (e.g. "e4 e5 Nf3").
    #[structopt(long, default_value = "")]
    moves: String,

    /// Only list the moves of the piece on this square.
    #[structopt(name = "SQUARE")]
    square: Option<Square>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::WARN)
        .with_env_filter(EnvFilter::from_env("CHESS3D_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let args = Options::from_args();
    let setup = match &args.setup {
        Some(path) => fs::read_to_string(path)?,
        None => STANDARD_SETUP.to_owned(),
    };

    let mut session = Session::new(&setup, Tags::default())?;
    let state = session.play_notation(&args.moves)?;
    let position = session.position();
    println!("{}", position);
    println!("{} to move, {}", position.side_to_move(), state);

    let sources: Vec<Square> = match args.square {
        Some(square) => vec![square],
        None => position
            .legal_table(position.side_to_move())
            .iter()
            .map(|(square, _)| square)
            .collect(),
    };

    for source in sources {
        for mov in position.moves_from(source) {
            println!("{} {}", mov, chess3d::notation::encode(position, mov)?);
        }
    }

    Ok(())
}
