// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{fs, path::PathBuf};

use chess3d::{core::Color, GameRecord, GameState, Session, STANDARD_SETUP};
use serde::Serialize;
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

/// Replays a recorded game and prints where it ended up.
#[derive(Debug, StructOpt)]
struct Options {
    /// The game record to replay: tag pairs followed by movetext.
    #[structopt(name = "RECORD", parse(from_os_str))]
    record: PathBuf,

    /// A file holding the 64-character board setup the game started from.
    #[structopt(long, parse(from_os_str))]
    setup: Option<PathBuf>,

    /// Print a JSON summary instead of the board.
    #[structopt(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    record: &'a GameRecord,
    state: GameState,
    side_to_move: Color,
    ply: u32,
    setup: String,
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

    let text = fs::read_to_string(&args.record)?;
    let session = Session::from_record(&setup, &text)?;
    let position = session.position();
    if args.json {
        let summary = Summary {
            record: session.record(),
            state: session.state(),
            side_to_move: position.side_to_move(),
            ply: position.ply(),
            setup: position.as_setup(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", position);
    println!("{:<16} {}", "To move:", position.side_to_move());
    println!("{:<16} {}", "State:", session.state());
    println!("{:<16} {}", "Ply:", position.ply());
    println!();
    print!("{}", session.record());
    Ok(())
}
