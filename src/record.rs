// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Persisted game records: bracketed tag pairs followed by numbered movetext.
//!
//! ```text
//! [Event "Casual game"]
//! [White "Anderssen"]
//! [Black "Kieseritzky"]
//! [Result "*"]
//!
//! 1. e4 e5 2. f4 *
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notation;

const LINE_WIDTH: usize = 79;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("line {0}: tag is not of the form [Name \"Value\"]")]
    MalformedTag(usize),
    #[error("line {0}: unterminated tag value")]
    UnterminatedValue(usize),
}

/// The tag pairs of a game record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
    pub result: String,
}

impl Tags {
    fn pairs(&self) -> [(&'static str, &str); 7] {
        [
            ("Event", self.event.as_str()),
            ("Site", self.site.as_str()),
            ("Date", self.date.as_str()),
            ("Round", self.round.as_str()),
            ("White", self.white.as_str()),
            ("Black", self.black.as_str()),
            ("Result", self.result.as_str()),
        ]
    }

    fn set(&mut self, name: &str, value: String) {
        match name {
            "Event" => self.event = value,
            "Site" => self.site = value,
            "Date" => self.date = value,
            "Round" => self.round = value,
            "White" => self.white = value,
            "Black" => self.black = value,
            "Result" => self.result = value,
            _ => tracing::debug!("ignoring unknown tag {:?}", name),
        }
    }
}

impl Default for Tags {
    fn default() -> Self {
        Tags {
            event: "?".to_owned(),
            site: "?".to_owned(),
            date: "????.??.??".to_owned(),
            round: "?".to_owned(),
            white: "?".to_owned(),
            black: "?".to_owned(),
            result: "*".to_owned(),
        }
    }
}

/// A game record: tags plus the notation of every move played, white's first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub tags: Tags,
    pub moves: Vec<String>,
}

impl GameRecord {
    pub fn new(tags: Tags) -> GameRecord {
        GameRecord {
            tags,
            moves: Vec::new(),
        }
    }

    pub fn push(&mut self, san: String) {
        self.moves.push(san);
    }

    /// Terminates the record with a result tag.
    pub fn close(&mut self, result: &str) {
        self.tags.result = result.to_owned();
    }

    pub fn is_closed(&self) -> bool {
        self.tags.result != "*"
    }

    /// The numbered movetext followed by the result, e.g. `1. e4 e5 2. Nf3 *`.
    pub fn movetext(&self) -> String {
        let mut words = Vec::with_capacity(self.moves.len() * 3 / 2 + 1);
        for (i, san) in self.moves.iter().enumerate() {
            if i % 2 == 0 {
                words.push(format!("{}.", i / 2 + 1));
            }

            words.push(san.clone());
        }

        words.push(self.tags.result.clone());
        words.join(" ")
    }

    /// Parses a record rendered by `Display`. Tag lines come first; everything after them is movetext. Move
    /// numbers and the trailing result are dropped from the parsed moves.
    pub fn parse(text: &str) -> Result<GameRecord, RecordError> {
        let mut record = GameRecord::default();
        let mut lines = text.lines().enumerate().peekable();
        while let Some((index, line)) = lines.peek().copied() {
            let line = line.trim();
            if line.is_empty() {
                lines.next();
                continue;
            }

            if !line.starts_with('[') {
                break;
            }

            let (name, value) = parse_tag(index + 1, line)?;
            record.tags.set(name, value);
            lines.next();
        }

        record.moves = lines
            .flat_map(|(_, line)| line.split_whitespace())
            .filter_map(notation::strip_numbering)
            .map(str::to_owned)
            .collect();
        Ok(record)
    }
}

fn parse_tag(line_number: usize, line: &str) -> Result<(&str, String), RecordError> {
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(RecordError::MalformedTag(line_number))?;

    let (name, quoted) = inner
        .trim()
        .split_once(char::is_whitespace)
        .ok_or(RecordError::MalformedTag(line_number))?;

    let quoted = quoted
        .trim()
        .strip_prefix('"')
        .ok_or(RecordError::MalformedTag(line_number))?;

    let mut value = String::new();
    let mut chars = quoted.chars();
    loop {
        match chars.next() {
            Some('\\') => match chars.next() {
                Some(c) => value.push(c),
                None => return Err(RecordError::UnterminatedValue(line_number)),
            },
            Some('"') => break,
            Some(c) => value.push(c),
            None => return Err(RecordError::UnterminatedValue(line_number)),
        }
    }

    if !chars.as_str().trim().is_empty() {
        return Err(RecordError::MalformedTag(line_number));
    }

    Ok((name, value))
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.tags.pairs() {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            writeln!(f, "[{} \"{}\"]", name, escaped)?;
        }

        writeln!(f)?;
        let mut width = 0;
        for word in self.movetext().split(' ') {
            if width > 0 && width + 1 + word.len() > LINE_WIDTH {
                writeln!(f)?;
                width = 0;
            } else if width > 0 {
                write!(f, " ")?;
                width += 1;
            }

            write!(f, "{}", word)?;
            width += word.len();
        }

        writeln!(f)
    }
}
