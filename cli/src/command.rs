use std::str::FromStr;

use sweeper_core::{Action, Coord, Coord2};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  r X Y   reveal the cell in row X, column Y
  f X Y   toggle a flag
  c X Y   reveal the unflagged neighbors of a satisfied number
  n       start a new game
  h       show this help
  q       quit";

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Play(Action),
    NewGame,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty input")]
    Empty,
    #[error("Unknown command `{0}`, try `h`")]
    Unknown(String),
    #[error("Expected a row and a column, e.g. `r 3 5`")]
    MissingCoords,
    #[error("Invalid coordinate `{0}`")]
    InvalidCoord(String),
    #[error("Unexpected input after the command: `{0}`")]
    Trailing(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|word| !word.is_empty());

        let Some(name) = words.next() else {
            return Err(ParseError::Empty);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Command::Play(Action::Reveal(parse_coords(&mut words)?)),
            "f" | "flag" => Command::Play(Action::ToggleFlag(parse_coords(&mut words)?)),
            "c" | "chord" => Command::Play(Action::ChordReveal(parse_coords(&mut words)?)),
            "n" | "new" | "reset" => Command::NewGame,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(ParseError::Unknown(name.to_owned())),
        };

        match words.next() {
            Some(extra) => Err(ParseError::Trailing(extra.to_owned())),
            None => Ok(command),
        }
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Coord2, ParseError> {
    let mut next = || -> Result<Coord, ParseError> {
        let word = words.next().ok_or(ParseError::MissingCoords)?;
        word.parse()
            .map_err(|_| ParseError::InvalidCoord(word.to_owned()))
    };
    Ok((next()?, next()?))
}
