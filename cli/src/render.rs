use std::fmt::{self, Display, Formatter};

use sweeper_core::{GameEngine, GameStatus, Tile};
use web_time::Duration;

/// Text rendering of the player-visible board, with row and column indices.
pub struct BoardView<'a> {
    engine: &'a GameEngine,
}

impl<'a> BoardView<'a> {
    pub fn new(engine: &'a GameEngine) -> Self {
        Self { engine }
    }
}

fn glyph(tile: Tile) -> char {
    match tile {
        Tile::Hidden => '#',
        Tile::Flagged => 'F',
        Tile::Open(0) => '.',
        Tile::Open(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
        Tile::Mine => '*',
        Tile::Exploded => 'X',
        Tile::MisplacedFlag => '!',
    }
}

impl Display for BoardView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (_, cols) = self.engine.size();
        let status = self.engine.status();
        let triggered_mine = self.engine.triggered_mine();

        write!(f, "   ")?;
        for y in 0..cols {
            write!(f, "{y:>3}")?;
        }
        writeln!(f)?;

        for (x, row) in self.engine.board().rows().enumerate() {
            write!(f, "{x:>3}")?;
            for (y, cell) in row.enumerate() {
                let tile = Tile::of(cell, (x as u8, y as u8), status, triggered_mine);
                write!(f, "{:>3}", glyph(tile))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The line above the board: flags left, time, and how the game stands.
pub fn status_line(engine: &GameEngine, elapsed: Duration) -> String {
    let status = match engine.status() {
        GameStatus::InProgress => "in progress",
        GameStatus::Won => "you win",
        GameStatus::Lost => "you lost",
    };
    format!(
        "flags: {}  time: {}s  {}",
        engine.remaining_flag_capacity(),
        elapsed.as_secs(),
        status
    )
}
