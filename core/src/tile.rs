use serde::{Deserialize, Serialize};

use crate::*;

/// What a player gets to see of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Hidden,
    Flagged,
    Open(u8),
    /// A mine disclosed after the game was lost.
    Mine,
    /// The mine that lost the game.
    Exploded,
    /// A flag that turned out to sit on a safe cell.
    MisplacedFlag,
}

impl Tile {
    pub fn of(
        cell: &Cell,
        coords: Coord2,
        status: GameStatus,
        triggered_mine: Option<Coord2>,
    ) -> Self {
        use Tile::*;

        let lost = matches!(status, GameStatus::Lost);
        match (cell.is_mine(), cell.is_flagged()) {
            (true, _) if triggered_mine == Some(coords) => Exploded,
            (false, true) if lost => MisplacedFlag,
            (_, true) => Flagged,
            (true, false) if cell.is_revealed() => Mine,
            (false, false) if cell.is_revealed() => Open(cell.adjacent_mine_count()),
            _ => Hidden,
        }
    }

    /// Whether the tile still looks covered.
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged | Self::MisplacedFlag)
    }
}
