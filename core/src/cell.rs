use serde::{Deserialize, Serialize};

/// A single square of the board.
///
/// Whether the cell holds a mine and how many mines surround it are fixed when the cell is
/// created. Only the engine changes the `revealed` and `flagged` marks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    is_mine: bool,
    adjacent_mine_count: u8,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    /// A covered, unflagged safe cell with `adjacent_mine_count` mines around it.
    pub const fn safe(adjacent_mine_count: u8) -> Self {
        Self {
            is_mine: false,
            adjacent_mine_count,
            revealed: false,
            flagged: false,
        }
    }

    /// A covered, unflagged mine. `adjacent_mine_count` still counts the neighboring mines.
    pub const fn mine(adjacent_mine_count: u8) -> Self {
        Self {
            is_mine: true,
            adjacent_mine_count,
            revealed: false,
            flagged: false,
        }
    }

    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn adjacent_mine_count(&self) -> u8 {
        self.adjacent_mine_count
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Covered and unflagged, the only state a reveal acts on.
    pub const fn is_hidden(&self) -> bool {
        !self.revealed && !self.flagged
    }

    pub(crate) fn reveal(&mut self) {
        self.revealed = true;
    }

    pub(crate) fn toggle_flag(&mut self) -> bool {
        self.flagged = !self.flagged;
        self.flagged
    }
}
