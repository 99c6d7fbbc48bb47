use thiserror::Error;

use crate::Coord2;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates {0:?} are outside the board")]
    OutOfBounds(Coord2),
    #[error("Too many mines, at least one cell must be safe")]
    TooManyMines,
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Board rows must be non-empty and of equal length")]
    InvalidBoardShape,
    #[error("Adjacent mine count at {0:?} does not match the mines around it")]
    MismatchedMineCount(Coord2),
    #[error("Game counters or status disagree with the board")]
    InconsistentSnapshot,
}

pub type Result<T> = core::result::Result<T, GameError>;
