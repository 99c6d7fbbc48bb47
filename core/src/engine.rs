use alloc::collections::BTreeSet;
use alloc::vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A player move, for front ends that dispatch moves as values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Reveal(Coord2),
    ToggleFlag(Coord2),
    ChordReveal(Coord2),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Reveal(RevealOutcome),
    Flag(FlagOutcome),
}

impl ActionOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Reveal(outcome) => outcome.has_update(),
            Self::Flag(outcome) => outcome.has_update(),
        }
    }
}

/// State of a single game: the board plus the counters derived from it.
///
/// While the game is not lost, `remaining_safe_cells` always equals the number of covered safe
/// cells, and `remaining_flag_capacity` always equals the mine count minus the number of flags,
/// going negative when the player places more flags than there are mines. A lost game freezes
/// both counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GameSnapshot")]
pub struct GameEngine {
    board: Board,
    status: GameStatus,
    remaining_safe_cells: CellCount,
    remaining_flag_capacity: isize,
    triggered_mine: Option<Coord2>,
}

#[derive(Deserialize)]
struct GameSnapshot {
    board: Board,
    status: GameStatus,
    remaining_safe_cells: CellCount,
    remaining_flag_capacity: isize,
    triggered_mine: Option<Coord2>,
}

impl TryFrom<GameSnapshot> for GameEngine {
    type Error = GameError;

    /// Accepts only states reachable through play.
    fn try_from(snapshot: GameSnapshot) -> Result<Self> {
        let GameSnapshot {
            board,
            status,
            remaining_safe_cells,
            remaining_flag_capacity,
            triggered_mine,
        } = snapshot;

        let tally = board.tally();
        let flags_match =
            board.mine_count() as isize - tally.flagged_cells as isize == remaining_flag_capacity;
        let counters_match = match status {
            GameStatus::InProgress => {
                remaining_safe_cells > 0 && remaining_safe_cells == tally.covered_safe_cells
            }
            GameStatus::Won => remaining_safe_cells == 0 && tally.covered_safe_cells == 0,
            // frozen at the moment of the loss
            GameStatus::Lost => {
                remaining_safe_cells > 0 && remaining_safe_cells <= board.safe_cell_count()
            }
        };
        let cells_match = match status {
            GameStatus::Lost => {
                triggered_mine.and_then(|coords| board.get(coords)).is_some_and(Cell::is_mine)
                    && board.iter().all(|(_, cell)| cell.is_revealed())
            }
            // only safe, unflagged cells are ever opened during play
            _ => {
                triggered_mine.is_none()
                    && board.iter().all(|(_, cell)| {
                        !cell.is_revealed() || !(cell.is_mine() || cell.is_flagged())
                    })
            }
        };

        if !(flags_match && counters_match && cells_match) {
            log::debug!("Rejected {status:?} snapshot with {remaining_safe_cells} safe cells left");
            return Err(GameError::InconsistentSnapshot);
        }

        Ok(Self {
            board,
            status,
            remaining_safe_cells,
            remaining_flag_capacity,
            triggered_mine,
        })
    }
}

impl GameEngine {
    pub fn new(board: Board) -> Self {
        let tally = board.tally();
        let remaining_flag_capacity = board.mine_count() as isize - tally.flagged_cells as isize;
        // nothing left to uncover
        let status = if tally.covered_safe_cells == 0 {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        };

        log::debug!(
            "New {:?} game with {} mines, {} safe cells to uncover",
            board.size(),
            board.mine_count(),
            tally.covered_safe_cells
        );

        Self {
            board,
            status,
            remaining_safe_cells: tally.covered_safe_cells,
            remaining_flag_capacity,
            triggered_mine: None,
        }
    }

    /// Discards the current game and starts over on `board`.
    pub fn reset(&mut self, board: Board) {
        *self = Self::new(board);
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn remaining_safe_cells(&self) -> CellCount {
        self.remaining_safe_cells
    }

    pub fn remaining_flag_capacity(&self) -> isize {
        self.remaining_flag_capacity
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.board.validate_coords(coords)?;
        Ok(&self.board[coords])
    }

    pub fn tile_at(&self, coords: Coord2) -> Result<Tile> {
        let cell = self.cell_at(coords)?;
        Ok(Tile::of(cell, coords, self.status, self.triggered_mine))
    }

    pub fn apply(&mut self, action: Action) -> Result<ActionOutcome> {
        Ok(match action {
            Action::Reveal(coords) => ActionOutcome::Reveal(self.reveal(coords)?),
            Action::ToggleFlag(coords) => ActionOutcome::Flag(self.toggle_flag(coords)?),
            Action::ChordReveal(coords) => ActionOutcome::Reveal(self.chord_reveal(coords)?),
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.is_finished() || self.board[coords].is_revealed() {
            log::trace!("Flag at {coords:?} ignored");
            return Ok(FlagOutcome::NoChange);
        }

        let outcome = if self.board[coords].toggle_flag() {
            self.remaining_flag_capacity -= 1;
            FlagOutcome::Placed
        } else {
            self.remaining_flag_capacity += 1;
            FlagOutcome::Cleared
        };
        log::trace!(
            "Flag at {coords:?}: {outcome:?}, capacity now {}",
            self.remaining_flag_capacity
        );

        self.debug_check_counters();
        Ok(outcome)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.is_finished() || !self.board[coords].is_hidden() {
            log::trace!("Reveal at {coords:?} ignored");
            return Ok(RevealOutcome::NoChange);
        }

        Ok(self.reveal_hidden_cell(coords))
    }

    /// Reveals every unflagged neighbor of a numbered cell once the player has placed as many flags
    /// around it as it has adjacent mines. A misplaced flag means a mine gets revealed and the game
    /// is lost.
    ///
    /// On a covered cell this is a plain [`GameEngine::reveal`].
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }

        let cell = self.board[coords];
        if cell.is_hidden() {
            return Ok(self.reveal_hidden_cell(coords));
        }
        if !cell.is_revealed()
            || cell.adjacent_mine_count() != self.count_flagged_neighbors(coords)
        {
            return Ok(RevealOutcome::NoChange);
        }

        let mut outcome = RevealOutcome::NoChange;
        for neighbor in self.board.iter_neighbors(coords) {
            if self.is_finished() {
                break;
            }
            if self.board[neighbor].is_hidden() {
                outcome = outcome | self.reveal_hidden_cell(neighbor);
            }
        }
        Ok(outcome)
    }

    fn reveal_hidden_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.board[coords];

        if cell.is_mine() {
            self.board.reveal_all();
            self.triggered_mine = Some(coords);
            self.status = GameStatus::Lost;
            log::debug!("Mine hit at {coords:?}, game lost");
            return RevealOutcome::HitMine;
        }

        let uncovered = if cell.adjacent_mine_count() == 0 {
            self.flood_fill(coords)
        } else {
            self.uncover(coords);
            1
        };
        log::trace!(
            "Reveal at {coords:?} uncovered {uncovered} cells, {} left",
            self.remaining_safe_cells
        );

        self.debug_check_counters();
        match self.status {
            GameStatus::Won => RevealOutcome::Won,
            _ => RevealOutcome::Revealed,
        }
    }

    /// Uncovers the zero region around `start` and its numbered border, returning how many cells
    /// were uncovered.
    ///
    /// A cell is marked as queued before it is pushed, and only covered unflagged cells are ever
    /// pushed, so each cell is uncovered at most once. Expansion only continues from cells without
    /// adjacent mines, which keeps mines out of the fill.
    fn flood_fill(&mut self, start: Coord2) -> CellCount {
        let mut queued = BTreeSet::from([start]);
        let mut worklist = vec![start];
        let mut uncovered = 0;

        while let Some(coords) = worklist.pop() {
            debug_assert!(!self.board[coords].is_mine());
            self.uncover(coords);
            uncovered += 1;

            if self.status == GameStatus::Won {
                break;
            }
            if self.board[coords].adjacent_mine_count() != 0 {
                continue;
            }

            for neighbor in self.board.iter_neighbors(coords) {
                if self.board[neighbor].is_hidden() && queued.insert(neighbor) {
                    worklist.push(neighbor);
                }
            }
        }

        log::debug!("Flood fill from {start:?} uncovered {uncovered} cells");
        uncovered
    }

    fn uncover(&mut self, coords: Coord2) {
        self.board[coords].reveal();
        self.remaining_safe_cells -= 1;

        if self.remaining_safe_cells == 0 {
            self.status = GameStatus::Won;
            log::debug!("All safe cells uncovered, game won");
        }
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.board
            .iter_neighbors(coords)
            .filter(|&pos| self.board[pos].is_flagged())
            .count() as u8
    }

    fn debug_check_counters(&self) {
        #[cfg(debug_assertions)]
        {
            let tally = self.board.tally();
            debug_assert_eq!(tally.covered_safe_cells, self.remaining_safe_cells);
            debug_assert_eq!(
                self.board.mine_count() as isize - tally.flagged_cells as isize,
                self.remaining_flag_capacity
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn engine(size: Coord2, mines: &[Coord2]) -> GameEngine {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        GameEngine::new(Board::from_layout(&layout))
    }

    fn revealed_cells(engine: &GameEngine) -> Vec<Coord2> {
        engine
            .board()
            .iter()
            .filter(|(_, cell)| cell.is_revealed())
            .map(|(coords, _)| coords)
            .collect()
    }

    #[test]
    fn fresh_engine_counters() {
        let engine = engine((3, 4), &[(0, 0), (2, 3)]);

        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.remaining_safe_cells(), 10);
        assert_eq!(engine.remaining_flag_capacity(), 2);
        assert_eq!(engine.total_mines(), 2);
        assert_eq!(engine.size(), (3, 4));
    }

    #[test]
    fn numbered_cell_reveals_alone() {
        let mut engine = engine((3, 3), &[(1, 1)]);

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(revealed_cells(&engine), [(0, 0)]);
        assert_eq!(engine.remaining_safe_cells(), 7);
        assert_eq!(engine.status(), GameStatus::InProgress);
    }

    #[test]
    fn zero_cell_floods_to_a_win() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        assert_eq!(engine.reveal((2, 2)).unwrap(), RevealOutcome::Won);
        assert_eq!(engine.remaining_safe_cells(), 0);
        assert_eq!(engine.status(), GameStatus::Won);
        assert!(!engine.cell_at((0, 0)).unwrap().is_revealed());
        assert_eq!(revealed_cells(&engine).len(), 8);
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // column 2 is a wall of mines
        let mut engine = engine((3, 5), &[(0, 2), (1, 2), (2, 2)]);

        assert_eq!(engine.reveal((1, 0)).unwrap(), RevealOutcome::Revealed);

        let revealed = revealed_cells(&engine);
        assert_eq!(revealed, [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
        assert_eq!(engine.cell_at((1, 1)).unwrap().adjacent_mine_count(), 3);
        assert_eq!(engine.remaining_safe_cells(), 6);
        assert_eq!(engine.status(), GameStatus::InProgress);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut engine = engine((1, 5), &[(0, 4)]);

        engine.toggle_flag((0, 1)).unwrap();
        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);

        assert_eq!(revealed_cells(&engine), [(0, 0)]);
        assert!(engine.cell_at((0, 1)).unwrap().is_flagged());
        assert_eq!(engine.remaining_safe_cells(), 3);
    }

    #[test]
    fn mine_discloses_the_whole_board() {
        let mut engine = engine((2, 3), &[(0, 1), (1, 2)]);
        engine.toggle_flag((1, 2)).unwrap();

        assert_eq!(engine.reveal((0, 1)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(engine.status(), GameStatus::Lost);
        assert_eq!(engine.triggered_mine(), Some((0, 1)));
        assert!(engine.board().iter().all(|(_, cell)| cell.is_revealed()));
        // flags and counters stay as they were
        assert!(engine.cell_at((1, 2)).unwrap().is_flagged());
        assert_eq!(engine.remaining_flag_capacity(), 1);
        assert_eq!(engine.remaining_safe_cells(), 4);
        assert_eq!(engine.tile_at((0, 1)).unwrap(), Tile::Exploded);
        assert_eq!(engine.tile_at((1, 2)).unwrap(), Tile::Flagged);
        assert_eq!(engine.tile_at((0, 0)).unwrap(), Tile::Open(1));
    }

    #[test]
    fn finished_games_ignore_moves() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.reveal((2, 2)).unwrap();
        let won = engine.clone();

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(engine.chord_reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine, won);

        let mut engine = self::engine((2, 2), &[(0, 0)]);
        engine.reveal((0, 0)).unwrap();
        let lost = engine.clone();
        assert_eq!(engine.toggle_flag((1, 1)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(engine, lost);
    }

    #[test]
    fn flags_block_reveal_until_cleared() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        assert_eq!(engine.toggle_flag((1, 1)).unwrap(), FlagOutcome::Placed);
        assert_eq!(engine.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert!(!engine.cell_at((1, 1)).unwrap().is_revealed());

        assert_eq!(engine.toggle_flag((1, 1)).unwrap(), FlagOutcome::Cleared);
        assert_eq!(engine.reveal((1, 1)).unwrap(), RevealOutcome::Revealed);
    }

    #[test]
    fn revealed_cells_cannot_be_flagged() {
        let mut engine = engine((2, 2), &[(0, 0)]);
        engine.reveal((1, 1)).unwrap();

        assert_eq!(engine.toggle_flag((1, 1)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(engine.remaining_flag_capacity(), 1);
        assert_eq!(engine.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn over_flagging_goes_negative() {
        let mut engine = engine((2, 2), &[(0, 0)]);
        for coords in [(0, 0), (0, 1), (1, 0)] {
            engine.toggle_flag(coords).unwrap();
        }

        assert_eq!(engine.remaining_flag_capacity(), -2);
        engine.toggle_flag((1, 0)).unwrap();
        assert_eq!(engine.remaining_flag_capacity(), -1);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut engine = engine((2, 3), &[(0, 0)]);

        assert_eq!(engine.reveal((2, 0)), Err(GameError::OutOfBounds((2, 0))));
        assert_eq!(engine.toggle_flag((0, 3)), Err(GameError::OutOfBounds((0, 3))));
        assert_eq!(engine.chord_reveal((9, 9)), Err(GameError::OutOfBounds((9, 9))));
        assert_eq!(engine.cell_at((2, 3)).err(), Some(GameError::OutOfBounds((2, 3))));

        // still rejected once the game is over
        engine.reveal((0, 0)).unwrap();
        assert_eq!(engine.reveal((5, 5)), Err(GameError::OutOfBounds((5, 5))));
    }

    #[test]
    fn chord_reveal_uses_flagged_neighbors() {
        let mut engine = engine((3, 3), &[(1, 0), (1, 2)]);

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((1, 0)).unwrap();
        assert_eq!(engine.chord_reveal((1, 1)).unwrap(), RevealOutcome::NoChange);

        engine.toggle_flag((1, 2)).unwrap();
        assert_eq!(engine.chord_reveal((1, 1)).unwrap(), RevealOutcome::Won);
        assert_eq!(engine.cell_at((0, 1)).unwrap().adjacent_mine_count(), 2);
    }

    #[test]
    fn chord_reveal_with_wrong_flag_loses() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((2, 2)).unwrap();

        assert_eq!(engine.chord_reveal((1, 1)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(engine.status(), GameStatus::Lost);
        assert_eq!(engine.tile_at((2, 2)).unwrap(), Tile::MisplacedFlag);
    }

    #[test]
    fn chord_reveal_on_covered_cell_reveals_it() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        assert_eq!(engine.chord_reveal((0, 1)).unwrap(), RevealOutcome::Revealed);
        engine.toggle_flag((1, 0)).unwrap();
        assert_eq!(engine.chord_reveal((1, 0)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn apply_dispatches_actions() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        let outcome = engine.apply(Action::ToggleFlag((0, 0))).unwrap();
        assert_eq!(outcome, ActionOutcome::Flag(FlagOutcome::Placed));
        assert!(outcome.has_update());

        let outcome = engine.apply(Action::Reveal((0, 0))).unwrap();
        assert_eq!(outcome, ActionOutcome::Reveal(RevealOutcome::NoChange));
        assert!(!outcome.has_update());

        assert_eq!(
            engine.apply(Action::Reveal((4, 0))),
            Err(GameError::OutOfBounds((4, 0)))
        );
    }

    #[test]
    fn reset_discards_the_previous_game() {
        let mut engine = engine((2, 2), &[(0, 0)]);
        engine.toggle_flag((1, 1)).unwrap();
        engine.reveal((0, 0)).unwrap();

        let layout = MineLayout::from_mine_coords((3, 3), &[(1, 1), (2, 2)]).unwrap();
        engine.reset(Board::from_layout(&layout));

        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.triggered_mine(), None);
        assert_eq!(engine.remaining_safe_cells(), 7);
        assert_eq!(engine.remaining_flag_capacity(), 2);
        assert!(revealed_cells(&engine).is_empty());
    }

    #[test]
    fn board_without_safe_cells_starts_won() {
        let engine = engine((1, 1), &[(0, 0)]);
        assert_eq!(engine.status(), GameStatus::Won);
        assert_eq!(engine.remaining_safe_cells(), 0);
    }

    #[test]
    fn engine_survives_a_json_round_trip() {
        let mut engine = engine((3, 3), &[(1, 1)]);
        engine.reveal((0, 0)).unwrap();
        engine.toggle_flag((1, 1)).unwrap();

        let json = serde_json::to_string(&engine).unwrap();
        let mut restored: GameEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, engine);

        assert_eq!(restored.reveal((0, 1)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(restored.remaining_safe_cells(), 6);
    }

    #[test]
    fn tampered_snapshots_are_rejected() {
        let engine = engine((3, 3), &[(1, 1)]);
        let json = serde_json::to_string(&engine).unwrap();

        let tampered = json.replace("\"remaining_safe_cells\":8", "\"remaining_safe_cells\":0");
        assert_ne!(tampered, json);
        assert!(serde_json::from_str::<GameEngine>(&tampered).is_err());

        let tampered =
            json.replace("\"remaining_flag_capacity\":1", "\"remaining_flag_capacity\":3");
        assert_ne!(tampered, json);
        assert!(serde_json::from_str::<GameEngine>(&tampered).is_err());

        let tampered = json.replace("\"status\":\"InProgress\"", "\"status\":\"Won\"");
        assert_ne!(tampered, json);
        assert!(serde_json::from_str::<GameEngine>(&tampered).is_err());
    }

    #[test]
    fn finished_snapshots_round_trip() {
        let mut lost = engine((2, 2), &[(0, 0)]);
        lost.toggle_flag((1, 1)).unwrap();
        lost.reveal((0, 0)).unwrap();
        let json = serde_json::to_string(&lost).unwrap();
        assert_eq!(serde_json::from_str::<GameEngine>(&json).unwrap(), lost);

        // a lost game must name the mine that ended it
        let tampered = json.replace("\"triggered_mine\":[0,0]", "\"triggered_mine\":[1,1]");
        assert_ne!(tampered, json);
        assert!(serde_json::from_str::<GameEngine>(&tampered).is_err());

        let mut won = engine((2, 2), &[(0, 0)]);
        for coords in [(0, 1), (1, 0), (1, 1)] {
            won.reveal(coords).unwrap();
        }
        assert_eq!(won.status(), GameStatus::Won);
        let json = serde_json::to_string(&won).unwrap();
        assert_eq!(serde_json::from_str::<GameEngine>(&json).unwrap(), won);
    }
}
