use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Counters recomputed from scratch by scanning every cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tally {
    /// Safe cells that are not revealed yet, flagged or not.
    pub covered_safe_cells: CellCount,
    pub flagged_cells: CellCount,
}

/// The grid of cells for one game. Its dimensions never change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardData")]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

#[derive(Deserialize)]
struct BoardData {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl TryFrom<BoardData> for Board {
    type Error = GameError;

    fn try_from(data: BoardData) -> Result<Self> {
        let board = Self {
            cells: data.cells,
            mine_count: data.mine_count,
        };
        board.check_cells()?;
        if usize::from(board.mine_count) != board.count_mines() {
            return Err(GameError::InconsistentSnapshot);
        }
        Ok(board)
    }
}

impl Board {
    /// Builds covered cells for `layout`, deriving every adjacent mine count.
    pub fn from_layout(layout: &MineLayout) -> Self {
        let cells = Array2::from_shape_fn(layout.size().to_nd_index(), |(x, y)| {
            let coords = (x as Coord, y as Coord);
            let count = layout.adjacent_mine_count(coords);
            if layout[coords] {
                Cell::mine(count)
            } else {
                Cell::safe(count)
            }
        });

        Self {
            cells,
            mine_count: layout.mine_count(),
        }
    }

    /// Takes prebuilt cells row by row. Every adjacent mine count must match the grid.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, Vec::len);
        if row_count == 0 || col_count == 0 {
            return Err(GameError::EmptyBoard);
        }
        if row_count > Coord::MAX.into()
            || col_count > Coord::MAX.into()
            || rows.iter().any(|row| row.len() != col_count)
        {
            return Err(GameError::InvalidBoardShape);
        }

        let flat: Vec<Cell> = rows.into_iter().flatten().collect();
        let cells = Array2::from_shape_vec((row_count, col_count), flat)
            .map_err(|_| GameError::InvalidBoardShape)?;

        let mut board = Self {
            cells,
            mine_count: 0,
        };
        board.check_cells()?;
        // at most 255 * 255 cells, always fits
        board.mine_count = board.count_mines() as CellCount;
        Ok(board)
    }

    fn count_mines(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_mine()).count()
    }

    /// Dimensions fit `Coord` and every cell counts exactly the mines around it.
    fn check_cells(&self) -> Result<()> {
        let (rows, cols) = self.cells.dim();
        if rows == 0 || cols == 0 {
            return Err(GameError::EmptyBoard);
        }
        if rows > Coord::MAX.into() || cols > Coord::MAX.into() {
            return Err(GameError::InvalidBoardShape);
        }

        for (coords, cell) in self.iter() {
            let expected = self
                .iter_neighbors(coords)
                .filter(|&pos| self[pos].is_mine())
                .count();
            if usize::from(cell.adjacent_mine_count()) != expected {
                return Err(GameError::MismatchedMineCount(coords));
            }
        }
        Ok(())
    }

    /// `(rows, cols)`
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds(coords))
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// All cells in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Cell)> {
        self.cells
            .indexed_iter()
            .map(|((x, y), cell)| ((x as Coord, y as Coord), cell))
    }

    /// One slice-like view per row, for renderers.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = &Cell>> {
        self.cells.rows().into_iter().map(|row| row.into_iter())
    }

    pub fn tally(&self) -> Tally {
        let mut tally = Tally {
            covered_safe_cells: 0,
            flagged_cells: 0,
        };
        for cell in self.cells.iter() {
            if !cell.is_mine() && !cell.is_revealed() {
                tally.covered_safe_cells += 1;
            }
            if cell.is_flagged() {
                tally.flagged_cells += 1;
            }
        }
        tally
    }

    pub(crate) fn reveal_all(&mut self) {
        self.cells.iter_mut().for_each(Cell::reveal);
    }
}

impl From<&MineLayout> for Board {
    fn from(layout: &MineLayout) -> Self {
        Self::from_layout(layout)
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
