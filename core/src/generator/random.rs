use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::seq::index;
use rand::SeedableRng;

use super::*;

/// Uniformly random mine placement. The same seed always produces the same board.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        let total_cells = config.total_cells();

        let mines = if config.mines >= total_cells {
            log::warn!(
                "Minefield already full, generated anyway, requested {} but only fits {}",
                config.mines,
                total_cells
            );
            total_cells
        } else {
            config.mines
        };

        let cols = usize::from(config.size.1);
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for place in index::sample(&mut rng, total_cells.into(), mines.into()) {
            mine_mask[[place / cols, place % cols]] = true;
        }

        let layout = MineLayout::from_mine_mask(mine_mask)?;
        log::debug!(
            "Generated {:?} board with {} mines from seed {}",
            layout.size(),
            layout.mine_count(),
            self.seed
        );
        Ok(Board::from_layout(&layout))
    }
}
