use crate::*;
pub use random::*;

mod random;

/// Produces the initial board for a game. Every cell of the result is covered and unflagged.
pub trait BoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board>;
}

/// A fixed layout, for scripted games and tests.
impl BoardGenerator for MineLayout {
    fn generate(self, config: GameConfig) -> Result<Board> {
        if self.game_config() != config {
            log::warn!(
                "Fixed layout {:?} does not match requested {:?}, using the layout",
                self.game_config(),
                config
            );
        }
        Ok(Board::from_layout(&self))
    }
}
