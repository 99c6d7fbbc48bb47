use sweeper_core::{
    Action, ActionOutcome, Board, BoardGenerator, GameConfig, GameEngine, RandomBoardGenerator,
    Result,
};
use web_time::Duration;

use crate::stopwatch::Stopwatch;

/// A run of games with the same settings, plus the clock shown to the player.
///
/// The clock starts with the first reveal that changes the board and stops as soon as the game is
/// won or lost.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    next_seed: u64,
    engine: GameEngine,
    stopwatch: Stopwatch,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let board = RandomBoardGenerator::new(seed).generate(config)?;
        Ok(Self::with_board(config, board, seed.wrapping_add(1)))
    }

    pub fn with_board(config: GameConfig, board: Board, next_seed: u64) -> Self {
        Self {
            config,
            next_seed,
            engine: GameEngine::new(board),
            stopwatch: Stopwatch::default(),
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn elapsed(&self) -> Duration {
        self.stopwatch.elapsed()
    }

    pub fn clock_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    pub fn play(&mut self, action: Action) -> Result<ActionOutcome> {
        let outcome = self.engine.apply(action)?;

        if let ActionOutcome::Reveal(reveal) = outcome {
            if reveal.has_update() && !self.stopwatch.is_running() {
                log::debug!("First reveal, starting the clock");
                self.stopwatch.start();
            }
        }
        if self.engine.is_finished() && self.stopwatch.is_running() {
            self.stopwatch.stop();
            log::info!(
                "Game over: {:?} after {:.1}s",
                self.engine.status(),
                self.elapsed().as_secs_f32()
            );
        }

        Ok(outcome)
    }

    /// Throws the current game away and deals a fresh board from the next seed.
    pub fn new_game(&mut self) -> Result<()> {
        let seed = self.next_seed;
        let board = RandomBoardGenerator::new(seed).generate(self.config)?;
        self.next_seed = seed.wrapping_add(1);

        log::debug!("New game from seed {seed}");
        self.engine.reset(board);
        self.stopwatch.reset();
        Ok(())
    }
}
