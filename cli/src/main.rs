use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sweeper_core::GameConfig;

use command::{Command, HELP, ParseError};
use render::{BoardView, status_line};
use session::Session;

mod command;
mod logging;
mod render;
mod session;
mod stopwatch;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    Beginner,
    Intermediate,
    Expert,
}

impl Preset {
    fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::BEGINNER,
            Self::Intermediate => GameConfig::INTERMEDIATE,
            Self::Expert => GameConfig::EXPERT,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board size and mine count to start from
    #[arg(short, long, value_enum, default_value_t = Preset::Beginner)]
    preset: Preset,

    /// Number of rows, overrides the preset
    #[arg(short = 'H', long)]
    rows: Option<u8>,

    /// Number of columns, overrides the preset
    #[arg(short = 'W', long)]
    cols: Option<u8>,

    /// Number of mines, overrides the preset
    #[arg(short, long)]
    mines: Option<u16>,

    /// Force a seed instead of random, later games use the following seeds
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    fn game_config(&self) -> sweeper_core::Result<GameConfig> {
        let preset = self.preset.config();
        let size = (
            self.rows.unwrap_or(preset.size.0),
            self.cols.unwrap_or(preset.size.1),
        );
        GameConfig::new(size, self.mines.unwrap_or(preset.mines))
    }
}

fn draw(out: &mut impl Write, session: &Session) -> io::Result<()> {
    let engine = session.engine();
    writeln!(out, "{}", status_line(engine, session.elapsed()))?;
    write!(out, "{}", BoardView::new(engine))?;
    out.flush()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose.log_level_filter());

    let config = args.game_config().context("Invalid board settings")?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Starting {config:?} with seed {seed}");

    let mut session = Session::new(config, seed).context("Could not generate a board")?;
    let mut out = io::stdout().lock();

    writeln!(out, "{HELP}")?;
    draw(&mut out, &session)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read input")?;

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Ok(Command::NewGame) => session.new_game().context("Could not generate a board")?,
            Ok(Command::Play(action)) => match session.play(action) {
                Ok(outcome) => log::debug!("{action:?}: {outcome:?}"),
                Err(err) => {
                    writeln!(out, "{err}")?;
                    continue;
                }
            },
            Err(ParseError::Empty) => continue,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        }

        draw(&mut out, &session)?;
    }

    Ok(())
}
