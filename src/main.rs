use std::fs::File;

use anyhow::{Context, Result};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use snake::food::FoodPlacer;
use snake::game::{Shutdown, SnakeGame};
use snake::storage::Storage;
use snake::term::TermManager;
use snake::{Board, GameState, Session};

const LOG_FILE: &str = "snake.log";

fn main() -> Result<()> {
    WriteLogger::init(
        LevelFilter::Info,
        Config::default(),
        File::create(LOG_FILE).with_context(|| format!("could not create {}", LOG_FILE))?,
    )
    .context("could not initialise logging")?;

    let board = Board::default();
    let shutdown = Shutdown::register().context("could not install signal handlers")?;

    // The terminal has to fit the board before any game state is touched.
    let term = TermManager::new().context("could not read terminal size")?;
    term.check_size(&board)?;

    let state = GameState::load(Storage::default());
    let session = Session::new(board, state, FoodPlacer::from_entropy());
    info!("starting on a {}x{} board", board.width(), board.height());

    // The main game loop takes care of exiting cleanly on CTRL+C and SIGTERM
    let mut game = SnakeGame::new(term, session, shutdown);
    game.run().context("terminal error")?;

    Ok(())
}
