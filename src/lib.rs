//! Terminal snake.
//!
//! The simulation core ([`board`], [`input`], [`snake`], [`food`], [`state`])
//! knows nothing about the terminal; [`term`] and [`game`] drive it in real time.

pub mod board;
pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod session;
pub mod snake;
pub mod state;
pub mod storage;
pub mod term;

pub use board::{Board, Direction, Point};
pub use session::Session;
pub use state::{GameState, Outcome, Phase};
