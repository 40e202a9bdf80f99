use log::info;
use rand::{rngs::StdRng, Rng};

use crate::board::{Board, Direction, Point};
use crate::food::FoodPlacer;
use crate::snake::{MoveResult, Snake};
use crate::state::{GameState, Phase};

/// Everything one game needs: the board, the snake, the food and the score.
///
/// Built once by the entry point and handed by reference to the loop and the
/// renderer.
pub struct Session<R = StdRng> {
    board: Board,
    snake: Snake,
    food: FoodPlacer<R>,
    state: GameState,
}

impl<R: Rng> Session<R> {
    pub fn new(board: Board, state: GameState, food: FoodPlacer<R>) -> Self {
        let mut session = Session { board, snake: Snake::new(&board), food, state };
        session.restart();
        session
    }

    /// Like [`Session::new`] but keeps a prepared snake instead of laying out a
    /// fresh one. Food is left where `food` already has it.
    pub fn with_snake(board: Board, snake: Snake, state: GameState, food: FoodPlacer<R>) -> Self {
        Session { board, snake, food, state }
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.snake.restart(&self.board, &mut self.food, &mut self.state);
        info!("new round, food at {:?}", self.food.position());
    }

    /// Moves the snake once. Does nothing unless the round is running.
    pub fn tick(&mut self) -> Option<MoveResult> {
        if !self.state.is_running() {
            return None;
        }

        Some(self.snake.advance(&self.board, &mut self.food, &mut self.state))
    }

    pub fn steer(&mut self, dir: Direction) -> bool {
        self.state.is_running() && self.snake.steer(dir)
    }

    pub fn pause(&mut self) {
        self.state.pause();
    }

    pub fn resume(&mut self) {
        self.state.resume();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Point {
        self.food.position()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }
}
