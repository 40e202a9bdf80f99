use log::warn;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::board::{Board, Point};

/// Random draws tried before falling back to a full scan of the board.
pub const RANDOM_ATTEMPTS: usize = 200;

/// Owns the food cell and the randomness used to move it.
pub struct FoodPlacer<R = StdRng> {
    rng: R,
    position: Point,
}

impl FoodPlacer<StdRng> {
    pub fn from_entropy() -> Self {
        FoodPlacer::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        FoodPlacer::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FoodPlacer<R> {
    pub fn new(rng: R) -> Self {
        FoodPlacer { rng, position: Point::default() }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Puts the food on a given cell, bypassing the random draw.
    pub fn set(&mut self, p: Point) {
        self.position = p;
    }

    /// Moves the food to a cell for which `occupied` is false.
    ///
    /// The board must have at least one free cell. Callers guarantee this by
    /// ending the round as soon as the snake fills the board.
    pub fn place<F>(&mut self, board: &Board, occupied: F) -> Point
    where
        F: Fn(Point) -> bool,
    {
        for _ in 0..RANDOM_ATTEMPTS {
            let candidate = Point::new(
                self.rng.gen_range(0..board.width()),
                self.rng.gen_range(0..board.height()),
            );
            if !occupied(candidate) {
                self.position = candidate;
                return candidate;
            }
        }

        match board.cells().find(|p| !occupied(*p)) {
            Some(p) => self.position = p,
            None => warn!("no free cell left for food, keeping it at {:?}", self.position),
        }

        self.position
    }
}
