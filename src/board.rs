use std::ops::Add;

use thiserror::Error;

pub const BOARD_WIDTH: i32 = 30;
pub const BOARD_HEIGHT: i32 = 18;

/// A cell coordinate. `x` grows to the right, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> Point {
        match self {
            Direction::Up => Point::new(0, -1),
            Direction::Down => Point::new(0, 1),
            Direction::Left => Point::new(-1, 0),
            Direction::Right => Point::new(1, 0),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    Empty { width: i32, height: i32 },
}

/// Raised by [`Board::resolve`] when a point leaves the board and wrapping is off.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("point {0:?} is outside the board")]
pub struct OutOfBounds(pub Point);

/// The playing field. Its dimensions never change once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
}

impl Board {
    pub fn new(width: i32, height: i32) -> Result<Self, BoardError> {
        if width <= 0 || height <= 0 {
            return Err(BoardError::Empty { width, height });
        }

        Ok(Board { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells, which is also the longest a snake can get.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2, self.height / 2)
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Maps a freshly stepped-to point back onto the board.
    ///
    /// Points already on the board are returned as is. Otherwise the point is
    /// either wrapped around to the opposite edge, axis by axis, or rejected.
    pub fn resolve(&self, p: Point, wrap: bool) -> Result<Point, OutOfBounds> {
        if self.in_bounds(p) {
            return Ok(p);
        }

        if !wrap {
            return Err(OutOfBounds(p));
        }

        Ok(Point::new(p.x.rem_euclid(self.width), p.y.rem_euclid(self.height)))
    }

    /// Every cell, column by column.
    pub fn cells(&self) -> impl Iterator<Item = Point> {
        let (width, height) = (self.width, self.height);
        (0..width).flat_map(move |x| (0..height).map(move |y| Point::new(x, y)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Board { width: BOARD_WIDTH, height: BOARD_HEIGHT }
    }
}
