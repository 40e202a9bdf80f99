use std::iter::successors;

use log::debug;
use rand::Rng;

use crate::board::{Board, Direction::{self, *}, Point};
use crate::food::FoodPlacer;
use crate::input::InputQueue;
use crate::state::GameState;
use MoveResult::*;

pub const INITIAL_SNAKE_LENGTH: usize = 10;
pub const INITIAL_DIRECTION: Direction = Left;

/// Index of a slot in the segment pool.
pub(crate) type SegmentId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crash {
    Wall,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Point, old_tail: Point },
    Ate { new_head: Point },
    Won { new_head: Point },
    Crashed(Crash),
}

/// One body cell. `next` points towards the tail, `prev` towards the head.
#[derive(Debug, Clone, Copy, Default)]
struct Segment {
    pos: Point,
    next: Option<SegmentId>,
    prev: Option<SegmentId>,
}

/// A snake whose segments live in a pool with one slot per board cell.
///
/// Slots `0..len` are in use. Moving recycles the tail slot as the new head,
/// growing takes slot `len`, so a tick never allocates.
pub struct Snake {
    pool: Vec<Segment>,
    len: usize,
    head: SegmentId,
    tail: SegmentId,
    queue: InputQueue,
}

impl Snake {
    pub fn new(board: &Board) -> Self {
        let mut snake = Snake {
            pool: vec![Segment::default(); board.area()],
            len: 0,
            head: 0,
            tail: 0,
            queue: InputQueue::new(INITIAL_DIRECTION),
        };
        snake.reset_body(board);
        snake
    }

    /// Builds a snake from explicit positions, head first.
    ///
    /// Returns `None` if `body` is empty or longer than the board has cells.
    pub fn from_segments(board: &Board, body: &[Point], direction: Direction) -> Option<Self> {
        let (&head, rest) = body.split_first()?;
        if body.len() > board.area() {
            return None;
        }

        let mut snake = Snake {
            pool: vec![Segment::default(); board.area()],
            len: 1,
            head: 0,
            tail: 0,
            queue: InputQueue::new(direction),
        };
        snake.pool[0].pos = head;
        for &p in rest {
            snake.push_tail(p);
        }

        Some(snake)
    }

    /// Lays out a fresh body in the middle of the board and puts down food.
    ///
    /// A board the opening body already fills is won on the spot.
    pub fn restart<R: Rng>(
        &mut self,
        board: &Board,
        food: &mut FoodPlacer<R>,
        state: &mut GameState,
    ) {
        self.reset_body(board);

        if self.len == self.capacity() {
            state.win();
            return;
        }

        let head = self.head;
        food.place(board, |p| self.is_occupied(Some(head), p));
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.pool.len()
    }

    pub fn head(&self) -> Point {
        self.pool[self.head].pos
    }

    #[cfg(test)]
    fn head_id(&self) -> SegmentId {
        self.head
    }

    #[cfg(test)]
    fn next(&self, id: SegmentId) -> Option<SegmentId> {
        self.pool[id].next
    }

    /// The direction the next move will take.
    pub fn direction(&self) -> Direction {
        self.queue.front()
    }

    pub fn queue(&self) -> &InputQueue {
        &self.queue
    }

    pub fn steer(&mut self, dir: Direction) -> bool {
        self.queue.push(dir)
    }

    /// Body positions, head first.
    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.walk(Some(self.head)).map(move |id| self.pool[id].pos)
    }

    /// Whether `p` is covered by `start` or any segment behind it.
    pub(crate) fn is_occupied(&self, start: Option<SegmentId>, p: Point) -> bool {
        self.walk(start).any(|id| self.pool[id].pos == p)
    }

    pub fn occupies(&self, p: Point) -> bool {
        self.is_occupied(Some(self.head), p)
    }

    /// Runs one tick: moves the head, then resolves food and collisions.
    pub fn advance<R: Rng>(
        &mut self,
        board: &Board,
        food: &mut FoodPlacer<R>,
        state: &mut GameState,
    ) -> MoveResult {
        let stepped = self.head() + self.queue.front().delta();
        let new_head = match board.resolve(stepped, state.wrap()) {
            Ok(p) => p,
            Err(e) => {
                debug!("{}", e);
                state.lose();
                return Crashed(Crash::Wall);
            }
        };

        self.queue.advance();

        let old_tail = self.pool[self.tail].pos;
        self.shift(new_head);

        if new_head == food.position() {
            if self.len < self.capacity() {
                self.push_tail(old_tail);
            }
            state.increase_score();

            if self.len == self.capacity() {
                state.win();
                return Won { new_head };
            }

            let head = self.head;
            food.place(board, |p| self.is_occupied(Some(head), p));
            Ate { new_head }
        } else if self.is_occupied(self.pool[self.head].next, new_head) {
            state.lose();
            Crashed(Crash::Body)
        } else {
            Moved { new_head, old_tail }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn reset_body(&mut self, board: &Board) {
        self.pool.iter_mut().for_each(|seg| *seg = Segment::default());

        let center = board.center();
        self.len = 1;
        self.head = 0;
        self.tail = 0;
        self.pool[0].pos = center;

        // Narrow boards get a shorter snake so the body stays on the board.
        let length = INITIAL_SNAKE_LENGTH.min((board.width() - center.x) as usize);
        for i in 1..length {
            self.push_tail(center + Point::new(i as i32, 0));
        }

        self.queue = InputQueue::new(INITIAL_DIRECTION);
    }

    /// Recycles the tail slot as the head slot at `pos`.
    fn shift(&mut self, pos: Point) {
        let slot = self.tail;

        match self.pool[slot].prev {
            Some(new_tail) => {
                self.pool[new_tail].next = None;
                self.tail = new_tail;

                self.pool[self.head].prev = Some(slot);
                self.pool[slot] = Segment { pos, next: Some(self.head), prev: None };
                self.head = slot;
            }
            // A single segment is both head and tail.
            None => self.pool[slot].pos = pos,
        }
    }

    fn push_tail(&mut self, pos: Point) {
        debug_assert!(self.len < self.capacity(), "segment pool exhausted");

        let id = self.len;
        self.pool[id] = Segment { pos, next: None, prev: Some(self.tail) };
        self.pool[self.tail].next = Some(id);
        self.tail = id;
        self.len += 1;
    }

    fn walk(&self, start: Option<SegmentId>) -> impl Iterator<Item = SegmentId> + '_ {
        successors(start, move |&id| self.pool[id].next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Difficulty, Settings};

    fn state(wrap: bool) -> GameState {
        GameState::new(Settings::new(Difficulty::new(6), wrap), 0)
    }

    fn body(snake: &Snake) -> Vec<Point> {
        snake.positions().collect()
    }

    fn pts(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn restart_layout() {
        let board = Board::default();
        let mut food = FoodPlacer::seeded(11);
        let mut state = state(false);
        let mut snake = Snake::new(&board);
        snake.restart(&board, &mut food, &mut state);

        let cells = body(&snake);
        assert_eq!(snake.len(), INITIAL_SNAKE_LENGTH);
        assert_eq!(cells.len(), INITIAL_SNAKE_LENGTH);
        assert_eq!(snake.head(), Point::new(15, 9));
        assert_eq!(cells[9], Point::new(24, 9));
        assert_eq!(snake.direction(), Left);
        assert_eq!(snake.queue().len(), 1);
        assert!(!cells.contains(&food.position()));
        assert_eq!(snake.capacity(), board.area());
    }

    #[test]
    fn narrow_board_gets_short_snake() {
        let board = Board::new(4, 4).unwrap();
        let snake = Snake::new(&board);

        assert_eq!(body(&snake), pts(&[(2, 2), (3, 2)]));
    }

    #[test]
    fn plain_move_shifts_body() {
        let board = Board::new(10, 10).unwrap();
        let mut food = FoodPlacer::seeded(0);
        food.set(Point::new(0, 0));
        let mut state = state(false);
        let mut snake = Snake::from_segments(&board, &pts(&[(5, 5), (6, 5), (7, 5)]), Left).unwrap();

        let res = snake.advance(&board, &mut food, &mut state);
        assert_eq!(res, Moved { new_head: Point::new(4, 5), old_tail: Point::new(7, 5) });
        assert_eq!(body(&snake), pts(&[(4, 5), (5, 5), (6, 5)]));
        assert!(state.is_running());
    }

    #[test]
    fn eating_grows_at_old_tail() {
        let board = Board::new(10, 10).unwrap();
        let mut food = FoodPlacer::seeded(0);
        food.set(Point::new(4, 5));
        let mut state = state(false);
        let mut snake = Snake::from_segments(&board, &pts(&[(5, 5), (6, 5), (7, 5)]), Left).unwrap();

        let res = snake.advance(&board, &mut food, &mut state);
        assert_eq!(res, Ate { new_head: Point::new(4, 5) });
        assert_eq!(body(&snake), pts(&[(4, 5), (5, 5), (6, 5), (7, 5)]));
        assert_eq!(state.score(), 6);
        assert!(!snake.occupies(food.position()));
    }

    #[test]
    fn single_segment_moves_and_grows() {
        let board = Board::new(5, 5).unwrap();
        let mut food = FoodPlacer::seeded(0);
        food.set(Point::new(1, 2));
        let mut state = state(false);
        let mut snake = Snake::from_segments(&board, &pts(&[(2, 2)]), Left).unwrap();

        assert!(matches!(snake.advance(&board, &mut food, &mut state), Ate { .. }));
        assert_eq!(body(&snake), pts(&[(1, 2), (2, 2)]));
    }

    #[test]
    fn wall_crash_leaves_body_alone() {
        let board = Board::new(10, 10).unwrap();
        let mut food = FoodPlacer::seeded(0);
        food.set(Point::new(9, 9));
        let mut state = state(false);
        let mut snake = Snake::from_segments(&board, &pts(&[(0, 3), (1, 3), (2, 3)]), Left).unwrap();
        snake.steer(Up);

        assert_eq!(snake.advance(&board, &mut food, &mut state), Crashed(Crash::Wall));
        assert_eq!(body(&snake), pts(&[(0, 3), (1, 3), (2, 3)]));
        assert_eq!(snake.queue().len(), 2);
        assert!(!state.is_running());
        assert!(!state.won());
    }

    #[test]
    fn wraps_to_opposite_edge() {
        let board = Board::new(10, 10).unwrap();
        let mut food = FoodPlacer::seeded(0);
        food.set(Point::new(5, 5));
        let mut state = state(true);
        let mut snake = Snake::from_segments(&board, &pts(&[(0, 3), (1, 3)]), Left).unwrap();

        assert!(matches!(snake.advance(&board, &mut food, &mut state), Moved { .. }));
        assert_eq!(snake.head(), Point::new(9, 3));
    }

    #[test]
    fn biting_own_body_ends_round() {
        let board = Board::new(10, 10).unwrap();
        let mut food = FoodPlacer::seeded(0);
        food.set(Point::new(9, 9));
        let mut state = state(false);
        let mut snake =
            Snake::from_segments(&board, &pts(&[(2, 2), (3, 2), (3, 3), (2, 3), (1, 3)]), Down)
                .unwrap();

        assert_eq!(snake.advance(&board, &mut food, &mut state), Crashed(Crash::Body));
        assert!(!state.is_running());
    }

    #[test]
    fn chasing_the_tail_is_allowed() {
        let board = Board::new(10, 10).unwrap();
        let mut food = FoodPlacer::seeded(0);
        food.set(Point::new(9, 9));
        let mut state = state(false);
        let mut snake =
            Snake::from_segments(&board, &pts(&[(1, 1), (2, 1), (2, 2), (1, 2)]), Down).unwrap();

        assert!(matches!(snake.advance(&board, &mut food, &mut state), Moved { .. }));
        assert_eq!(body(&snake), pts(&[(1, 2), (1, 1), (2, 1), (2, 2)]));
        assert!(state.is_running());
    }

    #[test]
    fn queued_turns_apply_one_per_tick() {
        let board = Board::new(10, 10).unwrap();
        let mut food = FoodPlacer::seeded(0);
        food.set(Point::new(9, 9));
        let mut state = state(false);
        let mut snake = Snake::from_segments(&board, &pts(&[(5, 5), (6, 5)]), Left).unwrap();

        assert!(snake.steer(Up));
        assert!(snake.steer(Right));

        snake.advance(&board, &mut food, &mut state);
        assert_eq!(snake.head(), Point::new(4, 5));
        snake.advance(&board, &mut food, &mut state);
        assert_eq!(snake.head(), Point::new(4, 4));
        snake.advance(&board, &mut food, &mut state);
        assert_eq!(snake.head(), Point::new(5, 4));
        snake.advance(&board, &mut food, &mut state);
        assert_eq!(snake.head(), Point::new(6, 4));
    }

    #[test]
    fn occupancy_from_a_segment() {
        let board = Board::new(10, 10).unwrap();
        let snake = Snake::from_segments(&board, &pts(&[(5, 5), (6, 5), (7, 5)]), Left).unwrap();
        let neck = snake.next(snake.head_id());

        assert!(snake.is_occupied(Some(snake.head_id()), Point::new(5, 5)));
        assert!(!snake.is_occupied(neck, Point::new(5, 5)));
        assert!(snake.is_occupied(neck, Point::new(7, 5)));
        assert!(!snake.is_occupied(None, Point::new(7, 5)));
    }

    #[test]
    fn single_cell_board_is_won_at_restart() {
        let board = Board::new(1, 1).unwrap();
        let mut food = FoodPlacer::seeded(0);
        food.set(Point::new(0, 0));
        let mut state = state(true);
        let mut snake = Snake::new(&board);

        snake.restart(&board, &mut food, &mut state);
        assert_eq!(snake.len(), 1);
        assert!(state.won());
    }

    #[test]
    fn eating_on_a_full_pool_does_not_grow() {
        let board = Board::new(1, 1).unwrap();
        let mut food = FoodPlacer::seeded(0);
        food.set(Point::new(0, 0));
        let mut state = state(true);
        let mut snake = Snake::from_segments(&board, &pts(&[(0, 0)]), Left).unwrap();

        let res = snake.advance(&board, &mut food, &mut state);
        assert_eq!(res, Won { new_head: Point::new(0, 0) });
        assert_eq!(snake.len(), 1);
        assert!(state.won());
    }

    #[test]
    fn rejects_bad_bodies() {
        let board = Board::new(2, 2).unwrap();

        assert!(Snake::from_segments(&board, &[], Left).is_none());
        assert!(Snake::from_segments(&board, &pts(&[(0, 0); 5]), Left).is_none());
    }
}
