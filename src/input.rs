use std::collections::VecDeque;

use log::trace;

use crate::board::Direction;

/// Most directions held at once, the standing one included.
pub const QUEUE_CAPACITY: usize = 3;

/// Pending turns, consumed one per tick.
///
/// The queue is never empty: `current` is the standing direction and is only
/// replaced when a pending turn is consumed, so the snake keeps moving when no
/// key arrives.
#[derive(Debug, Clone)]
pub struct InputQueue {
    current: Direction,
    pending: VecDeque<Direction>,
}

impl InputQueue {
    pub fn new(initial: Direction) -> Self {
        InputQueue { current: initial, pending: VecDeque::with_capacity(QUEUE_CAPACITY - 1) }
    }

    /// Queues a turn. Returns `false` when the turn was dropped, either because
    /// the queue is full or because it lies on the same axis as the last
    /// queued direction (a reversal or a repeat).
    pub fn push(&mut self, dir: Direction) -> bool {
        if self.len() >= QUEUE_CAPACITY {
            trace!("dropping {:?}: input queue full", dir);
            return false;
        }

        if self.back().axis() == dir.axis() {
            trace!("dropping {:?}: same axis as {:?}", dir, self.back());
            return false;
        }

        self.pending.push_back(dir);
        true
    }

    pub fn front(&self) -> Direction {
        self.current
    }

    pub fn back(&self) -> Direction {
        self.pending.back().copied().unwrap_or(self.current)
    }

    /// Moves on to the next queued turn, if any. The last entry stays put.
    pub fn advance(&mut self) {
        if let Some(next) = self.pending.pop_front() {
            self.current = next;
        }
    }

    pub fn len(&self) -> usize {
        1 + self.pending.len()
    }
}
