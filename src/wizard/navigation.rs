use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Which way the last move went. Only front ends care (transition choice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub current: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("step {requested} is outside 1..={total}")]
    OutOfRange { requested: usize, total: usize },
}

/// Bounds-checked traversal over `1..=total` steps.
#[derive(Debug, Clone)]
pub struct StepController {
    current: usize,
    total: usize,
    direction: Direction,
    visited: BTreeSet<usize>,
}

impl StepController {
    pub fn new(total: usize) -> Self {
        Self {
            current: 1,
            total: total.max(1),
            direction: Direction::Forward,
            visited: BTreeSet::from([1]),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> NavigationState {
        NavigationState {
            current: self.current,
            direction: self.direction,
        }
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    pub fn has_visited(&self, step: usize) -> bool {
        self.visited.contains(&step)
    }

    /// Returns whether the step changed; a no-op on the last step.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.move_to(self.current + 1, Direction::Forward);
        true
    }

    /// Returns whether the step changed; a no-op on the first step.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.move_to(self.current - 1, Direction::Backward);
        true
    }

    /// Free navigation to any step, visited or not.
    pub fn jump_to(&mut self, step: usize) -> Result<bool, NavigationError> {
        if step == 0 || step > self.total {
            return Err(NavigationError::OutOfRange {
                requested: step,
                total: self.total,
            });
        }
        if step == self.current {
            return Ok(false);
        }
        let direction = if step > self.current {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.move_to(step, direction);
        Ok(true)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.total);
    }

    fn move_to(&mut self, step: usize, direction: Direction) {
        debug!(from = self.current, to = step, ?direction, "wizard step changed");
        self.current = step;
        self.direction = direction;
        self.visited.insert(step);
    }
}
