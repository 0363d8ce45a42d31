//! Step planning.
//!
//! Breaks a move into a sequence of intermediate angles.

/// Direction of travel along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward larger angles.
    Increasing,
    /// Toward smaller angles. Also used when already at the target.
    Decreasing,
}

impl Direction {
    /// Direction from `current` toward `target`.
    #[inline]
    pub fn toward(current: i32, target: i32) -> Self {
        if target > current {
            Direction::Increasing
        } else {
            Direction::Decreasing
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Increasing => 1,
            Direction::Decreasing => -1,
        }
    }
}

/// Iterator over the angles of a stepped move.
///
/// Starts at `max(0, current)` and advances by `step` toward `target`. The
/// last angle yielded is always `target`, even when the distance is not a
/// multiple of `step`. A move to the current angle yields `target` once.
#[derive(Debug, Clone)]
pub struct StepPlan {
    /// Next angle to yield before the final one.
    cursor: i32,

    /// Final angle.
    target: i32,

    /// Signed increment.
    stride: i32,

    /// Travel direction.
    direction: Direction,

    /// Whether `target` has been yielded.
    done: bool,
}

impl StepPlan {
    /// Plan a move from `current` to `target` in `step` degree increments.
    ///
    /// A `step` of zero is treated as one.
    pub fn new(current: i32, target: i32, step: u32) -> Self {
        let direction = Direction::toward(current, target);
        let step = step.clamp(1, i32::MAX as u32) as i32;
        Self {
            cursor: current.max(0),
            target,
            stride: step * direction.sign(),
            direction,
            done: false,
        }
    }

    /// Travel direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Final angle of the move.
    #[inline]
    pub fn target(&self) -> i32 {
        self.target
    }

    /// Whether `angle` still lies strictly before the target.
    fn before_target(&self, angle: i32) -> bool {
        match self.direction {
            Direction::Increasing => angle < self.target,
            Direction::Decreasing => angle > self.target,
        }
    }
}

impl Iterator for StepPlan {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.done {
            return None;
        }

        if self.before_target(self.cursor) {
            let angle = self.cursor;
            self.cursor = self.cursor.saturating_add(self.stride);
            return Some(angle);
        }

        self.done = true;
        Some(self.target)
    }
}

impl core::iter::FusedIterator for StepPlan {}
