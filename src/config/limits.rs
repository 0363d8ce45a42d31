//! Per-axis motion limits.

use serde::{Deserialize, Serialize};

use super::units::Seconds;

/// Default step size in degrees.
///
/// The position tracker rounds to whole degrees, so single-degree steps can
/// land on the angle the servo already reports and produce no visible motion.
pub const DEFAULT_STEP: u32 = 2;

/// Default pause between steps.
pub const DEFAULT_SLEEP: Seconds = Seconds(0.05);

/// Motion limits for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    /// Minimum allowed angle in degrees.
    pub min: i32,

    /// Maximum allowed angle in degrees.
    pub max: i32,

    /// Degrees moved per step.
    pub step: u32,

    /// Pause after each step.
    pub sleep: Seconds,
}

impl AxisLimits {
    /// Create new limits.
    pub fn new(min: i32, max: i32, step: u32, sleep: Seconds) -> Self {
        Self {
            min,
            max,
            step,
            sleep,
        }
    }

    /// Factory limits for the pan axis.
    pub fn pan_default() -> Self {
        Self::new(0, 270, DEFAULT_STEP, DEFAULT_SLEEP)
    }

    /// Factory limits for the tilt axis.
    pub fn tilt_default() -> Self {
        Self::new(0, 135, DEFAULT_STEP, DEFAULT_SLEEP)
    }

    /// Check `min <= max`, `step >= 1` and a usable sleep.
    pub fn is_valid(&self) -> bool {
        self.min <= self.max && self.step >= 1 && self.sleep.is_valid()
    }

    /// Check if an angle is within limits.
    pub fn contains(&self, angle: i32) -> bool {
        angle >= self.min && angle <= self.max
    }

    /// Constrain an angle to `[min, max]`.
    ///
    /// Never panics; with inverted bounds the result is `min`.
    pub fn clamp(&self, angle: i32) -> i32 {
        self.min.max(angle.min(self.max))
    }

    /// Produce the limits that result from applying `update`.
    ///
    /// `current` is the axis angle used when a min/max update carries no
    /// explicit value. The result is not validated here.
    pub fn with_update(&self, update: LimitUpdate, current: Option<i32>) -> Self {
        let mut next = *self;
        match update {
            LimitUpdate::Min(value) => {
                if let Some(v) = value.or(current) {
                    next.min = v;
                }
            }
            LimitUpdate::Max(value) => {
                if let Some(v) = value.or(current) {
                    next.max = v;
                }
            }
            LimitUpdate::Step(step) => next.step = step,
            LimitUpdate::Sleep(sleep) => next.sleep = sleep,
        }
        next
    }
}

/// A single change to an axis's limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitUpdate {
    /// Set the minimum; `None` captures the current angle.
    Min(Option<i32>),
    /// Set the maximum; `None` captures the current angle.
    Max(Option<i32>),
    /// Set the step size.
    Step(u32),
    /// Set the inter-step pause.
    Sleep(Seconds),
}

impl LimitUpdate {
    /// Whether this update needs the axis's current angle.
    pub fn captures_position(&self) -> bool {
        matches!(self, LimitUpdate::Min(None) | LimitUpdate::Max(None))
    }
}
