//! Axis identity and the actuator abstraction.

use core::fmt;

use crate::error::Result;

/// One of the two independently driven axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal rotation.
    Pan,
    /// Vertical rotation. Positive angles point down.
    Tilt,
}

impl Axis {
    /// Both axes, in the order composite moves visit them.
    pub const ALL: [Axis; 2] = [Axis::Pan, Axis::Tilt];

    /// Lowercase name used in logs, config keys and the state document.
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Pan => "pan",
            Axis::Tilt => "tilt",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positional servo.
///
/// Implementations report the last commanded angle, not a measured one.
pub trait ServoAxis {
    /// Current angle in degrees, or `None` if unknown since power-up.
    fn angle(&self) -> Option<f32>;

    /// Command the servo to `degrees`.
    ///
    /// # Errors
    ///
    /// Returns an error if the angle is outside the actuation range or the
    /// underlying driver fails.
    fn set_angle(&mut self, degrees: i32) -> Result<()>;

    /// Set the angle that corresponds to the maximum pulse width.
    fn set_actuation_range(&mut self, degrees: i32);
}
