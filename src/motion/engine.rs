//! Motion engine: clamped, stepped moves on a single axis.

use embedded_hal::delay::DelayNs;
use tracing::{debug, info};

use crate::config::AxisLimits;
use crate::error::Result;
use crate::servo::{current_angle, Axis, AxisReadout, ServoAxis};

use super::plan::StepPlan;

/// A servo together with the delay provider that paces its moves.
///
/// The only type that commands servo angles.
pub struct AxisDriver<S, D> {
    /// Which axis this driver moves.
    axis: Axis,

    /// Servo output.
    servo: S,

    /// Delay provider for inter-step pauses.
    delay: D,

    /// Published angle and range, readable while a move is running.
    readout: AxisReadout,
}

impl<S, D> AxisDriver<S, D>
where
    S: ServoAxis,
    D: DelayNs,
{
    /// Create a new driver.
    pub fn new(axis: Axis, servo: S, delay: D) -> Self {
        let readout = AxisReadout::new(current_angle(axis, &servo).ok());
        Self {
            axis,
            servo,
            delay,
            readout,
        }
    }

    /// The axis this driver moves.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Borrow the servo.
    #[inline]
    pub fn servo(&self) -> &S {
        &self.servo
    }

    /// Current angle in whole degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if the servo angle is unknown.
    pub fn current_angle(&self) -> Result<i32> {
        current_angle(self.axis, &self.servo)
    }

    /// Whether the servo reports any angle at all.
    pub fn has_angle(&self) -> bool {
        self.servo.angle().is_some()
    }

    /// Handle on the angle and range this driver publishes.
    pub fn readout(&self) -> AxisReadout {
        self.readout.clone()
    }

    /// Set the servo's actuation range.
    pub fn set_actuation_range(&mut self, degrees: i32) {
        self.servo.set_actuation_range(degrees);
        self.readout.set_actuation_range(degrees);
    }

    /// Command an angle directly, without clamping or stepping.
    ///
    /// Only for initialising a servo whose physical position is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the servo rejects the angle.
    pub fn set_initial_angle(&mut self, degrees: i32) -> Result<()> {
        info!(axis = %self.axis, degrees, "init servo angle");
        self.servo.set_angle(degrees)?;
        self.readout.set_angle(degrees);
        Ok(())
    }

    /// Move to `target`, clamped to `limits`, in `limits.step` increments.
    ///
    /// Blocks for `limits.sleep` after every angle written. Returns the
    /// clamped target.
    ///
    /// # Errors
    ///
    /// Returns an error if the current angle is unknown or the servo fails.
    /// A failure mid-move leaves the servo at the last angle written.
    pub fn move_to(&mut self, target: i32, limits: &AxisLimits) -> Result<i32> {
        let current = self.current_angle()?;
        let want = limits.clamp(target);
        let pause_us = limits.sleep.as_micros();

        info!(
            axis = %self.axis,
            current,
            want,
            step = limits.step,
            "move servo"
        );

        for angle in StepPlan::new(current, want, limits.step) {
            debug!(axis = %self.axis, angle, "servo angle set");
            self.servo.set_angle(angle)?;
            self.readout.set_angle(angle);
            if pause_us > 0 {
                self.delay.delay_us(pause_us);
            }
        }

        Ok(want)
    }
}
