//! Servo module for pitilt.
//!
//! Provides the actuator abstraction, a PWM-backed servo, position tracking
//! and a blocking delay provider.

mod axis;
mod delay;
mod position;
mod pwm;

pub use axis::{Axis, ServoAxis};
pub use delay::StdDelay;
pub use position::{current_angle, AxisReadout};
pub use pwm::{
    PwmServo, DEFAULT_ACTUATION_RANGE, DEFAULT_MAX_PULSE_US, DEFAULT_MIN_PULSE_US, PERIOD_US,
};
