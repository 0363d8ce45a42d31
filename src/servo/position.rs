//! Position tracking.
//!
//! Reads the servo's reported angle and exposes it as whole degrees.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use crate::error::{Result, ServoError};

use super::axis::{Axis, ServoAxis};

/// Current angle of `servo`, rounded to the nearest whole degree.
///
/// # Errors
///
/// Returns [`ServoError::AngleUnknown`] if the servo has not been given an
/// angle since power-up.
pub fn current_angle<S: ServoAxis + ?Sized>(axis: Axis, servo: &S) -> Result<i32> {
    servo
        .angle()
        .map(|a| a.round() as i32)
        .ok_or_else(|| ServoError::AngleUnknown(axis).into())
}

/// Stored in place of an unknown value.
const UNKNOWN: i32 = i32::MIN;

/// Last written angle and actuation range of one servo.
///
/// Updated by the axis driver as it moves and readable from any thread
/// without waiting for the move to finish. Clones share the same values.
#[derive(Debug, Clone)]
pub struct AxisReadout {
    inner: Arc<Readings>,
}

#[derive(Debug)]
struct Readings {
    angle: AtomicI32,
    actuation_range: AtomicI32,
}

impl AxisReadout {
    /// A readout starting at `angle` with no actuation range set.
    pub fn new(angle: Option<i32>) -> Self {
        Self {
            inner: Arc::new(Readings {
                angle: AtomicI32::new(angle.unwrap_or(UNKNOWN)),
                actuation_range: AtomicI32::new(UNKNOWN),
            }),
        }
    }

    /// Last angle written, in whole degrees.
    pub fn angle(&self) -> Option<i32> {
        known(self.inner.angle.load(Ordering::Acquire))
    }

    /// Record a written angle.
    pub fn set_angle(&self, degrees: i32) {
        self.inner.angle.store(degrees, Ordering::Release);
    }

    /// Actuation range last configured on the servo.
    pub fn actuation_range(&self) -> Option<i32> {
        known(self.inner.actuation_range.load(Ordering::Acquire))
    }

    /// Record a configured actuation range.
    pub fn set_actuation_range(&self, degrees: i32) {
        self.inner.actuation_range.store(degrees, Ordering::Release);
    }
}

fn known(value: i32) -> Option<i32> {
    (value != UNKNOWN).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct Fixed(Option<f32>);

    impl ServoAxis for Fixed {
        fn angle(&self) -> Option<f32> {
            self.0
        }

        fn set_angle(&mut self, degrees: i32) -> Result<()> {
            self.0 = Some(degrees as f32);
            Ok(())
        }

        fn set_actuation_range(&mut self, _degrees: i32) {}
    }

    #[test]
    fn test_rounds_to_nearest_degree() {
        assert_eq!(current_angle(Axis::Pan, &Fixed(Some(10.459))).unwrap(), 10);
        assert_eq!(current_angle(Axis::Pan, &Fixed(Some(10.5))).unwrap(), 11);
        assert_eq!(current_angle(Axis::Pan, &Fixed(Some(89.7))).unwrap(), 90);
    }

    #[test]
    fn test_unknown_angle() {
        assert!(matches!(
            current_angle(Axis::Tilt, &Fixed(None)),
            Err(Error::Servo(ServoError::AngleUnknown(Axis::Tilt)))
        ));
    }

    #[test]
    fn test_readout_shared_between_clones() {
        let readout = AxisReadout::new(None);
        let reader = readout.clone();
        assert_eq!(reader.angle(), None);
        assert_eq!(reader.actuation_range(), None);

        readout.set_angle(42);
        readout.set_actuation_range(270);

        assert_eq!(reader.angle(), Some(42));
        assert_eq!(reader.actuation_range(), Some(270));
        assert_eq!(AxisReadout::new(Some(-5)).angle(), Some(-5));
    }
}
