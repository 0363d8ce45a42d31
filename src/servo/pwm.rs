//! Hobby servo on an embedded-hal PWM channel.
//!
//! Generic over any [`SetDutyCycle`] running at 50 Hz, such as a PCA9685
//! output or a hardware PWM slice.

use embedded_hal::pwm::{Error as _, SetDutyCycle};

use crate::error::{Result, ServoError};

use super::axis::{Axis, ServoAxis};

/// PWM period at the standard 50 Hz servo frequency.
pub const PERIOD_US: u32 = 20_000;

/// Pulse width at 0 degrees.
pub const DEFAULT_MIN_PULSE_US: u32 = 750;

/// Pulse width at the end of the actuation range.
pub const DEFAULT_MAX_PULSE_US: u32 = 2_250;

/// Default actuation range in degrees.
pub const DEFAULT_ACTUATION_RANGE: i32 = 180;

/// Servo driven by a single PWM channel.
pub struct PwmServo<P: SetDutyCycle> {
    /// PWM output.
    channel: P,

    /// Axis name for errors and logs.
    axis: Axis,

    /// Angle reached at `max_pulse_us`.
    actuation_range: i32,

    /// Pulse width range in microseconds.
    min_pulse_us: u32,
    max_pulse_us: u32,

    /// Last commanded angle. `None` until the first write.
    angle: Option<f32>,
}

impl<P: SetDutyCycle> PwmServo<P> {
    /// Create a servo with the default pulse range and a 180 degree actuation range.
    pub fn new(axis: Axis, channel: P) -> Self {
        Self {
            channel,
            axis,
            actuation_range: DEFAULT_ACTUATION_RANGE,
            min_pulse_us: DEFAULT_MIN_PULSE_US,
            max_pulse_us: DEFAULT_MAX_PULSE_US,
            angle: None,
        }
    }

    /// Override the pulse width range.
    pub fn with_pulse_range(mut self, min_us: u32, max_us: u32) -> Self {
        self.min_pulse_us = min_us;
        self.max_pulse_us = max_us;
        self
    }

    /// The configured actuation range.
    #[inline]
    pub fn actuation_range(&self) -> i32 {
        self.actuation_range
    }

    /// Stop driving the servo. Its angle becomes unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the PWM channel fails.
    pub fn release(&mut self) -> Result<()> {
        let axis = self.axis;
        self.channel
            .set_duty_cycle_fully_off()
            .map_err(|e| ServoError::Pwm { axis, kind: e.kind() })?;
        self.angle = None;
        Ok(())
    }

    /// Release the PWM channel.
    pub fn into_inner(self) -> P {
        self.channel
    }

    /// Pulse width for `degrees`, in microseconds.
    fn pulse_us(&self, degrees: i32) -> u64 {
        let min = u64::from(self.min_pulse_us);
        let span = u64::from(self.max_pulse_us.saturating_sub(self.min_pulse_us));
        if self.actuation_range <= 0 {
            return min;
        }
        let degrees = degrees.clamp(0, self.actuation_range) as u64;
        min + span * degrees / self.actuation_range as u64
    }

    /// Duty cycle value for `degrees` on this channel, at most fully on.
    fn duty_for(&self, degrees: i32) -> u16 {
        let max = self.channel.max_duty_cycle();
        let duty = self.pulse_us(degrees) * u64::from(max) / u64::from(PERIOD_US);
        duty.min(u64::from(max)) as u16
    }
}

impl<P: SetDutyCycle> ServoAxis for PwmServo<P> {
    fn angle(&self) -> Option<f32> {
        self.angle
    }

    fn set_angle(&mut self, degrees: i32) -> Result<()> {
        if degrees < 0 || degrees > self.actuation_range {
            return Err(ServoError::OutOfRange {
                axis: self.axis,
                angle: degrees,
                range: self.actuation_range,
            }
            .into());
        }

        let duty = self.duty_for(degrees);
        let axis = self.axis;
        self.channel
            .set_duty_cycle(duty)
            .map_err(|e| ServoError::Pwm { axis, kind: e.kind() })?;
        self.angle = Some(degrees as f32);
        Ok(())
    }

    fn set_actuation_range(&mut self, degrees: i32) {
        self.actuation_range = degrees;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::ErrorType;

    use crate::error::Error;

    /// 16-bit channel that remembers the last duty written.
    #[derive(Default)]
    struct Channel {
        duty: Option<u16>,
    }

    impl ErrorType for Channel {
        type Error = Infallible;
    }

    impl SetDutyCycle for Channel {
        fn max_duty_cycle(&self) -> u16 {
            u16::MAX
        }

        fn set_duty_cycle(&mut self, duty: u16) -> core::result::Result<(), Infallible> {
            self.duty = Some(duty);
            Ok(())
        }
    }

    #[test]
    fn test_angle_unknown_until_first_write() {
        let mut servo = PwmServo::new(Axis::Pan, Channel::default());
        assert_eq!(servo.angle(), None);

        servo.set_angle(90).unwrap();
        assert_eq!(servo.angle(), Some(90.0));
    }

    #[test]
    fn test_pulse_mapping() {
        let mut servo = PwmServo::new(Axis::Pan, Channel::default());
        servo.set_actuation_range(270);

        assert_eq!(servo.pulse_us(0), 750);
        assert_eq!(servo.pulse_us(135), 1_500);
        assert_eq!(servo.pulse_us(270), 2_250);

        servo.set_angle(0).unwrap();
        // 750 / 20000 of a 16-bit period
        assert_eq!(servo.into_inner().duty, Some(2_457));
    }

    #[test]
    fn test_large_ranges_do_not_overflow() {
        let mut servo = PwmServo::new(Axis::Pan, Channel::default());
        servo.set_actuation_range(i32::MAX);

        assert_eq!(servo.pulse_us(i32::MAX), 2_250);
        servo.set_angle(i32::MAX).unwrap();
        assert_eq!(servo.angle(), Some(i32::MAX as f32));
    }

    #[test]
    fn test_duty_clamped_to_full_period() {
        let mut servo =
            PwmServo::new(Axis::Tilt, Channel::default()).with_pulse_range(500, 4_000_000_000);

        servo.set_angle(180).unwrap();
        assert_eq!(servo.into_inner().duty, Some(u16::MAX));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut servo = PwmServo::new(Axis::Tilt, Channel::default());

        assert!(matches!(
            servo.set_angle(181),
            Err(Error::Servo(ServoError::OutOfRange { range: 180, .. }))
        ));
        assert!(servo.set_angle(-1).is_err());
        assert_eq!(servo.angle(), None);
    }

    #[test]
    fn test_release_forgets_angle() {
        let mut servo = PwmServo::new(Axis::Pan, Channel::default());
        servo.set_angle(45).unwrap();
        servo.release().unwrap();

        assert_eq!(servo.angle(), None);
        assert_eq!(servo.into_inner().duty, Some(0));
    }
}
