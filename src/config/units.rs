//! Unit types for physical quantities.

use core::time::Duration;

use serde::{Deserialize, Serialize};

/// A pause length in seconds.
///
/// Stored as a float so the persisted document stays human-editable
/// (`"sleep": 0.05`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seconds(pub f32);

impl Seconds {
    /// Create a new Seconds value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Whether this is a usable pause (finite and not negative).
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }

    /// Convert to whole microseconds for `DelayNs::delay_us`.
    ///
    /// Negative or non-finite values yield zero; very long pauses saturate.
    pub fn as_micros(self) -> u32 {
        if !self.is_valid() {
            return 0;
        }
        let us = (self.0 as f64 * 1_000_000.0).round();
        if us >= u32::MAX as f64 {
            u32::MAX
        } else {
            us as u32
        }
    }

    /// Convert to a [`Duration`].
    pub fn to_duration(self) -> Duration {
        Duration::from_micros(self.as_micros() as u64)
    }
}

impl From<Duration> for Seconds {
    fn from(d: Duration) -> Self {
        Self(d.as_secs_f32())
    }
}
