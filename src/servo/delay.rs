//! Blocking delay provider for hosted targets.

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// [`DelayNs`] backed by [`std::thread::sleep`].
///
/// Pauses the calling thread only, so moves on other axes keep running.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}
