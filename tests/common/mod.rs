//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use embedded_hal_mock::eh1::delay::NoopDelay;
use pitilt::servo::{Axis, ServoAxis};
use pitilt::{AppState, AxisDriver, Coordinator, MemoryStateStore, Result};

/// Servo that records every angle written.
///
/// Clones share the same record, so a test can keep one clone while the
/// coordinator owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingServo {
    inner: Arc<Mutex<Record>>,
}

#[derive(Debug, Default)]
struct Record {
    angle: Option<f32>,
    writes: Vec<i32>,
    actuation_range: Option<i32>,
}

impl RecordingServo {
    /// A servo that reports `angle` as its current position.
    pub fn at(angle: i32) -> Self {
        let servo = Self::default();
        servo.inner.lock().unwrap().angle = Some(angle as f32);
        servo
    }

    /// A servo that has lost its position (cold start).
    pub fn cold() -> Self {
        Self::default()
    }

    /// Every angle written so far, in order.
    pub fn writes(&self) -> Vec<i32> {
        self.inner.lock().unwrap().writes.clone()
    }

    /// Forget recorded writes.
    pub fn clear(&self) {
        self.inner.lock().unwrap().writes.clear();
    }

    /// Last actuation range configured.
    pub fn actuation_range(&self) -> Option<i32> {
        self.inner.lock().unwrap().actuation_range
    }
}

impl ServoAxis for RecordingServo {
    fn angle(&self) -> Option<f32> {
        self.inner.lock().unwrap().angle
    }

    fn set_angle(&mut self, degrees: i32) -> Result<()> {
        let mut record = self.inner.lock().unwrap();
        record.writes.push(degrees);
        record.angle = Some(degrees as f32);
        Ok(())
    }

    fn set_actuation_range(&mut self, degrees: i32) {
        self.inner.lock().unwrap().actuation_range = Some(degrees);
    }
}

pub type Head = Coordinator<RecordingServo, NoopDelay>;

/// A coordinator plus handles for inspecting its collaborators.
pub struct Rig {
    pub head: Head,
    pub pan: RecordingServo,
    pub tilt: RecordingServo,
    pub store: MemoryStateStore,
}

/// Build a coordinator over `state` with servos at the given positions.
pub fn rig(state: AppState, pan: RecordingServo, tilt: RecordingServo) -> Rig {
    let store = MemoryStateStore::new();
    let head = Coordinator::new(
        state,
        Box::new(store.clone()),
        AxisDriver::new(Axis::Pan, pan.clone(), NoopDelay::new()),
        AxisDriver::new(Axis::Tilt, tilt.clone(), NoopDelay::new()),
    );
    Rig {
        head,
        pan,
        tilt,
        store,
    }
}

/// Default state with zero sleep, servos at `pan`/`tilt`.
pub fn rig_at(pan: i32, tilt: i32) -> Rig {
    let mut state = AppState::default();
    state.position.pan.sleep = pitilt::Seconds(0.0);
    state.position.tilt.sleep = pitilt::Seconds(0.0);
    rig(state, RecordingServo::at(pan), RecordingServo::at(tilt))
}
