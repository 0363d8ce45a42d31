//! # pitilt
//!
//! Pan/tilt servo motion control with stepped, limit-clamped moves and
//! named locations, shared safely between HTTP and MQTT ingress.
//!
//! ## Features
//!
//! - **Clamped moves**: every target is constrained to the axis limits in force
//! - **Stepped motion**: moves advance in `step`-degree increments with a pause
//!   after each, always finishing exactly on the target
//! - **Named locations**: save the current pan/tilt and return to it later
//! - **embedded-hal 1.0**: servos on any `SetDutyCycle` channel, pacing via `DelayNs`
//! - **Thread-safe coordinator**: one lock for state, one per axis
//! - **Debounced re-registration**: state changes wake a worker that
//!   republishes discovery metadata once per burst
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pitilt::{AxisDriver, Coordinator, JsonStateStore, PwmServo, StdDelay};
//! use pitilt::servo::Axis;
//!
//! let pan = AxisDriver::new(Axis::Pan, PwmServo::new(Axis::Pan, pan_channel), StdDelay);
//! let tilt = AxisDriver::new(Axis::Tilt, PwmServo::new(Axis::Tilt, tilt_channel), StdDelay);
//!
//! let store = Box::new(JsonStateStore::new(pitilt::config::state_file_path()));
//! let head = Arc::new(Coordinator::open(store, pan, tilt)?);
//! head.home_servos()?;
//!
//! head.move_axis(Axis::Pan, 90, false)?;
//! head.save_location("door")?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod config;
pub mod coordinator;
pub mod error;
pub mod location;
pub mod logging;
pub mod motion;
pub mod servo;
pub mod store;

// Re-exports for ergonomic API
pub use config::{load_config, AppConfig, AppState, AxisLimits, LimitUpdate, Seconds};
pub use coordinator::{Command, Coordinator, LocationStatus, Nudge, ReregisterSignal};
pub use error::{Error, ErrorKind, Result};
pub use location::{Location, LocationRegistry};
pub use motion::{AxisDriver, StepPlan};
pub use servo::{Axis, PwmServo, ServoAxis, StdDelay};
pub use store::{JsonStateStore, MemoryStateStore, StateStore};
