//! Coordinator module for pitilt.
//!
//! Provides the thread-safe entry point shared by the HTTP and MQTT ingress
//! paths, MQTT command decoding and re-registration signalling.

mod command;
mod notify;
mod system;

pub use command::{Command, Nudge, COMMAND_LOCATION, COMMAND_MOVE_REL, NUDGE_DEGREES};
pub use notify::{reregister_channel, ReregisterListener, ReregisterSignal, DEFAULT_DEBOUNCE};
pub use system::{Coordinator, LocationStatus};
