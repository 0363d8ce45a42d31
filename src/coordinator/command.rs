//! Commands arriving over MQTT.
//!
//! The wire payload is `{"command": "...", "argument": "..."}`. It is decoded
//! once at the boundary into [`Command`]; anything unrecognized is rejected.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::servo::Axis;

/// Wire value of the relative-move command.
pub const COMMAND_MOVE_REL: &str = "move_rel";

/// Wire value of the go-to-location command.
pub const COMMAND_LOCATION: &str = "location";

/// Degrees moved by one nudge.
pub const NUDGE_DEGREES: i32 = 2;

/// A fixed relative move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    /// Pan by `+NUDGE_DEGREES`.
    Left,
    /// Pan by `-NUDGE_DEGREES`.
    Right,
    /// Tilt by `-NUDGE_DEGREES`.
    Up,
    /// Tilt by `+NUDGE_DEGREES`.
    Down,
}

impl Nudge {
    /// All nudges, in the order they are announced.
    pub const ALL: [Nudge; 4] = [Nudge::Left, Nudge::Right, Nudge::Up, Nudge::Down];

    /// Axis moved by this nudge.
    pub fn axis(self) -> Axis {
        match self {
            Nudge::Left | Nudge::Right => Axis::Pan,
            Nudge::Up | Nudge::Down => Axis::Tilt,
        }
    }

    /// Signed angle change. Tilt is inverted: down is positive.
    pub fn delta(self) -> i32 {
        match self {
            Nudge::Left | Nudge::Down => NUDGE_DEGREES,
            Nudge::Right | Nudge::Up => -NUDGE_DEGREES,
        }
    }

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Nudge::Left => "left",
            Nudge::Right => "right",
            Nudge::Up => "up",
            Nudge::Down => "down",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.as_str() == s)
    }
}

/// A decoded command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Relative move by a fixed amount.
    Nudge(Nudge),
    /// Move to a saved location.
    Location(String),
}

#[derive(Deserialize)]
struct WireCommand {
    command: String,
    #[serde(default)]
    argument: String,
}

impl Command {
    /// Decode a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCommand`] for invalid JSON, an unrecognized
    /// command or an invalid argument.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let wire: WireCommand = serde_json::from_slice(payload)
            .map_err(|e| Error::UnknownCommand(format!("invalid JSON: {e}")))?;

        match wire.command.as_str() {
            COMMAND_MOVE_REL => Nudge::parse(&wire.argument).map(Command::Nudge).ok_or_else(|| {
                Error::UnknownCommand(format!("{COMMAND_MOVE_REL} {}", wire.argument))
            }),
            COMMAND_LOCATION if !wire.argument.is_empty() => Ok(Command::Location(wire.argument)),
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }

    /// Encode as the JSON payload that [`Command::decode`] accepts.
    ///
    /// Used by the MQTT collaborator as the button press payload.
    pub fn to_payload(&self) -> String {
        let (command, argument) = match self {
            Command::Nudge(n) => (COMMAND_MOVE_REL, n.as_str()),
            Command::Location(name) => (COMMAND_LOCATION, name.as_str()),
        };
        serde_json::json!({ "command": command, "argument": argument }).to_string()
    }
}
