//! Configuration module for pitilt.
//!
//! Two documents live here: the read-only process configuration (TOML) and
//! the managed state of limits and locations (JSON, see [`crate::store`]).

mod app;
mod limits;
mod loader;
mod state;
pub mod units;
mod validation;

pub use app::{AppConfig, AuthMethod, MqttConfig, ServerConfig};
pub use limits::{AxisLimits, LimitUpdate, DEFAULT_SLEEP, DEFAULT_STEP};
pub use loader::{
    config_file_path, load_config, parse_config, state_file_path, CONFIG_FILE_ENV,
    DEFAULT_CONFIG_FILE, DEFAULT_STATE_FILE, STATE_FILE_ENV,
};
pub use state::{AppState, AxisLimitsPair};
pub use units::Seconds;
pub use validation::{validate_config, validate_state};
