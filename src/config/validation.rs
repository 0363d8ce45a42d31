//! Configuration and state validation.

use std::path::Path;

use crate::error::{ConfigError, Result, StateError};
use crate::servo::Axis;

use super::{AppConfig, AppState, AuthMethod, MqttConfig};

/// Validate a process configuration.
///
/// Checks:
/// - An API password is configured
/// - When MQTT is enabled, the broker host and the credentials for the
///   selected auth method are present
/// - Certificate files referenced for TLS exist
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.pitilt.password.is_none() {
        return Err(ConfigError::FieldMissing("pitilt.password").into());
    }

    if config.mqtt.enabled {
        validate_mqtt(&config.mqtt)?;
    }

    Ok(())
}

fn validate_mqtt(mqtt: &MqttConfig) -> Result<()> {
    if mqtt.host.is_none() {
        return Err(ConfigError::FieldMissing("mqtt.host").into());
    }

    match (mqtt.tls_enabled, mqtt.auth_method) {
        (true, AuthMethod::Mtls) => {
            require_file("mqtt.cacert_path", mqtt.cacert_path.as_deref())?;
            require_file("mqtt.client_cert_path", mqtt.client_cert_path.as_deref())?;
            require_file("mqtt.client_key_path", mqtt.client_key_path.as_deref())?;
        }
        (true, AuthMethod::Password) => {
            // The CA bundle is optional for server-only TLS but must exist if named.
            if let Some(path) = mqtt.cacert_path.as_deref() {
                require_file("mqtt.cacert_path", Some(path))?;
            }
            require_password_auth(mqtt)?;
        }
        (false, AuthMethod::Password) => require_password_auth(mqtt)?,
        (false, AuthMethod::Mtls) => {
            return Err(ConfigError::FieldMissing("mqtt.tls_enabled").into());
        }
    }

    Ok(())
}

fn require_password_auth(mqtt: &MqttConfig) -> Result<()> {
    if mqtt.username.is_none() {
        return Err(ConfigError::FieldMissing("mqtt.username").into());
    }
    if mqtt.password.is_none() {
        return Err(ConfigError::FieldMissing("mqtt.password").into());
    }
    Ok(())
}

fn require_file(field: &'static str, path: Option<&Path>) -> Result<()> {
    match path {
        None => Err(ConfigError::FieldMissing(field).into()),
        Some(p) if !p.exists() => Err(ConfigError::ReferencedFileMissing {
            field,
            path: p.display().to_string(),
        }
        .into()),
        Some(_) => Ok(()),
    }
}

/// Validate a loaded state document.
///
/// Checks:
/// - Both axes satisfy `min <= max`, `step >= 1` and a non-negative sleep
/// - The `home` location exists
pub fn validate_state(state: &AppState) -> Result<()> {
    for axis in Axis::ALL {
        let limits = state.limits(axis);
        if !limits.is_valid() {
            return Err(StateError::Invalid(format!(
                "{axis} limits min={} max={} step={} sleep={}",
                limits.min, limits.max, limits.step, limits.sleep.0
            ))
            .into());
        }
    }

    if state.home().is_none() {
        return Err(StateError::HomeMissing.into());
    }

    Ok(())
}
