//! Process configuration from TOML.

use std::path::PathBuf;

use serde::Deserialize;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP API settings.
    pub pitilt: ServerConfig,

    /// MQTT integration settings.
    #[serde(default)]
    pub mqtt: MqttConfig,
}

/// HTTP API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Basic-auth username.
    #[serde(default = "default_username")]
    pub username: String,

    /// Basic-auth password. Required.
    #[serde(default)]
    pub password: Option<String>,

    /// Listen address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable debug logging.
    #[serde(default)]
    pub debug: bool,
}

fn default_username() -> String {
    "pitilt".into()
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

impl ServerConfig {
    /// Compare supplied credentials against the configured ones.
    ///
    /// Runs in time independent of where the inputs first differ. Always
    /// false when no password is configured.
    pub fn check_credentials(&self, username: &str, password: &str) -> bool {
        let Some(expected) = self.password.as_deref() else {
            return false;
        };
        let user_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let pass_ok = constant_time_eq(password.as_bytes(), expected.as_bytes());
        user_ok & pass_ok
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// How the MQTT client authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Username and password.
    #[default]
    Password,
    /// Mutual TLS with a client certificate.
    Mtls,
}

/// MQTT integration settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MqttConfig {
    /// Whether the MQTT integration runs at all.
    #[serde(default)]
    pub enabled: bool,

    /// Connect over TLS.
    #[serde(default)]
    pub tls_enabled: bool,

    /// Authentication method.
    #[serde(default)]
    pub auth_method: AuthMethod,

    /// Broker host.
    #[serde(default)]
    pub host: Option<String>,

    /// Broker port.
    #[serde(default)]
    pub port: Option<u16>,

    /// Password-auth username.
    #[serde(default)]
    pub username: Option<String>,

    /// Password-auth password.
    #[serde(default)]
    pub password: Option<String>,

    /// CA bundle for verifying the broker.
    #[serde(default)]
    pub cacert_path: Option<PathBuf>,

    /// Client certificate (mTLS).
    #[serde(default)]
    pub client_cert_path: Option<PathBuf>,

    /// Client private key (mTLS).
    #[serde(default)]
    pub client_key_path: Option<PathBuf>,

    /// Passphrase for `client_key_path`.
    #[serde(default)]
    pub keyfile_password: String,

    /// Transport, `tcp` or `websockets`.
    #[serde(default = "default_transport")]
    pub transport: String,

    /// Client id, also used as the device id in discovery.
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Discovery prefix of the home-automation hub.
    #[serde(default = "default_ha_topic")]
    pub ha_device_base_topic: String,

    /// Prefix for the command topic.
    #[serde(default = "default_command_topic")]
    pub command_base_topic: String,
}

fn default_transport() -> String {
    "tcp".into()
}

fn default_client_id() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "pitilt".into())
}

fn default_ha_topic() -> String {
    "homeassistant".into()
}

fn default_command_topic() -> String {
    "pitilt".into()
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tls_enabled: false,
            auth_method: AuthMethod::default(),
            host: None,
            port: None,
            username: None,
            password: None,
            cacert_path: None,
            client_cert_path: None,
            client_key_path: None,
            keyfile_password: String::new(),
            transport: default_transport(),
            client_id: default_client_id(),
            ha_device_base_topic: default_ha_topic(),
            command_base_topic: default_command_topic(),
        }
    }
}

impl MqttConfig {
    /// Topic this device receives commands on.
    pub fn command_topic(&self) -> String {
        format!("{}/{}/command", self.command_base_topic, self.client_id)
    }
}
