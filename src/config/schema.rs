//! Bootstrap configuration schema.
//!
//! The server needs exactly three settings to start. They arrive as loose
//! strings ([`RawConfig`]) from one source at a time and only leave this
//! module as a [`ValidatedConfig`] once every check has passed.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use url::Url;

/// The well-known bootstrap keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// Port the web server listens on.
    Port,
    /// Secondary property file handed to the application.
    PropertyFileLocation,
    /// Base URL of the configuration service.
    ConfServiceUrl,
}

impl PropertyKey {
    /// All keys, in validation order.
    pub const ALL: [PropertyKey; 3] = [
        PropertyKey::Port,
        PropertyKey::PropertyFileLocation,
        PropertyKey::ConfServiceUrl,
    ];

    /// Key name used in property files.
    pub fn property_name(self) -> &'static str {
        match self {
            PropertyKey::Port => "jetty-port",
            PropertyKey::PropertyFileLocation => "property-file-location",
            PropertyKey::ConfServiceUrl => "conf-service-url",
        }
    }

    /// Environment variable used for process-level overrides.
    pub fn env_var(self) -> &'static str {
        match self {
            PropertyKey::Port => "JETTY_PORT",
            PropertyKey::PropertyFileLocation => "PROPERTY_FILE_LOCATION",
            PropertyKey::ConfServiceUrl => "CONF_SERVICE_URL",
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property_name())
    }
}

/// Unvalidated values read from a single source.
///
/// Absent keys stay `None`; an empty string is a present (and probably
/// invalid) value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    values: HashMap<PropertyKey, String>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests.
    pub fn with(mut self, key: PropertyKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: PropertyKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: PropertyKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Keys that have no value, in validation order.
    pub fn missing_keys(&self) -> Vec<PropertyKey> {
        PropertyKey::ALL
            .into_iter()
            .filter(|key| !self.values.contains_key(key))
            .collect()
    }
}

/// A fully checked bootstrap configuration.
///
/// Fields are private; the only way to obtain one is through
/// [`validate`](crate::config::validation::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedConfig {
    port: i32,
    property_file_location: PathBuf,
    conf_service_url: Url,
}

impl ValidatedConfig {
    pub(crate) fn new(port: i32, property_file_location: PathBuf, conf_service_url: Url) -> Self {
        Self {
            port,
            property_file_location,
            conf_service_url,
        }
    }

    /// The configured port. Any integer passes validation, including zero
    /// and negative values; the server rejects those when binding.
    pub fn port(&self) -> i32 {
        self.port
    }

    pub fn property_file_location(&self) -> &PathBuf {
        &self.property_file_location
    }

    pub fn conf_service_url(&self) -> &Url {
        &self.conf_service_url
    }
}
