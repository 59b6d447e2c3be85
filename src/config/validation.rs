//! Bootstrap configuration validation.
//!
//! # Responsibilities
//! - Require all three keys before looking at any value
//! - Check values in a fixed order: port, property file, service URL
//! - Produce a [`ValidatedConfig`] or the first failing check
//!
//! # Design Decisions
//! - Port only has to parse as an `i32`; zero and negative values pass here
//! - The property file check is an existence check at call time, nothing is cached
//! - URLs are parsed, never dereferenced, and must use a scheme from
//!   [`SUPPORTED_URL_SCHEMES`]

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::config::schema::{PropertyKey, RawConfig, ValidatedConfig};

/// Schemes accepted for the configuration service URL.
///
/// Anything else is almost always a missing `http://`: `localhost:9999`
/// parses as scheme `localhost` with path `9999`.
pub const SUPPORTED_URL_SCHEMES: [&str; 5] = ["http", "https", "ftp", "file", "jar"];

/// A failed check on a [`RawConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing property: {0}")]
    MissingProperty(PropertyKey),

    #[error("invalid port value [{0}]")]
    InvalidPort(String),

    #[error("invalid file location. File [{}] does NOT exist", .0.display())]
    PropertyFileNotFound(PathBuf),

    #[error("invalid url value. URL [{value}] is invalid: {reason}")]
    InvalidUrl { value: String, reason: String },
}

impl ValidationError {
    /// The key whose check failed.
    pub fn key(&self) -> PropertyKey {
        match self {
            ValidationError::MissingProperty(key) => *key,
            ValidationError::InvalidPort(_) => PropertyKey::Port,
            ValidationError::PropertyFileNotFound(_) => PropertyKey::PropertyFileLocation,
            ValidationError::InvalidUrl { .. } => PropertyKey::ConfServiceUrl,
        }
    }
}

/// Validate a raw configuration.
///
/// Relative property file paths are resolved against `working_dir`.
pub fn validate(raw: &RawConfig, working_dir: &Path) -> Result<ValidatedConfig, ValidationError> {
    if let Some(key) = raw.missing_keys().into_iter().next() {
        return Err(ValidationError::MissingProperty(key));
    }

    let port_value = required(raw, PropertyKey::Port)?;
    let port: i32 = port_value
        .parse()
        .map_err(|_| ValidationError::InvalidPort(port_value.to_string()))?;

    let location = PathBuf::from(required(raw, PropertyKey::PropertyFileLocation)?);
    // An empty location would resolve to the working directory itself.
    if location.as_os_str().is_empty() || !working_dir.join(&location).exists() {
        return Err(ValidationError::PropertyFileNotFound(location));
    }

    let url_value = required(raw, PropertyKey::ConfServiceUrl)?;
    let url = Url::parse(url_value).map_err(|e| ValidationError::InvalidUrl {
        value: url_value.to_string(),
        reason: e.to_string(),
    })?;
    if !SUPPORTED_URL_SCHEMES.contains(&url.scheme()) {
        return Err(ValidationError::InvalidUrl {
            value: url_value.to_string(),
            reason: format!("unknown protocol: {}", url.scheme()),
        });
    }

    Ok(ValidatedConfig::new(port, location, url))
}

fn required(raw: &RawConfig, key: PropertyKey) -> Result<&str, ValidationError> {
    raw.get(key).ok_or(ValidationError::MissingProperty(key))
}
