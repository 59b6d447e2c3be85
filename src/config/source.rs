//! Configuration sources.
//!
//! # Responsibilities
//! - Describe where a candidate configuration comes from ([`ConfigSource`])
//! - Give environment overrides and parsed property files one lookup
//!   contract ([`PropertySource`])
//! - Turn a source into a [`RawConfig`] without judging its values

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::properties::{Properties, PropertiesError};
use crate::config::schema::{PropertyKey, RawConfig};
use crate::config::validation::ValidationError;

/// Name of the fallback file looked up in the working directory.
pub const DEFAULT_FILE_NAME: &str = "installator.properties";

/// Anything that can answer "what is the value of this key".
pub trait PropertySource {
    fn lookup(&self, key: PropertyKey) -> Option<String>;

    /// Collect the three bootstrap keys into a [`RawConfig`].
    fn raw_config(&self) -> RawConfig {
        let mut raw = RawConfig::new();
        for key in PropertyKey::ALL {
            if let Some(value) = self.lookup(key) {
                raw.set(key, value);
            }
        }
        raw
    }
}

impl PropertySource for Properties {
    fn lookup(&self, key: PropertyKey) -> Option<String> {
        self.get(key.property_name()).map(str::to_owned)
    }
}

/// Process-level overrides, keyed by environment variable name.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    vars: HashMap<String, String>,
}

impl EnvOverrides {
    /// Snapshot the current process environment.
    ///
    /// Variables that are not valid unicode are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl PropertySource for EnvOverrides {
    fn lookup(&self, key: PropertyKey) -> Option<String> {
        self.vars.get(key.env_var()).cloned()
    }
}

/// One place a bootstrap configuration may come from, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Environment overrides.
    Overrides,
    /// File given on the command line.
    ExplicitFile(PathBuf),
    /// [`DEFAULT_FILE_NAME`] in the working directory.
    DefaultFile(PathBuf),
}

impl ConfigSource {
    pub fn default_file(working_dir: &Path) -> Self {
        ConfigSource::DefaultFile(working_dir.join(DEFAULT_FILE_NAME))
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Overrides => None,
            ConfigSource::ExplicitFile(path) | ConfigSource::DefaultFile(path) => Some(path),
        }
    }

    /// How this source spells `key`: an environment variable for
    /// overrides, the property name for files.
    pub fn key_name(&self, key: PropertyKey) -> &'static str {
        match self {
            ConfigSource::Overrides => key.env_var(),
            ConfigSource::ExplicitFile(_) | ConfigSource::DefaultFile(_) => key.property_name(),
        }
    }

    /// Read this source's values.
    ///
    /// A missing file is [`SourceError::Unavailable`]; a file that exists
    /// but cannot be read or parsed is [`SourceError::Unreadable`].
    pub fn load(&self, env: &dyn PropertySource) -> Result<RawConfig, SourceError> {
        let Some(path) = self.path() else {
            return Ok(env.raw_config());
        };

        if !path.exists() {
            return Err(SourceError::Unavailable {
                path: path.to_path_buf(),
            });
        }

        let properties = Properties::read(path).map_err(|source| SourceError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            entries = properties.len(),
            "Property file parsed"
        );

        Ok(properties.raw_config())
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Overrides => write!(f, "environment overrides"),
            ConfigSource::ExplicitFile(path) => write!(f, "given file [{}]", path.display()),
            ConfigSource::DefaultFile(path) => write!(f, "default file [{}]", path.display()),
        }
    }
}

/// Why a single source did not produce a configuration.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("file [{}] does not exist", path.display())]
    Unavailable { path: PathBuf },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("file [{}] exists but could not be read: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: PropertiesError,
    },
}

impl SourceError {
    /// The key whose check failed, if the source was read at all.
    pub fn key(&self) -> Option<PropertyKey> {
        match self {
            SourceError::Invalid(e) => Some(e.key()),
            SourceError::Unavailable { .. } | SourceError::Unreadable { .. } => None,
        }
    }

    /// Fatal errors stop resolution instead of falling through.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SourceError::Unreadable { .. })
    }
}
