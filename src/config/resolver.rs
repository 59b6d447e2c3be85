//! Bootstrap configuration resolution.
//!
//! # Responsibilities
//! - Decide between help and resolution from the startup arguments
//! - Try sources in priority order: overrides, explicit file, default file
//! - Stop at the first source that validates
//!
//! # Design Decisions
//! - Per-source failures are logged and fall through; only an unreadable
//!   file or a usage error escapes as [`ResolveError`]
//! - Nothing is cached: every call re-reads files and re-checks paths

use std::path::Path;

use thiserror::Error;

use crate::cli::BootstrapArgs;
use crate::config::schema::ValidatedConfig;
use crate::config::source::{ConfigSource, PropertySource, SourceError};
use crate::config::validation::validate;

/// Outcome of a resolution attempt.
#[derive(Debug)]
pub enum Resolution {
    /// `--help` was requested; no source was consulted.
    Help,
    /// A source produced a valid configuration.
    Resolved {
        source: ConfigSource,
        config: ValidatedConfig,
    },
    /// Every source was tried and rejected, in order.
    NotFound {
        rejections: Vec<(ConfigSource, SourceError)>,
    },
}

impl Resolution {
    pub fn config(&self) -> Option<&ValidatedConfig> {
        match self {
            Resolution::Resolved { config, .. } => Some(config),
            _ => None,
        }
    }
}

/// Conditions that stop resolution outright.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("--help cannot be combined with a configuration file argument")]
    HelpWithArguments,

    #[error("configuration {source}")]
    Unreadable {
        #[from]
        source: SourceError,
    },
}

impl ResolveError {
    /// Usage errors are answered with the help banner.
    pub fn is_usage(&self) -> bool {
        matches!(self, ResolveError::HelpWithArguments)
    }
}

/// Tries configuration sources against one environment and working directory.
pub struct ConfigResolver<'a> {
    env: &'a dyn PropertySource,
    working_dir: &'a Path,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(env: &'a dyn PropertySource, working_dir: &'a Path) -> Self {
        Self { env, working_dir }
    }

    /// Sources to try for `args`, highest priority first.
    pub fn sources(&self, args: &BootstrapArgs) -> Vec<ConfigSource> {
        let mut sources = vec![ConfigSource::Overrides];
        if let Some(path) = &args.config_file {
            sources.push(ConfigSource::ExplicitFile(self.working_dir.join(path)));
        }
        sources.push(ConfigSource::default_file(self.working_dir));
        sources
    }

    pub fn resolve(&self, args: &BootstrapArgs) -> Result<Resolution, ResolveError> {
        if args.help {
            if args.config_file.is_some() {
                return Err(ResolveError::HelpWithArguments);
            }
            return Ok(Resolution::Help);
        }

        let mut rejections = Vec::new();
        for source in self.sources(args) {
            tracing::info!(source = %source, "Trying to get configuration");

            match self.try_source(&source) {
                Ok(config) => {
                    tracing::info!(
                        source = %source,
                        port = config.port(),
                        property_file_location = %config.property_file_location().display(),
                        conf_service_url = %config.conf_service_url(),
                        "Got valid configuration"
                    );
                    return Ok(Resolution::Resolved { source, config });
                }
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    let key = e.key().map(|key| source.key_name(key)).unwrap_or_default();
                    tracing::warn!(
                        source = %source,
                        key,
                        reason = %e,
                        "Could not get valid configuration"
                    );
                    rejections.push((source, e));
                }
            }
        }

        Ok(Resolution::NotFound { rejections })
    }

    fn try_source(&self, source: &ConfigSource) -> Result<ValidatedConfig, SourceError> {
        let raw = source.load(self.env)?;
        Ok(validate(&raw, self.working_dir)?)
    }
}

/// Resolve the bootstrap configuration once.
pub fn resolve(
    args: &BootstrapArgs,
    env: &dyn PropertySource,
    working_dir: &Path,
) -> Result<Resolution, ResolveError> {
    ConfigResolver::new(env, working_dir).resolve(args)
}
