//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the bootstrap configuration exactly once
//! - Map every non-serving outcome to user-facing output and an exit status
//! - Hand the validated configuration to the web server and block on it
//!
//! # Exit statuses
//! - `0`: help was requested, or the server stopped cleanly
//! - `1`: no valid configuration, unreadable configuration file, or server failure
//! - `2`: usage error

use std::path::Path;
use std::process::ExitCode;

use crate::cli::{print_help, BootstrapArgs};
use crate::config::{resolve, PropertySource, Resolution, ValidatedConfig};
use crate::http::{ServerError, WebServer};
use crate::lifecycle::{signals, Shutdown};

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

/// What the process does after resolution.
#[derive(Debug)]
pub enum Startup {
    /// Terminate with this status without starting the server.
    Exit(u8),
    /// Start the server with this configuration.
    Serve(ValidatedConfig),
}

/// Resolve the configuration and decide how startup continues.
///
/// Prints the help banner whenever the process is about to exit without
/// serving, except after a fatal I/O error.
pub fn prepare(args: &BootstrapArgs, env: &dyn PropertySource, working_dir: &Path) -> Startup {
    let resolution = match resolve(args, env, working_dir) {
        Ok(resolution) => resolution,
        Err(e) if e.is_usage() => {
            tracing::error!(error = %e, "Invalid arguments");
            print_help();
            return Startup::Exit(EXIT_USAGE);
        }
        Err(e) => {
            tracing::error!(error = %e, "Bootstrap aborted");
            return Startup::Exit(EXIT_FAILURE);
        }
    };

    match resolution {
        Resolution::Help => {
            print_help();
            Startup::Exit(0)
        }
        Resolution::NotFound { rejections } => {
            tracing::error!(
                attempts = rejections.len(),
                "Could not determine valid configuration. Giving up."
            );
            print_help();
            Startup::Exit(EXIT_FAILURE)
        }
        Resolution::Resolved { config, .. } => Startup::Serve(config),
    }
}

/// Start the web server and block until it stops.
pub async fn serve(config: ValidatedConfig) -> Result<(), ServerError> {
    let server = WebServer::new(config);
    let listener = server.bind().await?;

    let shutdown = Shutdown::new();
    signals::forward_ctrl_c(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await
}

/// Full bootstrap: resolve, then either exit or serve.
pub async fn bootstrap(args: BootstrapArgs, env: &dyn PropertySource, working_dir: &Path) -> ExitCode {
    match prepare(&args, env, working_dir) {
        Startup::Exit(code) => ExitCode::from(code),
        Startup::Serve(config) => match serve(config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Server failed");
                ExitCode::from(EXIT_FAILURE)
            }
        },
    }
}
