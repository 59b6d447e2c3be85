//! installator bootstrap.
//!
//! Resolves the three startup settings (port, property file location,
//! configuration service URL) and starts the web server.
//!
//! ```text
//!   startup args ──┐
//!   environment ───┼─▶ config::resolve ──▶ Help ───────▶ banner, exit 0
//!   working dir ───┘         │          ──▶ NotFound ───▶ banner, exit 1
//!                            │
//!                            ▼
//!                     ValidatedConfig ──▶ http::WebServer (until Ctrl+C)
//! ```

use std::process::ExitCode;

use clap::Parser;

use installator::cli::BootstrapArgs;
use installator::config::EnvOverrides;
use installator::lifecycle;
use installator::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = logging::init() {
        eprintln!("failed to initialize logging: {e}");
    }

    let args = match BootstrapArgs::try_parse() {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let working_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!(error = %e, "Cannot determine working directory");
            return ExitCode::from(lifecycle::startup::EXIT_FAILURE);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        working_dir = %working_dir.display(),
        "installator starting"
    );

    let env = EnvOverrides::from_process();
    lifecycle::bootstrap(args, &env, &working_dir).await
}
