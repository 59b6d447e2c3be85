//! Command line surface.

use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};

const SEPARATOR_LINE: &str = "--------------------------------";

const AFTER_HELP: &str = "\
Alternatively pass every setting through the environment:
  JETTY_PORT=8888 PROPERTY_FILE_LOCATION=/home/... CONF_SERVICE_URL=http://localhost:9999 installator

If the path to installator.properties is not given, installator.properties
from the current directory is used.
If installator.properties is not present in the current directory and the
environment does not provide every required setting, startup fails.";

/// Startup arguments.
///
/// `--help` is an ordinary flag so that the help decision goes through
/// [`resolve`](crate::config::resolve) like every other outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(
    name = "installator",
    version,
    about = "Resolves the bootstrap configuration and starts the installator web server",
    disable_help_flag = true,
    after_help = AFTER_HELP
)]
pub struct BootstrapArgs {
    /// Print usage and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub help: bool,

    /// Path to an installator.properties file
    #[arg(value_name = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,
}

impl BootstrapArgs {
    /// Arguments pointing at an explicit configuration file.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            help: false,
            config_file: Some(path.into()),
        }
    }

    pub fn help() -> Self {
        Self {
            help: true,
            config_file: None,
        }
    }
}

/// Full usage banner.
pub fn help_text() -> String {
    let help = BootstrapArgs::command().render_help();
    format!("{SEPARATOR_LINE}\n{help}\n{SEPARATOR_LINE}")
}

/// Print the usage banner to stdout.
pub fn print_help() {
    println!("{}", help_text());
}
