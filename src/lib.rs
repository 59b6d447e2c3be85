//! installator: bootstrap configuration resolution and web server startup.

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{resolve, Resolution, ValidatedConfig};
pub use http::WebServer;
pub use lifecycle::Shutdown;
