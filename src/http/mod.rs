//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! ValidatedConfig
//!     → server.rs (bind 0.0.0.0:<port>, inject config as router state)
//!     → GET /health, GET /bootstrap
//! ```

pub mod server;

pub use server::{ServerError, WebServer};
