//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config resolution, startup, HTTP requests
//!     → tracing events with structured fields
//!     → logging.rs (EnvFilter + fmt layer)
//!     → stderr
//! ```

pub mod logging;
