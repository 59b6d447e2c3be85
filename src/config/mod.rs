//! Bootstrap configuration subsystem.
//!
//! # Data Flow
//! ```text
//! startup arguments
//!     → resolver.rs (help or resolution, source order)
//!     → source.rs (environment overrides | explicit file | default file)
//!         → properties.rs (parse .properties files)
//!     → RawConfig (three optional strings)
//!     → validation.rs (presence, port, file, URL checks)
//!     → ValidatedConfig (immutable, handed to the web server)
//!
//! A rejected source falls through to the next one:
//!     overrides → explicit file → installator.properties → NotFound
//! ```
//!
//! # Design Decisions
//! - All three values are validated together; one bad value rejects the source
//! - Environment and filesystem access are injected, so resolution is
//!   deterministic under test
//! - Resolution runs exactly once per process; nothing is cached

pub mod properties;
pub mod resolver;
pub mod schema;
pub mod source;
pub mod validation;

pub use resolver::{resolve, ConfigResolver, Resolution, ResolveError};
pub use schema::{PropertyKey, RawConfig, ValidatedConfig};
pub use source::{ConfigSource, EnvOverrides, PropertySource, SourceError, DEFAULT_FILE_NAME};
pub use validation::{validate, ValidationError};
