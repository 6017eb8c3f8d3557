//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! control.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (DEBUG, TIMEOUT_*, STATS_*, BIND_PORTS, USERS, ...)
//!     → validation.rs (semantic checks)
//!     → ControlConfig (validated, immutable)
//!     → paths and template options handed to the compiler and reloader
//! ```
//!
//! # Design Decisions
//! - All fields have defaults matching the proxy container layout
//! - Environment wins over the file for template options
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ControlConfig;
pub use schema::PathsConfig;
pub use schema::TemplateOptions;
pub use schema::TimeoutOverrides;
pub use schema::{AdminConfig, ObservabilityConfig, ProxyProcessConfig};
