//! Proxy process management subsystem.
//!
//! # Data Flow
//! ```text
//! reload():
//!     pid file → old PID
//!     → haproxy -f <cfg> -D -p <pid file> -sf <old PID>   (runner.rs)
//!     → new process binds the same ports, old one drains and exits
//! ```

pub mod process;
pub mod runner;

pub use process::ProcessReloader;
pub use runner::{CommandRunner, SystemRunner};
