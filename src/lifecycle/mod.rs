//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs serve):
//!     Load config → Build control plane → Compile → Start/reload proxy → Admin API
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting admin requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
