//! Service registry subsystem.
//!
//! # Data Flow
//! ```text
//! Admin API / CLI
//!     → store.rs (add/remove service, add cert; one lock)
//!     → snapshot() → compiler
//!
//! get_certs()
//!     → certs.rs (name → <certs_dir>/<name>)
//! ```

pub mod certs;
pub mod service;
pub mod store;

pub use certs::CertificateStore;
pub use service::{InvalidService, ReqMode, Service, ServiceDest};
pub use store::{RegistrySnapshot, ServiceRegistry};
