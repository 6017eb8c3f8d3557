//! HAProxy sidecar control plane library.

pub mod admin;
pub mod compiler;
pub mod config;
pub mod control;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod reload;

pub use compiler::{CompiledConfig, ConfigCompiler, ConfigReader};
pub use config::schema::ControlConfig;
pub use control::ControlPlane;
pub use error::{ControlError, ControlResult, ProcessError};
pub use registry::{Service, ServiceDest, ServiceRegistry};
pub use reload::{CommandRunner, ProcessReloader};
