//! Service definitions held by the registry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker that turns a domain into an "ends with" match.
pub const WILDCARD_MARKER: char = '*';

/// Request mode of a service; selects the frontend generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReqMode {
    #[default]
    Http,
    Tcp,
}

/// A logical routed endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    /// Unique registry key.
    pub name: String,

    /// Prefix for generated backend names. Empty means `name`.
    pub acl_name: String,

    /// Path matching token, e.g. `path_beg`. Empty disables the path ACL.
    pub path_type: String,

    /// Host names; a leading `*` requests suffix matching.
    pub domains: Vec<String>,

    pub req_mode: ReqMode,

    /// When set, traffic is split into plain and TLS backends.
    pub https_port: Option<u16>,

    pub destinations: Vec<ServiceDest>,
}

/// One routable destination of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceDest {
    /// Backend port, part of the backend name.
    pub port: String,

    /// Path prefixes (http mode).
    pub paths: Vec<String>,

    /// Bind port of the dedicated tcp frontend. Zero means none.
    pub source_port: u16,

    /// Pre-rendered clause appended to the url ACL, carried verbatim.
    pub source_port_acl: String,

    /// Pre-rendered ACL name appended to the `use_backend` condition, carried verbatim.
    pub source_port_acl_name: String,
}

impl Service {
    /// Create an http service with no destinations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Backend-name prefix, falling back to the service name.
    pub fn backend_prefix(&self) -> &str {
        if self.acl_name.is_empty() {
            &self.name
        } else {
            &self.acl_name
        }
    }

    /// Destinations that own a dedicated tcp frontend.
    pub fn tcp_destinations(&self) -> impl Iterator<Item = &ServiceDest> {
        self.destinations.iter().filter(|d| d.source_port != 0)
    }

    /// Check the invariants a service must satisfy before registration.
    pub fn validate(&self) -> Result<(), InvalidService> {
        if self.name.trim().is_empty() {
            return Err(InvalidService::MissingName);
        }
        if self.req_mode == ReqMode::Tcp && self.tcp_destinations().next().is_none() {
            return Err(InvalidService::NoSourcePort(self.name.clone()));
        }
        Ok(())
    }
}

/// Reasons a service is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidService {
    #[error("service name is required")]
    MissingName,
    #[error("tcp service '{0}' needs at least one destination with a source port")]
    NoSourcePort(String),
}
