//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value shapes (ports numeric, `user:pass` pairs, addresses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ControlConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;
use crate::config::schema::ControlConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ControlConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let template = &config.template;

    for port in &template.bind_ports {
        match port.parse::<u16>() {
            Ok(p) if p > 0 => {}
            _ => errors.push(ValidationError::new(
                "template.bind_ports",
                format!("'{}' is not a valid port", port),
            )),
        }
    }

    for pair in &template.users {
        match pair.split_once(':') {
            Some((user, _)) if !user.is_empty() => {}
            _ => errors.push(ValidationError::new(
                "template.users",
                format!("'{}' is not a user:password pair", pair),
            )),
        }
    }

    for (name, value) in template.timeouts.entries() {
        if let Some(value) = value {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                errors.push(ValidationError::new(
                    format!("template.timeouts.{}", name),
                    format!("'{}' is not a timeout value", value),
                ));
            }
        }
    }

    if config.proxy.binary.trim().is_empty() {
        errors.push(ValidationError::new("proxy.binary", "must not be empty"));
    }

    if config.admin.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "admin.bind_address",
            format!("'{}' is not a socket address", config.admin.bind_address),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
