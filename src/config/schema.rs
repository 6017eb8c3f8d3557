//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the control
//! plane. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the base template inside the templates directory.
pub const TEMPLATE_FILE: &str = "haproxy.tmpl";

/// File name of the compiled configuration inside the configs directory.
pub const CONFIG_FILE: &str = "haproxy.cfg";

/// Root configuration for the control plane.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ControlConfig {
    /// On-disk locations of templates, fragments, certificates and the PID file.
    pub paths: PathsConfig,

    /// The managed proxy process.
    pub proxy: ProxyProcessConfig,

    /// Global options rewritten into the base template.
    pub template: TemplateOptions,

    /// Admin API settings.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// File-system layout shared with the proxy and the fragment writer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `haproxy.tmpl`.
    pub templates_dir: PathBuf,

    /// Directory holding fragment files and the compiled `haproxy.cfg`.
    pub configs_dir: PathBuf,

    /// Directory holding certificate files, one per certificate name.
    pub certs_dir: PathBuf,

    /// PID file written by the proxy on every (re)start.
    pub pid_file: PathBuf,
}

impl PathsConfig {
    /// Full path of the base template.
    pub fn template_path(&self) -> PathBuf {
        self.templates_dir.join(TEMPLATE_FILE)
    }

    /// Full path of the compiled configuration.
    pub fn config_path(&self) -> PathBuf {
        self.configs_dir.join(CONFIG_FILE)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("/cfg/tmpl"),
            configs_dir: PathBuf::from("/cfg"),
            certs_dir: PathBuf::from("/certs"),
            pid_file: PathBuf::from("/var/run/haproxy.pid"),
        }
    }
}

/// Proxy process settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyProcessConfig {
    /// Proxy binary, resolved through `PATH` when not absolute.
    pub binary: String,

    /// Start the proxy when `serve` boots and no PID file exists yet.
    pub start_on_boot: bool,
}

impl Default for ProxyProcessConfig {
    fn default() -> Self {
        Self {
            binary: "haproxy".to_string(),
            start_on_boot: true,
        }
    }
}

/// Environment-driven rewrites applied to the base template.
///
/// Every field is optional; an absent value leaves the template line as-is.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct TemplateOptions {
    /// Enable proxy debug output and request logging of null/normal sessions.
    pub debug: bool,

    /// Per-kind timeout overrides.
    pub timeouts: TimeoutOverrides,

    /// Replacement for the user half of `stats auth`.
    pub stats_user: Option<String>,

    /// Replacement for the password half of `stats auth`.
    pub stats_pass: Option<String>,

    /// Raw text appended to the end of the template.
    pub extra_frontend: Option<String>,

    /// Additional ports bound by `frontend services`.
    pub bind_ports: Vec<String>,

    /// `user:password` pairs for the `defaultUsers` userlist.
    pub users: Vec<String>,
}

/// Overrides for the timeouts declared in the template's defaults section.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct TimeoutOverrides {
    pub connect: Option<String>,
    pub client: Option<String>,
    pub server: Option<String>,
    pub queue: Option<String>,
    pub http_request: Option<String>,
    pub http_keep_alive: Option<String>,
}

impl TimeoutOverrides {
    /// Overrides keyed by the timeout name used in the template.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("connect", self.connect.as_deref()),
            ("client", self.client.as_deref()),
            ("server", self.server.as_deref()),
            ("queue", self.queue.as_deref()),
            ("http-request", self.http_request.as_deref()),
            ("http-keep-alive", self.http_keep_alive.as_deref()),
        ]
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Admin API bind address.
    pub bind_address: String,

    /// Bearer token required on every route but `/v1/status`.
    /// No token means the API is open.
    pub api_key: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            api_key: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let paths = PathsConfig::default();
        assert_eq!(paths.template_path(), PathBuf::from("/cfg/tmpl/haproxy.tmpl"));
        assert_eq!(paths.config_path(), PathBuf::from("/cfg/haproxy.cfg"));
        assert_eq!(paths.pid_file, PathBuf::from("/var/run/haproxy.pid"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ControlConfig = toml::from_str(
            r#"
            [paths]
            configs_dir = "/tmp/cfg"

            [template]
            debug = true
            bind_ports = ["8080"]

            [template.timeouts]
            connect = "10"
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.configs_dir, PathBuf::from("/tmp/cfg"));
        assert_eq!(config.paths.certs_dir, PathBuf::from("/certs"));
        assert!(config.template.debug);
        assert_eq!(config.template.bind_ports, vec!["8080"]);
        assert_eq!(config.template.timeouts.connect.as_deref(), Some("10"));
        assert_eq!(config.template.timeouts.client, None);
        assert_eq!(config.proxy.binary, "haproxy");
    }
}
