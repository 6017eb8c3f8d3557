//! Configuration loading from disk and the environment.

use std::path::Path;
use std::fs;
use crate::config::schema::{ControlConfig, TemplateOptions};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {}", e),
            LoadError::Parse(e) => write!(f, "Parse error: {}", e),
            LoadError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<ControlConfig, LoadError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(LoadError::Io)?;
            toml::from_str(&content).map_err(LoadError::Parse)?
        }
        None => ControlConfig::default(),
    };

    apply_env_overrides(&mut config.template, |key| std::env::var(key).ok());

    validate_config(&config).map_err(LoadError::Validation)?;

    Ok(config)
}

/// Overlay template options from environment-style variables.
///
/// `lookup` returns the raw value of a variable; unset and empty values are
/// both treated as absent.
pub fn apply_env_overrides<F>(options: &mut TemplateOptions, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(debug) = get("DEBUG") {
        options.debug = parse_flag(&debug);
    }

    let timeouts = &mut options.timeouts;
    for (key, slot) in [
        ("TIMEOUT_CONNECT", &mut timeouts.connect),
        ("TIMEOUT_CLIENT", &mut timeouts.client),
        ("TIMEOUT_SERVER", &mut timeouts.server),
        ("TIMEOUT_QUEUE", &mut timeouts.queue),
        ("TIMEOUT_HTTP_REQUEST", &mut timeouts.http_request),
        ("TIMEOUT_HTTP_KEEP_ALIVE", &mut timeouts.http_keep_alive),
    ] {
        if let Some(value) = get(key) {
            *slot = Some(value);
        }
    }

    if let Some(user) = get("STATS_USER") {
        options.stats_user = Some(user);
    }
    if let Some(pass) = get("STATS_PASS") {
        options.stats_pass = Some(pass);
    }
    if let Some(extra) = get("EXTRA_FRONTEND") {
        options.extra_frontend = Some(extra);
    }
    if let Some(ports) = get("BIND_PORTS") {
        options.bind_ports = split_list(&ports);
    }
    if let Some(users) = get("USERS") {
        options.users = split_list(&users);
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut options = TemplateOptions::default();
        apply_env_overrides(&mut options, lookup(&[
            ("DEBUG", "true"),
            ("TIMEOUT_CONNECT", "999"),
            ("TIMEOUT_HTTP_KEEP_ALIVE", "20"),
            ("STATS_USER", "my-user"),
            ("BIND_PORTS", "1234, 4321"),
            ("USERS", "u1:p1,u2:p2"),
        ]));

        assert!(options.debug);
        assert_eq!(options.timeouts.connect.as_deref(), Some("999"));
        assert_eq!(options.timeouts.http_keep_alive.as_deref(), Some("20"));
        assert_eq!(options.timeouts.client, None);
        assert_eq!(options.stats_user.as_deref(), Some("my-user"));
        assert_eq!(options.stats_pass, None);
        assert_eq!(options.bind_ports, vec!["1234", "4321"]);
        assert_eq!(options.users, vec!["u1:p1", "u2:p2"]);
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut options = TemplateOptions {
            stats_pass: Some("from-file".into()),
            ..Default::default()
        };
        apply_env_overrides(&mut options, lookup(&[("STATS_PASS", ""), ("DEBUG", "")]));

        assert_eq!(options.stats_pass.as_deref(), Some("from-file"));
        assert!(!options.debug);
    }

    #[test]
    fn test_debug_flag_values() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("control.toml");
        fs::write(&path, "[proxy]\nbinary = \"/usr/sbin/haproxy\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.proxy.binary, "/usr/sbin/haproxy");
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
