//! Shared fixtures for integration tests.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use haproxy_control::config::{ControlConfig, PathsConfig};
use haproxy_control::{CommandRunner, ControlPlane, ProcessError};

pub const TEMPLATE: &str = "global
    pidfile /var/run/haproxy.pid
    tune.ssl.default-dh-param 2048

defaults
    mode    http
    balance roundrobin

    option  dontlognull
    option  dontlog-normal
    option  http-server-close
    option  forwardfor
    option  redispatch

    errorfile 400 /errorfiles/400.http
    errorfile 503 /errorfiles/503.http

    maxconn 5000
    timeout connect 5s
    timeout client  20s
    timeout server  20s
    timeout queue   30s
    timeout http-request 5s
    timeout http-keep-alive 15s

    stats enable
    stats refresh 30s
    stats realm Strictly\\ Private
    stats auth admin:admin
    stats uri /admin?stats

frontend services
    bind *:80
    bind *:443
    mode http
";

/// Concatenation of the fragments written by [`Layout::write_fragments`].
pub const FRAGMENTS: &str = "

config1 fe content

config2 fe content

config1 be content

config2 be content";

/// A throwaway directory tree mirroring the proxy container layout.
pub struct Layout {
    _root: TempDir,
    pub paths: PathsConfig,
}

#[allow(dead_code)]
impl Layout {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let paths = PathsConfig {
            templates_dir: root.path().join("tmpl"),
            configs_dir: root.path().join("cfg"),
            certs_dir: root.path().join("certs"),
            pid_file: root.path().join("haproxy.pid"),
        };
        fs::create_dir_all(&paths.templates_dir).unwrap();
        fs::create_dir_all(&paths.configs_dir).unwrap();
        fs::create_dir_all(&paths.certs_dir).unwrap();
        fs::write(paths.template_path(), TEMPLATE).unwrap();
        Self { _root: root, paths }
    }

    pub fn write_fragments(&self) {
        for (name, content) in [
            ("config1-fe.cfg", "config1 fe content"),
            ("config2-fe.cfg", "config2 fe content"),
            ("config1-be.cfg", "config1 be content"),
            ("config2-be.cfg", "config2 be content"),
        ] {
            fs::write(self.paths.configs_dir.join(name), content).unwrap();
        }
    }

    pub fn write_pid(&self, pid: &str) {
        fs::write(&self.paths.pid_file, pid).unwrap();
    }

    pub fn write_cert(&self, name: &str, content: &str) {
        fs::write(self.paths.certs_dir.join(name), content).unwrap();
    }

    pub fn write_cert_bytes(&self, name: &str, content: &[u8]) {
        fs::write(self.paths.certs_dir.join(name), content).unwrap();
    }

    pub fn cert_path(&self, name: &str) -> PathBuf {
        self.paths.certs_dir.join(name)
    }

    pub fn config(&self) -> ControlConfig {
        ControlConfig {
            paths: self.paths.clone(),
            ..Default::default()
        }
    }

    pub fn read_output(&self) -> String {
        fs::read_to_string(self.paths.config_path()).unwrap()
    }
}

/// Records every command instead of running it.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<Vec<String>>>,
    pub fail: bool,
}

#[allow(dead_code)]
impl RecordingRunner {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<(), ProcessError> {
        let mut argv = vec![program.to_string()];
        argv.extend_from_slice(args);
        self.calls.lock().unwrap().push(argv);
        if self.fail {
            return Err(ProcessError::ExitStatus {
                program: program.to_string(),
                code: Some(1),
            });
        }
        Ok(())
    }
}

#[allow(dead_code)]
pub fn plane(config: &ControlConfig, runner: Arc<RecordingRunner>) -> ControlPlane {
    ControlPlane::new(config, runner)
}
