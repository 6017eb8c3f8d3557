//! Seamless proxy reload.
//!
//! # Responsibilities
//! - Read the PID of the running proxy
//! - Start a new proxy on the same ports, handing the old PID to `-sf` so the
//!   old process drains its connections and exits
//!
//! # Design Decisions
//! - Blocking call with no timeout; callers wrap it in their own deadline
//! - No retries and no rollback: the new configuration is already on disk

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::error::{ControlResult, ProcessError};
use crate::observability::metrics;
use crate::reload::runner::CommandRunner;

/// Drives the proxy binary through start and seamless reload.
#[derive(Debug, Clone)]
pub struct ProcessReloader {
    binary: String,
    config_path: PathBuf,
    pid_file: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl ProcessReloader {
    pub fn new(
        binary: impl Into<String>,
        config_path: impl Into<PathBuf>,
        pid_file: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            binary: binary.into(),
            config_path: config_path.into(),
            pid_file: pid_file.into(),
            runner,
        }
    }

    pub fn pid_file(&self) -> &Path {
        &self.pid_file
    }

    /// Read the PID written by the running proxy.
    pub fn read_pid(&self) -> Result<String, ProcessError> {
        let raw = fs::read_to_string(&self.pid_file).map_err(|source| ProcessError::PidFile {
            path: self.pid_file.clone(),
            source,
        })?;
        let pid = raw.trim();
        if pid.is_empty() {
            return Err(ProcessError::EmptyPid {
                path: self.pid_file.clone(),
            });
        }
        Ok(pid.to_string())
    }

    /// Arguments of the first start: config, daemonize, PID file.
    pub fn start_args(&self) -> Vec<String> {
        vec![
            "-f".to_string(),
            self.config_path.display().to_string(),
            "-D".to_string(),
            "-p".to_string(),
            self.pid_file.display().to_string(),
        ]
    }

    /// Arguments of a seamless reload replacing `old_pid`.
    pub fn reload_args(&self, old_pid: &str) -> Vec<String> {
        let mut args = self.start_args();
        args.push("-sf".to_string());
        args.push(old_pid.to_string());
        args
    }

    /// Make the running proxy adopt the compiled configuration.
    pub fn reload(&self) -> ControlResult<()> {
        let outcome = self.read_pid().and_then(|pid| {
            tracing::info!(old_pid = %pid, config = %self.config_path.display(), "Reloading proxy");
            self.runner.run(&self.binary, &self.reload_args(&pid))
        });
        self.finish("reload", outcome)
    }

    /// Start the proxy when none is running yet.
    pub fn start(&self) -> ControlResult<()> {
        tracing::info!(config = %self.config_path.display(), "Starting proxy");
        let outcome = self.runner.run(&self.binary, &self.start_args());
        self.finish("start", outcome)
    }

    /// Reload, or start when the proxy never wrote a PID file.
    pub fn reload_or_start(&self) -> ControlResult<()> {
        if self.pid_file.exists() {
            self.reload()
        } else {
            self.start()
        }
    }

    fn finish(&self, action: &'static str, outcome: Result<(), ProcessError>) -> ControlResult<()> {
        match &outcome {
            Ok(()) => {
                metrics::record_reload(action, "success");
                tracing::info!(action, "Proxy accepted configuration");
            }
            Err(e) => {
                metrics::record_reload(action, "error");
                tracing::error!(action, error = %e, "Proxy {} failed", action);
            }
        }
        outcome.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControlError;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    impl CommandRunner for Recorder {
        fn run(&self, program: &str, args: &[String]) -> Result<(), ProcessError> {
            let mut argv = vec![program.to_string()];
            argv.extend_from_slice(args);
            self.calls.lock().unwrap().push(argv);
            if self.fail {
                Err(ProcessError::ExitStatus {
                    program: program.to_string(),
                    code: Some(1),
                })
            } else {
                Ok(())
            }
        }
    }

    fn reloader(pid_file: PathBuf, runner: Arc<Recorder>) -> ProcessReloader {
        ProcessReloader::new("haproxy", "/cfg/haproxy.cfg", pid_file, runner)
    }

    #[test]
    fn test_reload_runs_seamless_command() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("haproxy.pid");
        fs::write(&pid_file, "123\n").unwrap();
        let runner = Arc::new(Recorder::default());

        reloader(pid_file.clone(), runner.clone()).reload().unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![vec![
                "haproxy".to_string(),
                "-f".into(),
                "/cfg/haproxy.cfg".into(),
                "-D".into(),
                "-p".into(),
                pid_file.display().to_string(),
                "-sf".into(),
                "123".into(),
            ]]
        );
    }

    #[test]
    fn test_reload_fails_without_pid_file() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(Recorder::default());

        let err = reloader(dir.path().join("missing.pid"), runner.clone())
            .reload()
            .unwrap_err();

        assert!(matches!(err, ControlError::Process(ProcessError::PidFile { .. })));
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reload_fails_on_empty_pid() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("haproxy.pid");
        fs::write(&pid_file, "  \n").unwrap();

        let err = reloader(pid_file, Arc::new(Recorder::default())).reload().unwrap_err();
        assert!(matches!(err, ControlError::Process(ProcessError::EmptyPid { .. })));
    }

    #[test]
    fn test_reload_fails_when_command_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("haproxy.pid");
        fs::write(&pid_file, "123").unwrap();
        let runner = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });

        let err = reloader(pid_file, runner).reload().unwrap_err();
        assert!(matches!(err, ControlError::Process(ProcessError::ExitStatus { .. })));
    }

    #[test]
    fn test_reload_or_start_starts_without_pid_file() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("haproxy.pid");
        let runner = Arc::new(Recorder::default());

        reloader(pid_file, runner.clone()).reload_or_start().unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].contains(&"-sf".to_string()));
    }
}
