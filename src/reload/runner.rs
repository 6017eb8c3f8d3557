//! External command execution.

use std::process::{Command, Stdio};
use crate::error::ProcessError;

/// Runs an external program to completion.
///
/// The reloader only depends on this trait so tests can substitute the proxy
/// binary.
pub trait CommandRunner: Send + Sync + std::fmt::Debug {
    /// Run `program` with `args`, blocking until it exits.
    /// A non-zero exit is an error.
    fn run(&self, program: &str, args: &[String]) -> Result<(), ProcessError>;
}

/// Runs commands with `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<(), ProcessError> {
        tracing::debug!(program = %program, args = ?args, "Running command");

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| ProcessError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(ProcessError::ExitStatus {
                program: program.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_successful_command() {
        assert!(SystemRunner.run("true", &[]).is_ok());
    }

    #[test]
    fn test_non_zero_exit() {
        let err = SystemRunner.run("false", &[]).unwrap_err();
        assert!(matches!(err, ProcessError::ExitStatus { code: Some(1), .. }));
    }

    #[test]
    fn test_missing_program() {
        let err = SystemRunner
            .run("definitely-not-a-real-binary-7c1e", &[])
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }
}
