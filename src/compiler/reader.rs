//! Read-back of the compiled configuration.

use std::fs;
use std::path::{Path, PathBuf};
use crate::error::{ControlError, ControlResult};

/// Reads the configuration last written by the compiler.
#[derive(Debug, Clone)]
pub struct ConfigReader {
    path: PathBuf,
}

impl ConfigReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the compiled file's text unchanged.
    pub fn read_config(&self) -> ControlResult<String> {
        fs::read_to_string(&self.path).map_err(|e| ControlError::io(&self.path, e))
    }
}
