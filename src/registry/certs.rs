//! Certificate lookup by name.
//!
//! Certificates are opaque files named after the certificate; this module
//! never parses or validates them.

use std::fs;
use std::path::{Path, PathBuf};
use crate::error::{ControlError, ControlResult};

/// Resolves certificate names to files in a fixed directory.
#[derive(Debug, Clone)]
pub struct CertificateStore {
    dir: PathBuf,
}

impl CertificateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// On-disk location of a certificate.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Read a certificate's raw bytes.
    pub fn read(&self, name: &str) -> ControlResult<Vec<u8>> {
        let path = self.path_for(name);
        fs::read(&path).map_err(|e| ControlError::io(path, e))
    }
}
