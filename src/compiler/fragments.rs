//! Externally-authored configuration fragments.
//!
//! Another component drops one `<service>-fe.cfg` and one `<service>-be.cfg`
//! per service into the configs directory. They are merged verbatim:
//! every frontend fragment first, then every backend fragment, each group in
//! file-name order.

use std::fs;
use std::path::{Path, PathBuf};
use crate::error::{ControlError, ControlResult};

pub const FRONTEND_SUFFIX: &str = "-fe.cfg";
pub const BACKEND_SUFFIX: &str = "-be.cfg";

/// Fragment files found in the configs directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    pub frontends: Vec<PathBuf>,
    pub backends: Vec<PathBuf>,
}

impl Fragments {
    /// List fragment files. Fails with a config error when `dir` cannot be read.
    pub fn discover(dir: &Path) -> ControlResult<Self> {
        let entries = fs::read_dir(dir).map_err(|e| ControlError::config(dir, e))?;

        let mut fragments = Self::default();
        for entry in entries {
            let entry = entry.map_err(|e| ControlError::config(dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.ends_with(FRONTEND_SUFFIX) {
                fragments.frontends.push(path);
            } else if name.ends_with(BACKEND_SUFFIX) {
                fragments.backends.push(path);
            }
        }
        fragments.frontends.sort();
        fragments.backends.sort();

        tracing::debug!(
            dir = %dir.display(),
            frontends = fragments.frontends.len(),
            backends = fragments.backends.len(),
            "Fragments discovered"
        );
        Ok(fragments)
    }

    pub fn is_empty(&self) -> bool {
        self.frontends.is_empty() && self.backends.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frontends.len() + self.backends.len()
    }

    /// Read every fragment and join them, each preceded by a blank line.
    pub fn concat(&self) -> ControlResult<String> {
        let mut out = String::new();
        for path in self.frontends.iter().chain(&self.backends) {
            let content = fs::read_to_string(path).map_err(|e| ControlError::io(path, e))?;
            out.push_str("\n\n");
            out.push_str(&content);
        }
        Ok(out)
    }
}
