//! The control plane facade.
//!
//! Owns the registry, compiler, reader and reloader and wires them into the
//! reconfigure flow: mutate registry → compile → reload.

use std::sync::{Arc, Mutex, PoisonError};
use crate::compiler::{CompiledConfig, ConfigCompiler, ConfigReader};
use crate::config::ControlConfig;
use crate::error::ControlResult;
use crate::registry::{CertificateStore, ServiceRegistry};
use crate::reload::{CommandRunner, ProcessReloader};

/// All core components, built from one configuration.
#[derive(Debug)]
pub struct ControlPlane {
    registry: Arc<ServiceRegistry>,
    compiler: ConfigCompiler,
    reader: ConfigReader,
    reloader: ProcessReloader,
    /// Held across compile + reload so callers never interleave.
    apply_lock: Mutex<()>,
}

impl ControlPlane {
    /// Build the components with an explicit command runner.
    pub fn new(config: &ControlConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let paths = &config.paths;
        let registry = Arc::new(ServiceRegistry::new(CertificateStore::new(&paths.certs_dir)));
        let compiler = ConfigCompiler::new(paths.clone(), config.template.clone(), registry.clone());
        let reader = ConfigReader::new(paths.config_path());
        let reloader = ProcessReloader::new(
            config.proxy.binary.clone(),
            paths.config_path(),
            paths.pid_file.clone(),
            runner,
        );

        Self {
            registry,
            compiler,
            reader,
            reloader,
            apply_lock: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    pub fn compiler(&self) -> &ConfigCompiler {
        &self.compiler
    }

    pub fn reader(&self) -> &ConfigReader {
        &self.reader
    }

    pub fn reloader(&self) -> &ProcessReloader {
        &self.reloader
    }

    /// Compile the registry into the configuration file and reload the proxy.
    ///
    /// A reload failure leaves the new file on disk and the old proxy running.
    pub fn reconfigure(&self) -> ControlResult<CompiledConfig> {
        let _guard = self.apply_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let compiled = self.compiler.compile()?;
        self.reloader.reload()?;
        Ok(compiled)
    }

    /// Compile and start the proxy if it is not running yet, reload otherwise.
    pub fn boot(&self) -> ControlResult<CompiledConfig> {
        let _guard = self.apply_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let compiled = self.compiler.compile()?;
        self.reloader.reload_or_start()?;
        Ok(compiled)
    }
}
