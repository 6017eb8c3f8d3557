//! Full configuration build: template, generated frontends, fragments.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use crate::compiler::fragments::Fragments;
use crate::compiler::frontend::{render_services, DUMMY_BACKEND};
use crate::compiler::template;
use crate::config::{PathsConfig, TemplateOptions};
use crate::error::{ControlError, ControlResult};
use crate::observability::metrics;
use crate::registry::{RegistrySnapshot, ServiceRegistry};

/// Result of a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledConfig {
    /// Where the configuration was written.
    pub path: PathBuf,
    /// The full configuration text.
    pub text: String,
}

/// Builds the proxy configuration from the registry and writes it to disk.
#[derive(Debug, Clone)]
pub struct ConfigCompiler {
    paths: PathsConfig,
    options: TemplateOptions,
    registry: Arc<ServiceRegistry>,
}

impl ConfigCompiler {
    pub fn new(paths: PathsConfig, options: TemplateOptions, registry: Arc<ServiceRegistry>) -> Self {
        Self {
            paths,
            options,
            registry,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.paths.config_path()
    }

    /// Rebuild the configuration from scratch and write it.
    ///
    /// Nothing is written when the template or fragments cannot be read.
    pub fn compile(&self) -> ControlResult<CompiledConfig> {
        let started = Instant::now();
        let result = self.build().and_then(|text| {
            let path = self.output_path();
            fs::write(&path, &text).map_err(|e| ControlError::io(&path, e))?;
            Ok(CompiledConfig { path, text })
        });

        match &result {
            Ok(compiled) => {
                metrics::record_compile("success", started);
                tracing::info!(
                    path = %compiled.path.display(),
                    bytes = compiled.text.len(),
                    "Configuration written"
                );
            }
            Err(e) => {
                metrics::record_compile("error", started);
                tracing::error!(error = %e, "Configuration compile failed");
            }
        }
        result
    }

    /// Produce the configuration text without writing it.
    pub fn build(&self) -> ControlResult<String> {
        let template_path = self.paths.template_path();
        let template = read_template(&template_path)?;
        let snapshot = self.registry.snapshot();
        let fragments = Fragments::discover(&self.paths.configs_dir)?;
        self.assemble(&template, &snapshot, &fragments)
    }

    fn assemble(
        &self,
        template: &str,
        snapshot: &RegistrySnapshot,
        fragments: &Fragments,
    ) -> ControlResult<String> {
        let store = self.registry.cert_store();
        let certs: Vec<PathBuf> = snapshot.certs.iter().map(|name| store.path_for(name)).collect();

        let mut text = template::apply(template, &self.options, &certs);
        text.push_str(&render_services(snapshot.services.values()));

        if snapshot.is_empty() && fragments.is_empty() {
            tracing::debug!("No services or fragments, adding dummy backend");
            text.push_str(DUMMY_BACKEND);
        } else {
            text.push_str(&fragments.concat()?);
        }

        tracing::debug!(
            services = snapshot.services.len(),
            certs = certs.len(),
            fragments = fragments.len(),
            "Configuration assembled"
        );
        Ok(text)
    }
}

fn read_template(path: &Path) -> ControlResult<String> {
    fs::read_to_string(path).map_err(|e| ControlError::config(path, e))
}
