//! The service registry.
//!
//! # Responsibilities
//! - Hold the service map and the set of known certificate names
//! - Serialize every mutation and snapshot behind one lock
//!
//! # Design Decisions
//! - `BTreeMap`/`BTreeSet` so enumeration is lexicographic and compile output
//!   is deterministic
//! - Whole-value upserts; a service is never partially applied
//! - Only I/O (`get_certs`) can fail

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use crate::error::ControlResult;
use crate::observability::metrics;
use crate::registry::certs::CertificateStore;
use crate::registry::service::Service;

/// A consistent copy of the registry taken under its lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub services: BTreeMap<String, Service>,
    pub certs: BTreeSet<String>,
}

impl RegistrySnapshot {
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Thread-safe registry of services and certificate names.
#[derive(Debug)]
pub struct ServiceRegistry {
    state: Mutex<RegistrySnapshot>,
    certs: CertificateStore,
}

impl ServiceRegistry {
    /// Create an empty registry reading certificates from `certs`.
    pub fn new(certs: CertificateStore) -> Self {
        Self {
            state: Mutex::new(RegistrySnapshot::default()),
            certs,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistrySnapshot> {
        // A panic while holding the lock cannot leave a torn entry: every
        // mutation is a single map operation.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cert_store(&self) -> &CertificateStore {
        &self.certs
    }

    /// Register a certificate name. Duplicates are ignored.
    pub fn add_cert(&self, name: impl Into<String>) {
        let name = name.into();
        let inserted = self.lock().certs.insert(name.clone());
        if inserted {
            tracing::info!(cert = %name, "Certificate registered");
        }
    }

    /// Read every known certificate. Any failed read fails the whole call.
    pub fn get_certs(&self) -> ControlResult<BTreeMap<String, Vec<u8>>> {
        let names = self.cert_names();
        names
            .into_iter()
            .map(|name| {
                let content = self.certs.read(&name)?;
                Ok((name, content))
            })
            .collect()
    }

    /// Insert or fully replace a service.
    pub fn add_service(&self, service: Service) {
        let name = service.name.clone();
        let count = {
            let mut state = self.lock();
            state.services.insert(name.clone(), service);
            state.services.len()
        };
        metrics::record_service_count(count);
        tracing::info!(service = %name, "Service registered");
    }

    /// Remove a service. Unknown names are a no-op.
    pub fn remove_service(&self, name: &str) {
        let (removed, count) = {
            let mut state = self.lock();
            let removed = state.services.remove(name).is_some();
            (removed, state.services.len())
        };
        if removed {
            metrics::record_service_count(count);
            tracing::info!(service = %name, "Service removed");
        } else {
            tracing::debug!(service = %name, "Remove of unknown service ignored");
        }
    }

    pub fn get_service(&self, name: &str) -> Option<Service> {
        self.lock().services.get(name).cloned()
    }

    /// All services in name order.
    pub fn services(&self) -> Vec<Service> {
        self.lock().services.values().cloned().collect()
    }

    pub fn cert_names(&self) -> Vec<String> {
        self.lock().certs.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().services.is_empty()
    }

    /// Copy the whole registry in one critical section.
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;

    fn registry() -> ServiceRegistry {
        ServiceRegistry::new(CertificateStore::new("/certs"))
    }

    #[test]
    fn test_add_cert_stores_name() {
        let reg = registry();
        reg.add_cert("my-cert-3");
        assert_eq!(reg.cert_names(), vec!["my-cert-3"]);
    }

    #[test]
    fn test_add_cert_ignores_duplicates() {
        let reg = registry();
        for name in ["cert-1", "cert-2", "cert-3"] {
            reg.add_cert(name);
        }
        reg.add_cert("cert-3");
        assert_eq!(reg.cert_names(), vec!["cert-1", "cert-2", "cert-3"]);
    }

    #[test]
    fn test_get_certs_reads_every_cert() {
        let dir = tempfile::tempdir().unwrap();
        let reg = ServiceRegistry::new(CertificateStore::new(dir.path()));
        for i in 1..=3 {
            let name = format!("my-cert-{}", i);
            fs::write(dir.path().join(&name), format!("content of {}", name)).unwrap();
            reg.add_cert(name);
        }

        let certs = reg.get_certs().unwrap();
        assert_eq!(certs.len(), 3);
        assert_eq!(certs["my-cert-2"], b"content of my-cert-2");
    }

    #[test]
    fn test_get_certs_returns_binary_content() {
        let dir = tempfile::tempdir().unwrap();
        let reg = ServiceRegistry::new(CertificateStore::new(dir.path()));
        fs::write(dir.path().join("der.crt"), [0x30, 0x82, 0xff, 0xfe, 0x00]).unwrap();
        fs::write(dir.path().join("site.pem"), "PEM").unwrap();
        reg.add_cert("der.crt");
        reg.add_cert("site.pem");

        let certs = reg.get_certs().unwrap();
        assert_eq!(certs["der.crt"], vec![0x30, 0x82, 0xff, 0xfe, 0x00]);
        assert_eq!(certs["site.pem"], b"PEM");
    }

    #[test]
    fn test_get_certs_fails_when_one_read_fails() {
        let dir = tempfile::tempdir().unwrap();
        let reg = ServiceRegistry::new(CertificateStore::new(dir.path()));
        fs::write(dir.path().join("present"), "x").unwrap();
        reg.add_cert("present");
        reg.add_cert("missing");

        assert!(reg.get_certs().is_err());
    }

    #[test]
    fn test_add_service_replaces_by_name() {
        let reg = registry();
        let s1 = Service::new("my-service-1");
        let s2 = Service::new("my-service-2");
        let mut s3 = Service::new("my-service-2");
        s3.domains = vec!["domain-1".into(), "domain-2".into()];

        reg.add_service(s1.clone());
        reg.add_service(s2);
        reg.add_service(s3.clone());

        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get_service("my-service-1"), Some(s1));
        assert_eq!(reg.get_service("my-service-2"), Some(s3));
    }

    #[test]
    fn test_remove_service() {
        let reg = registry();
        reg.add_service(Service::new("my-service-1"));
        reg.add_service(Service::new("my-service-2"));

        reg.remove_service("my-service-1");

        assert_eq!(reg.len(), 1);
        assert!(reg.get_service("my-service-1").is_none());
    }

    #[test]
    fn test_remove_unknown_service_is_noop() {
        let reg = registry();
        reg.add_service(Service::new("kept"));
        let before = reg.snapshot();

        reg.remove_service("never-added");

        assert_eq!(reg.snapshot(), before);
    }

    #[test]
    fn test_services_enumerate_in_name_order() {
        let reg = registry();
        for name in ["zeta", "alpha", "mid"] {
            reg.add_service(Service::new(name));
        }
        let names: Vec<_> = reg.services().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_concurrent_mutations() {
        let reg = Arc::new(registry());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let reg = reg.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        reg.add_service(Service::new(format!("svc-{}-{}", t, i)));
                        if i % 2 == 0 {
                            reg.remove_service(&format!("svc-{}-{}", t, i));
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(reg.len(), 8 * 25);
    }
}
