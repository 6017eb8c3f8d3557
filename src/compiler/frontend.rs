//! Frontend rules generated from registered services.
//!
//! # Responsibilities
//! - tcp services: one dedicated frontend stanza per source port
//! - http services: url/domain/protocol ACLs and `use_backend` rules appended
//!   to `frontend services`
//!
//! # Design Decisions
//! - Every http line starts with `\n` plus four spaces so the rules continue
//!   the template's last section
//! - `source_port_acl` and `source_port_acl_name` are opaque; they are only
//!   given a separating space when they lack one

use std::fmt::Write;
use crate::registry::service::{ReqMode, Service, ServiceDest, WILDCARD_MARKER};

/// Routes an unreachable path to an unreachable server so the proxy always
/// has one valid backend.
pub const DUMMY_BACKEND: &str = "

    acl url_dummy path_beg /dummy
    use_backend dummy-be if url_dummy

backend dummy-be
    server dummy 1.1.1.1:1111 check";

const HTTP_SRC_PORT: u16 = 80;

/// Render the frontend body for every service, in iteration order.
pub fn render_services<'a, I>(services: I) -> String
where
    I: IntoIterator<Item = &'a Service>,
{
    let mut out = String::new();
    for service in services {
        out.push_str(&render_service(service));
    }
    out
}

/// Render the frontend text for one service.
pub fn render_service(service: &Service) -> String {
    match service.req_mode {
        ReqMode::Tcp => render_tcp(service),
        ReqMode::Http => render_http(service),
    }
}

fn render_tcp(service: &Service) -> String {
    let mut out = String::new();
    for dest in service.tcp_destinations() {
        let _ = write!(
            out,
            "\n\nfrontend {name}_{src}\n    bind *:{src}\n    mode tcp\n    default_backend {backend}-be{port}",
            name = service.name,
            src = dest.source_port,
            backend = service.backend_prefix(),
            port = dest.port,
        );
    }
    if out.is_empty() {
        tracing::warn!(service = %service.name, "tcp service has no source port, no frontend generated");
    }
    out
}

fn render_http(service: &Service) -> String {
    let name = &service.name;
    let mut out = String::new();

    for dest in &service.destinations {
        if !has_url_acl(service, dest) {
            continue;
        }
        let _ = write!(out, "\n    acl url_{}{}", name, dest.port);
        for path in &dest.paths {
            let _ = write!(out, " {} {}", service.path_type, path);
        }
        out.push_str(&clause(&dest.source_port_acl));
    }

    let domain = domain_matcher(service);
    if let Some(matcher) = &domain {
        let _ = write!(out, "\n    acl domain_{} {}", name, matcher);
    }

    if let Some(https_port) = service.https_port {
        let _ = write!(
            out,
            "\n    acl http_{name} src_port {}\n    acl https_{name} src_port {}",
            HTTP_SRC_PORT,
            https_port,
            name = name,
        );
    }

    let backend_prefix = service.backend_prefix();
    for dest in &service.destinations {
        let mut condition = String::new();
        if has_url_acl(service, dest) {
            let _ = write!(condition, " url_{}{}", name, dest.port);
        }
        if domain.is_some() {
            let _ = write!(condition, " domain_{}", name);
        }
        condition.push_str(&clause(&dest.source_port_acl_name));

        let backend = format!("{}-be{}", backend_prefix, dest.port);
        match service.https_port {
            None => use_backend(&mut out, &backend, &condition),
            Some(_) => {
                use_backend(&mut out, &backend, &format!("{} http_{}", condition, name));
                use_backend(
                    &mut out,
                    &format!("https-{}", backend),
                    &format!("{} https_{}", condition, name),
                );
            }
        }
    }
    out
}

fn has_url_acl(service: &Service, dest: &ServiceDest) -> bool {
    !service.path_type.is_empty() && !dest.paths.is_empty()
}

/// `hdr_end` on the first wildcard-marked domain, otherwise `hdr_dom` on all.
fn domain_matcher(service: &Service) -> Option<String> {
    if service.domains.is_empty() {
        return None;
    }
    match service.domains.iter().find(|d| d.starts_with(WILDCARD_MARKER)) {
        Some(wildcard) => Some(format!(
            "hdr_end(host) -i {}",
            wildcard.trim_start_matches(WILDCARD_MARKER)
        )),
        None => Some(format!("hdr_dom(host) -i {}", service.domains.join(" "))),
    }
}

fn use_backend(out: &mut String, backend: &str, condition: &str) {
    if condition.trim().is_empty() {
        let _ = write!(out, "\n    use_backend {}", backend);
    } else {
        let _ = write!(out, "\n    use_backend {} if{}", backend, condition);
    }
}

fn clause(raw: &str) -> String {
    if raw.trim().is_empty() {
        String::new()
    } else if raw.starts_with(char::is_whitespace) {
        raw.to_string()
    } else {
        format!(" {}", raw)
    }
}
