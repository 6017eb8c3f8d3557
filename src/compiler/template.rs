//! Line-oriented rewrites of the base template.
//!
//! Each transformation is a pure function over the template text. They are
//! applied by [`apply`] in a fixed order because some of them target the same
//! region (the `frontend services` section at the end of the template).
//!
//! Lines are iterated with their terminators so untouched lines come out
//! byte-identical.

use std::fmt::Write;
use std::ops::Range;
use std::path::Path;
use crate::config::TemplateOptions;

/// Header of the section that receives users, certificates and bind ports.
pub const SERVICES_FRONTEND: &str = "frontend services";

/// Name of the userlist synthesized from `user:password` pairs.
pub const USER_LIST: &str = "defaultUsers";

const HTTPS_BIND: &str = "*:443";

/// Apply every configured rewrite to the template.
///
/// Order: debug, timeouts, stats auth, userlist, certificates, bind ports,
/// extra frontend.
pub fn apply<P: AsRef<Path>>(template: &str, options: &TemplateOptions, certs: &[P]) -> String {
    let mut text = if options.debug {
        enable_debug(template)
    } else {
        template.to_string()
    };

    for (name, value) in options.timeouts.entries() {
        if let Some(value) = value {
            text = set_timeout(&text, name, value);
        }
    }

    if options.stats_user.is_some() || options.stats_pass.is_some() {
        text = set_stats_auth(&text, options.stats_user.as_deref(), options.stats_pass.as_deref());
    }

    text = add_user_list(&text, &options.users);
    text = add_certs(&text, certs);
    text = add_bind_ports(&text, &options.bind_ports);

    if let Some(extra) = &options.extra_frontend {
        text.push_str(extra);
    }
    text
}

/// Insert `debug` after the TLS parameter line and drop the options that
/// silence null and normal connections.
pub fn enable_debug(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut inserted = false;
    for line in text.split_inclusive('\n') {
        let words: Vec<&str> = line.split_whitespace().collect();
        if matches!(words.as_slice(), ["option", "dontlognull" | "dontlog-normal"]) {
            continue;
        }
        out.push_str(line);
        if !inserted && words.first() == Some(&"tune.ssl.default-dh-param") {
            if line.ends_with('\n') {
                out.push_str(indentation(line));
                out.push_str("debug\n");
            } else {
                out.push('\n');
                out.push_str(indentation(line));
                out.push_str("debug");
            }
            inserted = true;
        }
    }
    if !inserted {
        tracing::warn!("Debug requested but template has no tune.ssl.default-dh-param line");
    }
    out
}

/// Replace the value on the `timeout <name>` line.
///
/// A numeric override keeps the unit of the template value (`5s` → `999s`);
/// anything else replaces the whole token.
pub fn set_timeout(text: &str, name: &str, value: &str) -> String {
    map_lines(text, |line| {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 3 || words[0] != "timeout" || words[1] != name {
            return None;
        }
        let span = token_span(line, 2)?;
        let current = &line[span.clone()];
        let replacement = if value.chars().all(|c| c.is_ascii_digit()) {
            let unit = current.trim_start_matches(|c: char| c.is_ascii_digit());
            format!("{}{}", value, unit)
        } else {
            value.to_string()
        };
        Some(replace_span(line, span, &replacement))
    })
}

/// Replace either half of `stats auth user:pass`.
pub fn set_stats_auth(text: &str, user: Option<&str>, pass: Option<&str>) -> String {
    map_lines(text, |line| {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 3 || words[0] != "stats" || words[1] != "auth" {
            return None;
        }
        let span = token_span(line, 2)?;
        let (cur_user, cur_pass) = line[span.clone()].split_once(':')?;
        let credentials = format!("{}:{}", user.unwrap_or(cur_user), pass.unwrap_or(cur_pass));
        Some(replace_span(line, span, &credentials))
    })
}

/// Insert a `userlist defaultUsers` block before `frontend services`.
pub fn add_user_list(text: &str, users: &[String]) -> String {
    if users.is_empty() {
        return text.to_string();
    }

    let mut block = format!("userlist {}\n", USER_LIST);
    for pair in users {
        match pair.split_once(':') {
            Some((user, pass)) => {
                let _ = writeln!(block, "    user {} insecure-password {}", user, pass);
            }
            None => tracing::warn!(entry = %pair, "Skipping malformed user entry"),
        }
    }
    block.push('\n');

    let mut out = String::with_capacity(text.len() + block.len());
    let mut inserted = false;
    for line in text.split_inclusive('\n') {
        if !inserted && line.trim_end() == SERVICES_FRONTEND {
            out.push_str(&block);
            inserted = true;
        }
        out.push_str(line);
    }
    if !inserted {
        tracing::warn!("Template has no '{}' section, userlist not added", SERVICES_FRONTEND);
    }
    out
}

/// Terminate TLS on `bind *:443` with every known certificate.
pub fn add_certs<P: AsRef<Path>>(text: &str, certs: &[P]) -> String {
    if certs.is_empty() {
        return text.to_string();
    }

    let mut clause = String::from(" ssl");
    for cert in certs {
        let _ = write!(clause, " crt {}", cert.as_ref().display());
    }

    map_lines(text, |line| {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 2 || words[0] != "bind" || words[1] != HTTPS_BIND {
            return None;
        }
        let (body, ending) = split_ending(line);
        Some(format!("{}{}{}", body, clause, ending))
    })
}

/// Append one `bind *:<port>` line per port to the end of the template,
/// which is the tail of `frontend services`.
pub fn add_bind_ports(text: &str, ports: &[String]) -> String {
    let mut out = String::with_capacity(text.len() + ports.len() * 16);
    out.push_str(text);
    for port in ports {
        let _ = write!(out, "\n    bind *:{}", port);
    }
    out
}

fn map_lines<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        match f(line) {
            Some(rewritten) => out.push_str(&rewritten),
            None => out.push_str(line),
        }
    }
    out
}

fn indentation(line: &str) -> &str {
    let end = line.len() - line.trim_start().len();
    &line[..end]
}

fn split_ending(line: &str) -> (&str, &str) {
    let body = line.trim_end_matches(['\r', '\n']);
    (body, &line[body.len()..])
}

/// Byte range of the `index`-th whitespace-separated token.
fn token_span(line: &str, index: usize) -> Option<Range<usize>> {
    let mut count = 0;
    let mut start = None;
    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                if count == index {
                    return Some(s..i);
                }
                count += 1;
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    start.filter(|_| count == index).map(|s| s..line.len())
}

fn replace_span(line: &str, span: Range<usize>, replacement: &str) -> String {
    format!("{}{}{}", &line[..span.start], replacement, &line[span.end..])
}
