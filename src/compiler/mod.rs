//! Configuration compiler subsystem.
//!
//! # Data Flow
//! ```text
//! <templates_dir>/haproxy.tmpl
//!     → template.rs (debug, timeouts, stats, userlist, certs, bind ports, extra frontend)
//!     → frontend.rs (rules for every registered service, name order)
//!     → dummy backend when nothing is registered and no fragments exist
//!     → fragments.rs (<configs_dir>/*-fe.cfg then *-be.cfg, verbatim)
//!     → <configs_dir>/haproxy.cfg
//!
//! reader.rs reads haproxy.cfg back for diagnostics.
//! ```
//!
//! # Design Decisions
//! - Textual substitution only; the proxy grammar is never parsed
//! - Every compile is a full rebuild; nothing is cached between calls
//! - Identical registry and options always give byte-identical output

pub mod assemble;
pub mod fragments;
pub mod frontend;
pub mod reader;
pub mod template;

pub use assemble::{CompiledConfig, ConfigCompiler};
pub use fragments::Fragments;
pub use reader::ConfigReader;
