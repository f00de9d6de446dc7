//! # Port Registry
//!
//! A configuration-governance engine for service ports. One declarative
//! YAML document enumerates every network-addressable service in a
//! deployment; this crate validates it and compiles it into derived
//! artifacts.
//!
//! ## Features
//!
//! - **Validation**: batch-reported structural and cross-referential checks
//!   with structured error categories
//! - **Generators**: env file, Markdown docs, compose dictionary, per-stack
//!   compose overlays, JSON index, and a health-check script, run as
//!   concurrent tasks against the same immutable registry
//! - **Scanner**: flags hardcoded loopback `host:port` literals that bypass
//!   the registry
//!
//! ## Quick Start
//!
//! ```no_run
//! use port_registry::{validate, RegistryStore};
//!
//! # fn example() -> Result<(), port_registry::Error> {
//! let store = RegistryStore::new("ports.yaml");
//! let registry = store.load()?;
//!
//! let report = validate(&registry);
//! if report.is_valid() {
//!     println!("{} services across {} stacks", report.stats.services, report.stats.stacks.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Every run is stateless: the document is re-read and every artifact
//! re-emitted from scratch. Timestamps are injected, never read from the
//! clock inside a generator, so generation is deterministic.

pub mod error;
pub mod generators;
pub mod registry;
pub mod scanner;

// Re-export commonly used types
pub use error::{Error, Result};
pub use registry::{
    group_by_stack, normalize_identifier, validate, Healthcheck, IssueCategory, Registry,
    RegistryStore, Service, ValidationIssue, ValidationReport,
};
pub use scanner::{scan, Violation};
