//! Registry document loading, saving, and shared pure helpers.

use super::{Registry, Service};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads and saves the registry document at an explicit path.
///
/// The path is constructor input rather than resolved from the working
/// directory, so callers (and tests) control exactly which document is read.
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and parse the registry document.
    ///
    /// A malformed document is fatal: it is reported as a parse error naming
    /// the source path and must propagate to a non-zero exit.
    pub fn load(&self) -> Result<Registry> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::Config(format!(
                "Failed to read registry file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            Error::Parse(format!(
                "Failed to parse registry '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Serialize the registry back to its path.
    ///
    /// Serialization is deterministic (sorted range keys, stable struct field
    /// order, fixed indentation), so saving logically-identical data twice
    /// produces byte-identical files.
    pub fn save(&self, registry: &Registry) -> Result<()> {
        let content = serde_yaml::to_string(registry)?;
        fs::write(&self.path, content).map_err(|e| {
            Error::Filesystem(format!(
                "Failed to write registry file '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(())
    }
}

/// Group services by stack, preserving first-seen stack order and document
/// order within each stack.
pub fn group_by_stack(services: &[Service]) -> Vec<(String, Vec<&Service>)> {
    let mut groups: Vec<(String, Vec<&Service>)> = Vec::new();
    for service in services {
        match groups.iter_mut().find(|(stack, _)| *stack == service.stack) {
            Some((_, members)) => members.push(service),
            None => groups.push((service.stack.clone(), vec![service])),
        }
    }
    groups
}

/// Turn a service name into a constant-style identifier: every
/// non-alphanumeric byte becomes `_`, then uppercase.
///
/// Every generator that needs an env-style key goes through this function,
/// so `demo-container` is `DEMO_CONTAINER` in every artifact.
pub fn normalize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(name: &str, stack: &str) -> Service {
        Service {
            name: name.to_string(),
            stack: stack.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn normalize_identifier_uppercases_and_replaces() {
        assert_eq!(normalize_identifier("demo-container"), "DEMO_CONTAINER");
        assert_eq!(normalize_identifier("api.v2"), "API_V2");
        assert_eq!(normalize_identifier("plain"), "PLAIN");
    }

    #[test]
    fn group_by_stack_preserves_first_seen_order() {
        let services = vec![
            svc("a", "data"),
            svc("b", "core"),
            svc("c", "data"),
        ];
        let groups = group_by_stack(&services);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "data");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "core");
        assert_eq!(groups[1].1[0].name, "b");
    }
}
