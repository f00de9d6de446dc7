use crate::output::UserOutput;
use port_registry::{scan, Error, RegistryStore};
use std::collections::HashSet;
use std::path::PathBuf;

/// Roots walked when none are given: the top-level source directories of a
/// typical monorepo. Bounding the walk keeps false positives down.
const DEFAULT_ROOTS: &[&str] = &["src", "services", "apps", "packages"];

/// Scan source roots for hardcoded references to registry-governed ports.
pub fn run_scan(
    store: &RegistryStore,
    roots: &[PathBuf],
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    let registry = store.load()?;
    let allowed_ports: HashSet<u32> = registry.services.iter().map(|s| s.port).collect();

    let roots: Vec<PathBuf> = if roots.is_empty() {
        DEFAULT_ROOTS.iter().map(PathBuf::from).collect()
    } else {
        roots.to_vec()
    };

    out.status(&format!(
        "Scanning {} root(s) for {} governed port(s)...",
        roots.len(),
        allowed_ports.len()
    ));

    let violations = scan(&roots, &allowed_ports)?;

    if violations.is_empty() {
        out.success("No hardcoded port references found");
        return Ok(());
    }

    for violation in &violations {
        out.error(&format!(
            "{}:{}: port {} is hardcoded: {}",
            violation.file.display(),
            violation.line,
            violation.port,
            violation.context
        ));
    }
    Err(Error::HardcodedPorts(violations.len()).into())
}
