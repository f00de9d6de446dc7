use crate::output::UserOutput;
use port_registry::{validate, RegistryStore};

/// Print a read-only registry summary. Validation runs only to gather
/// statistics; its findings never fail this command.
pub fn run_report(store: &RegistryStore, out: &dyn UserOutput) -> anyhow::Result<()> {
    let registry = store.load()?;
    let report = validate(&registry);

    out.status(&format!(
        "Registry {} (version {}, last updated {})",
        store.path().display(),
        registry.version,
        registry.last_updated
    ));
    out.blank();

    out.status(&format!("Services: {}", report.stats.services));
    for (stack, count) in &report.stats.stacks {
        out.status(&format!("  - {}: {} service(s)", stack, count));
    }

    out.blank();
    out.status(&format!("Declared ranges: {}", registry.ranges.len()));
    for (stack, range) in &registry.ranges {
        out.status(&format!("  - {}: {}", stack, range));
    }

    if !report.errors.is_empty() || !report.warnings.is_empty() {
        out.blank();
        out.status(&format!(
            "{} error(s) and {} warning(s) pending; see `portreg validate`",
            report.errors.len(),
            report.warnings.len()
        ));
    }

    Ok(())
}
