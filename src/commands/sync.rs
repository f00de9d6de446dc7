use crate::output::UserOutput;
use chrono::Utc;
use port_registry::generators::{run_all, OutputTargets};
use port_registry::{validate, Error, RegistryStore};
use std::path::Path;
use std::sync::Arc;

/// Validate the registry and, if error-free, regenerate every artifact.
///
/// Fails fast before any generator runs the moment validation reports an
/// error; the generators themselves run concurrently once validation passes.
pub async fn run_sync(
    store: &RegistryStore,
    out_dir: &Path,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    out.status(&format!("Syncing from {}...", store.path().display()));

    let registry = store.load()?;
    let report = validate(&registry);

    if !report.is_valid() {
        out.error(&format!(
            "Registry has {} validation error(s); nothing generated:",
            report.errors.len()
        ));
        for issue in &report.errors {
            out.error(&format!("  - {}", issue));
        }
        return Err(Error::Validation(report.errors.len()).into());
    }

    for warning in &report.warnings {
        out.warning(&format!("warning: {}", warning));
    }

    let targets = OutputTargets::under(out_dir);
    run_all(Arc::new(registry), targets, Utc::now()).await?;

    out.success(&format!(
        "Generated all artifacts for {} service(s) across {} stack(s) under {}",
        report.stats.services,
        report.stats.stacks.len(),
        out_dir.display()
    ));
    Ok(())
}
