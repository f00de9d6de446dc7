use crate::cli::ValidateMode;
use crate::output::UserOutput;
use port_registry::{validate, Error, IssueCategory, RegistryStore};

/// True when an error in this category gates the exit code under the given
/// mode. Filtering is on the category tag, never on message text.
fn gates(mode: ValidateMode, category: IssueCategory) -> bool {
    match mode {
        ValidateMode::Full => true,
        ValidateMode::Duplicates => category == IssueCategory::DuplicatePort,
        ValidateMode::Ranges => matches!(
            category,
            IssueCategory::MalformedRange
                | IssueCategory::PortOutOfRange
                | IssueCategory::PortOutOfBounds
        ),
    }
}

/// Validate the registry and report every finding. Exit code is gated by
/// the selected error-category filter; non-matching errors are still
/// printed as informational.
pub fn run_validate(
    store: &RegistryStore,
    mode: ValidateMode,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    out.status(&format!("Validating {}...", store.path().display()));

    let registry = store.load()?;
    let report = validate(&registry);

    let mut gating = 0usize;
    for issue in &report.errors {
        if gates(mode, issue.category) {
            gating += 1;
            out.error(&format!("error: {}", issue));
        } else {
            out.status(&format!("info (not gated by --mode): {}", issue));
        }
    }

    for warning in &report.warnings {
        out.warning(&format!("warning: {}", warning));
    }

    out.blank();
    out.status(&format!(
        "{} service(s), {} stack(s), {} error(s) ({} gating), {} warning(s)",
        report.stats.services,
        report.stats.stacks.len(),
        report.errors.len(),
        gating,
        report.warnings.len()
    ));

    if gating > 0 {
        return Err(Error::Validation(gating).into());
    }
    out.success("Registry is valid");
    Ok(())
}
