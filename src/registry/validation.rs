//! Registry validation.
//!
//! Validation is a pure function over the loaded document. All violations
//! are collected in one pass (no fail-fast) so a single run produces the
//! complete error report, and every error carries a discrete category so
//! callers filter on the category rather than on message text.

use super::{
    parse_range, Registry, EXPOSURE_VALUES, MAX_PORT, MIN_PORT, SUPPORTED_PROTOCOLS,
};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

fn semver_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("static regex pattern is valid"))
}

fn iso_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static regex pattern is valid"))
}

fn kebab_case_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("static regex pattern is valid")
    })
}

/// Discrete category of a validation error, used for filtered gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCategory {
    InvalidVersion,
    InvalidDate,
    MissingField,
    MalformedRange,
    UnknownStack,
    PortOutOfBounds,
    PortOutOfRange,
    DuplicatePort,
    DuplicateName,
    InvalidName,
    InvalidProtocol,
    MissingOwner,
    MissingContainerFlag,
    InvalidExposure,
    InvalidGatewayPath,
    UnknownDependency,
}

/// One validation error: a category plus a human-readable message.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub category: IssueCategory,
    pub message: String,
}

impl ValidationIssue {
    fn new(category: IssueCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Summary statistics gathered during validation.
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    pub services: usize,
    pub stacks: BTreeMap<String, usize>,
}

/// Outcome of validating a registry document.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<String>,
    pub stats: RegistryStats,
}

impl ValidationReport {
    /// True iff no errors were found. Warnings never affect validity.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors matching the given category predicate.
    pub fn errors_in<F: Fn(IssueCategory) -> bool>(&self, pred: F) -> Vec<&ValidationIssue> {
        self.errors
            .iter()
            .filter(|issue| pred(issue.category))
            .collect()
    }
}

/// Validate a loaded registry document against every structural and
/// cross-referential invariant.
///
/// Two phases: top-level shape (version, date, ranges, services present;
/// every range string parsed, one error per malformed stack), then
/// per-service invariants in document order followed by a dependency pass
/// that runs after all names are known, so declaration order never causes
/// false negatives.
pub fn validate(registry: &Registry) -> ValidationReport {
    let mut report = ValidationReport::default();

    // ── Phase 1: top-level shape ──────────────────────────────────────
    if !semver_regex().is_match(&registry.version) {
        report.errors.push(ValidationIssue::new(
            IssueCategory::InvalidVersion,
            format!(
                "Registry version '{}' is not a semantic version (expected MAJOR.MINOR.PATCH)",
                registry.version
            ),
        ));
    }

    if !iso_date_regex().is_match(&registry.last_updated) {
        report.errors.push(ValidationIssue::new(
            IssueCategory::InvalidDate,
            format!(
                "Registry lastUpdated '{}' is not an ISO date (expected YYYY-MM-DD)",
                registry.last_updated
            ),
        ));
    }

    if registry.ranges.is_empty() {
        report.errors.push(ValidationIssue::new(
            IssueCategory::MissingField,
            "Registry declares no stack ranges",
        ));
    }

    if registry.services.is_empty() {
        report.errors.push(ValidationIssue::new(
            IssueCategory::MissingField,
            "Registry declares no services",
        ));
    }

    // Parse every range string, collecting one error per malformed stack
    // without discarding the rest of the document.
    let mut parsed_ranges: HashMap<&str, (u32, u32)> = HashMap::new();
    for (stack, range) in &registry.ranges {
        match parse_range(range) {
            Some(pair) => {
                parsed_ranges.insert(stack.as_str(), pair);
            }
            None => report.errors.push(ValidationIssue::new(
                IssueCategory::MalformedRange,
                format!(
                    "Stack '{}' has malformed port range '{}' (expected \"min-max\")",
                    stack, range
                ),
            )),
        }
    }

    // ── Phase 2: per-service invariants, in document order ────────────
    let mut ports_seen: HashMap<u32, &str> = HashMap::new();
    let mut names_seen: HashSet<&str> = HashSet::new();

    for service in &registry.services {
        let name = service.name.as_str();

        // Stack reference
        if !registry.ranges.contains_key(&service.stack) {
            report.errors.push(ValidationIssue::new(
                IssueCategory::UnknownStack,
                format!(
                    "Service '{}' references unknown stack '{}'",
                    name, service.stack
                ),
            ));
        }

        // Port bounds and per-stack range
        if service.port < MIN_PORT || service.port > MAX_PORT {
            report.errors.push(ValidationIssue::new(
                IssueCategory::PortOutOfBounds,
                format!(
                    "Service '{}' port {} is outside the allowed bounds {}-{}",
                    name, service.port, MIN_PORT, MAX_PORT
                ),
            ));
        }
        if let Some((min, max)) = parsed_ranges.get(service.stack.as_str()) {
            if service.port < *min || service.port > *max {
                report.errors.push(ValidationIssue::new(
                    IssueCategory::PortOutOfRange,
                    format!(
                        "Service '{}' port {} is outside stack range {}-{} for '{}'",
                        name, service.port, min, max, service.stack
                    ),
                ));
            }
        }

        // Global port uniqueness: the second claimant produces the error,
        // naming both services.
        match ports_seen.get(&service.port) {
            Some(first) => {
                report.errors.push(ValidationIssue::new(
                    IssueCategory::DuplicatePort,
                    format!(
                        "Port {} is claimed by multiple services: '{}' and '{}'",
                        service.port, first, name
                    ),
                ));
            }
            None => {
                ports_seen.insert(service.port, name);
            }
        }

        // Name uniqueness and shape
        if !names_seen.insert(name) {
            report.errors.push(ValidationIssue::new(
                IssueCategory::DuplicateName,
                format!("Service name '{}' is declared more than once", name),
            ));
        }
        if !kebab_case_regex().is_match(name) {
            report.errors.push(ValidationIssue::new(
                IssueCategory::InvalidName,
                format!(
                    "Service name '{}' is not lowercase kebab-case (e.g. 'api-gateway')",
                    name
                ),
            ));
        }

        // Protocol
        if !SUPPORTED_PROTOCOLS.contains(&service.protocol.as_str()) {
            report.errors.push(ValidationIssue::new(
                IssueCategory::InvalidProtocol,
                format!(
                    "Service '{}' has unsupported protocol '{}' (supported: {})",
                    name,
                    service.protocol,
                    SUPPORTED_PROTOCOLS.join(", ")
                ),
            ));
        }

        // Owner
        if service.owner.trim().is_empty() {
            report.errors.push(ValidationIssue::new(
                IssueCategory::MissingOwner,
                format!("Service '{}' has no owner", name),
            ));
        }

        // Container flag must be declared explicitly
        if service.container.is_none() {
            report.errors.push(ValidationIssue::new(
                IssueCategory::MissingContainerFlag,
                format!("Service '{}' is missing the 'container' flag", name),
            ));
        }

        // Exposure and gateway path
        if let Some(exposure) = &service.exposure {
            if !EXPOSURE_VALUES.contains(&exposure.as_str()) {
                report.errors.push(ValidationIssue::new(
                    IssueCategory::InvalidExposure,
                    format!(
                        "Service '{}' has invalid exposure '{}' (expected one of: {})",
                        name,
                        exposure,
                        EXPOSURE_VALUES.join(", ")
                    ),
                ));
            }
            if exposure == "gateway" {
                match &service.gateway_path {
                    Some(path) if path.starts_with('/') => {}
                    Some(path) => report.errors.push(ValidationIssue::new(
                        IssueCategory::InvalidGatewayPath,
                        format!(
                            "Service '{}' gatewayPath '{}' must start with '/'",
                            name, path
                        ),
                    )),
                    None => report.errors.push(ValidationIssue::new(
                        IssueCategory::InvalidGatewayPath,
                        format!(
                            "Service '{}' has exposure 'gateway' but no gatewayPath",
                            name
                        ),
                    )),
                }
            }
        }

        collect_warnings(service, &mut report.warnings);

        *report.stats.stacks.entry(service.stack.clone()).or_insert(0) += 1;
    }

    // Dependency pass runs after every name has been collected, so a
    // service may depend on one declared later in the document.
    for service in &registry.services {
        for dep in &service.depends_on {
            if !names_seen.contains(dep.as_str()) {
                report.errors.push(ValidationIssue::new(
                    IssueCategory::UnknownDependency,
                    format!(
                        "Service '{}' depends on unknown service '{}'",
                        service.name, dep
                    ),
                ));
            }
        }
    }

    report.stats.services = registry.services.len();
    report
}

/// Advisory checks. Warnings never gate artifact generation.
fn collect_warnings(service: &super::Service, warnings: &mut Vec<String>) {
    let name = &service.name;

    if service.description.trim().len() < 10 {
        warnings.push(format!(
            "Service '{}' has a very short description; add a sentence about what it does",
            name
        ));
    }

    if service.container == Some(true) && service.network.is_none() {
        warnings.push(format!(
            "Service '{}' runs in a container but declares no network",
            name
        ));
    }

    if service.gateway_path.is_some() && service.exposure.as_deref() != Some("gateway") {
        warnings.push(format!(
            "Service '{}' sets gatewayPath but exposure is not 'gateway'; the path is ignored",
            name
        ));
    }

    if matches!(service.protocol.as_str(), "http" | "https") && service.healthcheck.is_none() {
        warnings.push(format!(
            "Service '{}' speaks {} but declares no healthcheck",
            name, service.protocol
        ));
    }

    if service.deprecated && service.replacement.is_none() {
        warnings.push(format!(
            "Deprecated service '{}' names no replacement",
            name
        ));
    }
}
