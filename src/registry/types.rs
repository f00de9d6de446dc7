//! Registry document types.
//!
//! This module contains the [`Registry`] struct and related types for the
//! declarative service port registry document.
//!
//! Fields that the validator checks are deserialized loosely (strings and
//! options rather than strict enums) so that a single load surfaces every
//! problem as a batched validation error instead of failing on the first
//! malformed field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest port a service may claim. Everything below is reserved for the OS.
pub const MIN_PORT: u32 = 1024;

/// Highest valid TCP/UDP port.
pub const MAX_PORT: u32 = 65535;

/// Protocols the registry accepts for a service.
pub const SUPPORTED_PROTOCOLS: &[&str] = &[
    "http", "https", "postgres", "redis", "amqp", "grpc", "tcp", "udp",
];

/// The full registry document.
///
/// ```yaml
/// version: "1.2.0"
/// lastUpdated: "2026-08-01"
/// ranges:
///   core: "3000-3099"
///   data: "5400-5499"
/// services:
///   - name: api-gateway
///     stack: core
///     port: 3000
///     protocol: http
///     owner: platform-team
///     container: true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    /// Registry document version (semver).
    pub version: String,

    /// Date of the last manual edit (ISO calendar date).
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,

    /// Port range per stack, as "min-max" strings.
    pub ranges: BTreeMap<String, String>,

    /// All registered services, in document order.
    pub services: Vec<Service>,
}

/// One registered service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier, lowercase kebab-case.
    pub name: String,

    /// Owning stack; must be a key of `Registry::ranges`.
    pub stack: String,

    /// Globally unique port. Deserialized as u32 so out-of-bounds values
    /// reach the validator instead of failing the parse.
    pub port: u32,

    /// One of [`SUPPORTED_PROTOCOLS`]; validated, not enforced by serde.
    pub protocol: String,

    /// Owning team or person. Free text, must be non-empty.
    pub owner: String,

    #[serde(default)]
    pub description: String,

    /// Whether the service runs in an isolated network namespace.
    /// Optional so a missing flag is a validation error, not a parse error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<bool>,

    /// Container network namespace; recommended when `container` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    /// One of `direct`, `gateway`, `internal`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure: Option<String>,

    /// Required (leading slash) when `exposure` is `gateway`.
    #[serde(rename = "gatewayPath", skip_serializing_if = "Option::is_none")]
    pub gateway_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<Healthcheck>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,

    /// Name of the service replacing this one, when deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

fn is_false(b: &bool) -> bool {
    !b
}

/// Liveness probe declaration for a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Healthcheck {
    /// Probe target: a path like `/health` (resolved against the service's
    /// host and port) or a full URL.
    pub endpoint: String,

    /// HTTP status the probe must return.
    pub expected: u16,
}

/// Exposure values the validator accepts.
pub const EXPOSURE_VALUES: &[&str] = &["direct", "gateway", "internal"];

impl Service {
    /// Host other services use to reach this one: the service name inside a
    /// container network, the loopback host otherwise.
    pub fn host(&self) -> &str {
        if self.container.unwrap_or(false) {
            &self.name
        } else {
            "127.0.0.1"
        }
    }

    /// URL scheme for this service's protocol. Anything without a URL-ish
    /// scheme falls back to raw `tcp`.
    pub fn url_scheme(&self) -> &str {
        match self.protocol.as_str() {
            "http" => "http",
            "https" => "https",
            "postgres" => "postgres",
            "redis" => "redis",
            "amqp" => "amqp",
            "grpc" => "grpc",
            _ => "tcp",
        }
    }

    /// Endpoint URL composed from scheme, host and port.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.url_scheme(), self.host(), self.port)
    }
}

/// Parse a `"min-max"` range string into a numeric pair.
///
/// Returns `None` for anything that is not two dash-separated integers in
/// ascending order.
pub fn parse_range(range: &str) -> Option<(u32, u32)> {
    let (min, max) = range.split_once('-')?;
    let min: u32 = min.trim().parse().ok()?;
    let max: u32 = max.trim().parse().ok()?;
    if min > max {
        return None;
    }
    Some((min, max))
}
