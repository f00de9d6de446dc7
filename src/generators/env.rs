//! Environment file generator.
//!
//! Emits three entries per service: the numeric port, the host (service
//! name inside a container network, loopback otherwise), and the composed
//! endpoint URL.

use super::write_artifact;
use crate::error::Result;
use crate::registry::{normalize_identifier, Registry};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;

pub fn render(registry: &Registry, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("# Service endpoints, generated from the port registry. Do not edit.\n");
    out.push_str(&format!(
        "# Registry version {} (last updated {})\n",
        registry.version, registry.last_updated
    ));
    out.push_str(&format!("# Generated at {}\n", now.to_rfc3339()));

    for service in &registry.services {
        let key = normalize_identifier(&service.name);
        out.push('\n');
        out.push_str(&format!(
            "# {} ({}) owner: {}\n",
            service.name, service.stack, service.owner
        ));
        out.push_str(&format!("{}_PORT={}\n", key, service.port));
        out.push_str(&format!("{}_HOST={}\n", key, service.host()));
        out.push_str(&format!("{}_URL={}\n", key, service.url()));
    }

    out
}

pub async fn generate(
    registry: Arc<Registry>,
    target: PathBuf,
    now: DateTime<Utc>,
) -> Result<()> {
    let content = render(&registry, now);
    write_artifact(&target, &content).await?;
    tracing::info!("wrote {}", target.display());
    Ok(())
}
