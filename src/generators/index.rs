//! Machine-readable index generator: one canonical JSON snapshot of the
//! registry with a stable field order, services sorted by port.

use super::write_artifact;
use crate::error::Result;
use crate::registry::{Registry, Service};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct Index<'a> {
    version: &'a str,
    #[serde(rename = "lastUpdated")]
    last_updated: &'a str,
    #[serde(rename = "generatedAt")]
    generated_at: String,
    ranges: &'a BTreeMap<String, String>,
    services: Vec<&'a Service>,
}

pub fn render(registry: &Registry, now: DateTime<Utc>) -> Result<String> {
    let mut services: Vec<&Service> = registry.services.iter().collect();
    services.sort_by_key(|s| s.port);

    let index = Index {
        version: &registry.version,
        last_updated: &registry.last_updated,
        generated_at: now.to_rfc3339(),
        ranges: &registry.ranges,
        services,
    };

    let mut content = serde_json::to_string_pretty(&index)?;
    content.push('\n');
    Ok(content)
}

pub async fn generate(
    registry: Arc<Registry>,
    target: PathBuf,
    now: DateTime<Utc>,
) -> Result<()> {
    let content = render(&registry, now)?;
    write_artifact(&target, &content).await?;
    tracing::info!("wrote {}", target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn index_sorts_services_by_port_and_keeps_field_order() {
        let mut ranges = BTreeMap::new();
        ranges.insert("core".to_string(), "3000-3099".to_string());
        let registry = Registry {
            version: "2.1.0".to_string(),
            last_updated: "2026-08-01".to_string(),
            ranges,
            services: vec![
                Service {
                    name: "later".to_string(),
                    stack: "core".to_string(),
                    port: 3090,
                    protocol: "http".to_string(),
                    container: Some(false),
                    ..Default::default()
                },
                Service {
                    name: "earlier".to_string(),
                    stack: "core".to_string(),
                    port: 3001,
                    protocol: "http".to_string(),
                    container: Some(false),
                    ..Default::default()
                },
            ],
        };

        let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let out = render(&registry, now).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["version"], "2.1.0");
        assert_eq!(parsed["generatedAt"], "2026-08-01T12:00:00+00:00");
        assert_eq!(parsed["services"][0]["name"], "earlier");
        assert_eq!(parsed["services"][1]["name"], "later");

        // Top-level key order is part of the contract.
        let version_pos = out.find("\"version\"").unwrap();
        let updated_pos = out.find("\"lastUpdated\"").unwrap();
        let generated_pos = out.find("\"generatedAt\"").unwrap();
        let ranges_pos = out.find("\"ranges\"").unwrap();
        let services_pos = out.find("\"services\"").unwrap();
        assert!(version_pos < updated_pos);
        assert!(updated_pos < generated_pos);
        assert!(generated_pos < ranges_pos);
        assert!(ranges_pos < services_pos);
    }
}
