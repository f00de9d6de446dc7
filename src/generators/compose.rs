//! Compose overlay generators.
//!
//! Two artifacts: one aggregate dictionary mapping every service name to
//! its port metadata, and one per-stack overlay rendered from a template
//! with `{{STACK_NAME}}`, `{{TIMESTAMP}}` and `{{SERVICES}}` substitution
//! points.

use super::write_artifact;
use crate::error::Result;
use crate::registry::{group_by_stack, normalize_identifier, Registry, Service};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default per-stack overlay template. Callers may supply their own as long
/// as it carries the three placeholders.
pub const DEFAULT_STACK_TEMPLATE: &str = "\
# Port overlay for stack '{{STACK_NAME}}'
# Generated at {{TIMESTAMP}} from the port registry. Do not edit.

services:
{{SERVICES}}";

/// One entry of the aggregate dictionary. Field order is the serialized
/// order, keep it stable.
#[derive(Debug, Serialize)]
struct DictionaryEntry<'a> {
    /// Environment variable that carries this service's port.
    env: String,
    port: u32,
    protocol: &'a str,
    stack: &'a str,
    owner: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    exposure: Option<&'a str>,
    #[serde(rename = "gatewayPath", skip_serializing_if = "Option::is_none")]
    gateway_path: Option<&'a str>,
}

pub fn render_dictionary(registry: &Registry, now: DateTime<Utc>) -> Result<String> {
    let mut entries: BTreeMap<&str, DictionaryEntry<'_>> = BTreeMap::new();
    for service in &registry.services {
        entries.insert(
            service.name.as_str(),
            DictionaryEntry {
                env: format!("{}_PORT", normalize_identifier(&service.name)),
                port: service.port,
                protocol: &service.protocol,
                stack: &service.stack,
                owner: &service.owner,
                description: &service.description,
                exposure: service.exposure.as_deref(),
                gateway_path: service.gateway_path.as_deref(),
            },
        );
    }

    // serde_yaml quotes and escapes free-text values, so descriptions with
    // embedded quotes cannot corrupt the document.
    let body = serde_yaml::to_string(&entries)?;
    Ok(format!(
        "# Aggregate service port dictionary. Generated at {}. Do not edit.\n{}",
        now.to_rfc3339(),
        body
    ))
}

pub async fn generate_dictionary(
    registry: Arc<Registry>,
    target: PathBuf,
    now: DateTime<Utc>,
) -> Result<()> {
    let content = render_dictionary(&registry, now)?;
    write_artifact(&target, &content).await?;
    tracing::info!("wrote {}", target.display());
    Ok(())
}

/// Render one stack's overlay from the template.
pub fn render_stack(
    template: &str,
    stack: &str,
    services: &[&Service],
    now: DateTime<Utc>,
) -> String {
    let mut block = String::new();
    for service in services {
        let key = normalize_identifier(&service.name);
        block.push_str(&format!("  {}:\n", service.name));
        block.push_str(&format!(
            "    ports:\n      - \"{port}:{port}\"\n",
            port = service.port
        ));
        block.push_str(&format!(
            "    environment:\n      - \"{}_PORT={}\"\n",
            key, service.port
        ));
    }

    template
        .replace("{{STACK_NAME}}", stack)
        .replace("{{TIMESTAMP}}", &now.to_rfc3339())
        .replace("{{SERVICES}}", &block)
}

/// Output file name for one stack's overlay.
pub fn stack_file_name(stack: &str) -> String {
    format!("docker-compose.{}.ports.yaml", stack)
}

pub async fn generate_stacks(
    registry: Arc<Registry>,
    out_dir: PathBuf,
    now: DateTime<Utc>,
) -> Result<()> {
    generate_stacks_with_template(registry, out_dir, DEFAULT_STACK_TEMPLATE, now).await
}

pub async fn generate_stacks_with_template(
    registry: Arc<Registry>,
    out_dir: PathBuf,
    template: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    for (stack, services) in group_by_stack(&registry.services) {
        let content = render_stack(template, &stack, &services, now);
        let target = Path::new(&out_dir).join(stack_file_name(&stack));
        write_artifact(&target, &content).await?;
        tracing::info!("wrote {}", target.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
    }

    fn sample_registry() -> Registry {
        let mut ranges = BTreeMap::new();
        ranges.insert("core".to_string(), "3000-3099".to_string());
        ranges.insert("data".to_string(), "5400-5499".to_string());
        Registry {
            version: "1.0.0".to_string(),
            last_updated: "2026-08-01".to_string(),
            ranges,
            services: vec![
                Service {
                    name: "api-gateway".to_string(),
                    stack: "core".to_string(),
                    port: 3000,
                    protocol: "http".to_string(),
                    owner: "platform".to_string(),
                    description: "the \"front\" door".to_string(),
                    container: Some(true),
                    exposure: Some("gateway".to_string()),
                    gateway_path: Some("/api".to_string()),
                    ..Default::default()
                },
                Service {
                    name: "orders-db".to_string(),
                    stack: "data".to_string(),
                    port: 5432,
                    protocol: "postgres".to_string(),
                    owner: "data-team".to_string(),
                    container: Some(true),
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn dictionary_keys_services_by_name_with_env_field() {
        let out = render_dictionary(&sample_registry(), fixed_now()).unwrap();
        assert!(out.contains("api-gateway:"));
        assert!(out.contains("env: API_GATEWAY_PORT"));
        assert!(out.contains("orders-db:"));
        assert!(out.contains("env: ORDERS_DB_PORT"));
        assert!(out.contains("gatewayPath: /api"));
    }

    #[test]
    fn dictionary_survives_embedded_quotes() {
        let out = render_dictionary(&sample_registry(), fixed_now()).unwrap();
        // Round-trips as YAML despite the quoted description.
        let parsed: serde_yaml::Value = serde_yaml::from_str(
            out.lines().skip(1).collect::<Vec<_>>().join("\n").as_str(),
        )
        .unwrap();
        assert_eq!(
            parsed["api-gateway"]["description"],
            serde_yaml::Value::String("the \"front\" door".to_string())
        );
    }

    #[test]
    fn stack_template_substitutes_all_placeholders() {
        let registry = sample_registry();
        let groups = group_by_stack(&registry.services);
        let (stack, services) = &groups[0];
        let out = render_stack(DEFAULT_STACK_TEMPLATE, stack, services, fixed_now());
        assert!(out.contains("stack 'core'"));
        assert!(out.contains("2026-08-01T12:00:00+00:00"));
        assert!(out.contains("api-gateway:"));
        assert!(out.contains("- \"3000:3000\""));
        assert!(out.contains("- \"API_GATEWAY_PORT=3000\""));
        assert!(!out.contains("{{"));
    }

    #[test]
    fn stack_file_names_follow_the_pattern() {
        assert_eq!(stack_file_name("core"), "docker-compose.core.ports.yaml");
    }
}
