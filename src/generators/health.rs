//! Health-check script generator.
//!
//! Emits one executable bash script with a probe per declared healthcheck.
//! The script compares each response status against the declared
//! expectation and exits non-zero if any probe fails.

use super::write_artifact;
use crate::error::{Error, Result};
use crate::registry::{Registry, Service};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;

/// Escape a value for a single-quoted shell string.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Probe URL for a service: paths resolve against the service's own host
/// and port; anything else is taken as a full URL.
fn probe_url(service: &Service, endpoint: &str) -> String {
    if let Some(path) = endpoint.strip_prefix('/') {
        let scheme = if service.protocol == "https" {
            "https"
        } else {
            "http"
        };
        format!("{}://{}:{}/{}", scheme, service.host(), service.port, path)
    } else {
        endpoint.to_string()
    }
}

pub fn render(registry: &Registry, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("#!/usr/bin/env bash\n");
    out.push_str("# Health probes generated from the port registry. Do not edit.\n");
    out.push_str(&format!("# Generated at {}\n\n", now.to_rfc3339()));
    out.push_str("set -u\n\nFAILURES=0\n\n");
    out.push_str(
        "probe() {\n\
         \x20 local name=\"$1\" url=\"$2\" expected=\"$3\"\n\
         \x20 local status\n\
         \x20 status=$(curl -s -o /dev/null -w '%{http_code}' --max-time 5 \"$url\" || echo 000)\n\
         \x20 if [ \"$status\" = \"$expected\" ]; then\n\
         \x20   echo \"ok   $name ($url)\"\n\
         \x20 else\n\
         \x20   echo \"FAIL $name ($url): expected $expected, got $status\"\n\
         \x20   FAILURES=$((FAILURES + 1))\n\
         \x20 fi\n\
         }\n\n",
    );

    for service in &registry.services {
        if let Some(hc) = &service.healthcheck {
            out.push_str(&format!(
                "probe {} {} {}\n",
                shell_quote(&service.name),
                shell_quote(&probe_url(service, &hc.endpoint)),
                shell_quote(&hc.expected.to_string()),
            ));
        }
    }

    out.push_str("\nif [ \"$FAILURES\" -gt 0 ]; then\n");
    out.push_str("  echo \"$FAILURES health check(s) failed\"\n");
    out.push_str("  exit 1\nfi\n");
    out.push_str("echo \"all health checks passed\"\n");
    out
}

pub async fn generate(
    registry: Arc<Registry>,
    target: PathBuf,
    now: DateTime<Utc>,
) -> Result<()> {
    let content = render(&registry, now);
    write_artifact(&target, &content).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o755))
            .await
            .map_err(|e| {
                Error::Filesystem(format!(
                    "Failed to mark '{}' executable: {}",
                    target.display(),
                    e
                ))
            })?;
    }

    tracing::info!("wrote {}", target.display());
    Ok(())
}
