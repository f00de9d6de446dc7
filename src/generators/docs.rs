//! Documentation generator: a Markdown page with the declared port ranges
//! and one service table per stack.

use super::write_artifact;
use crate::error::Result;
use crate::registry::Registry;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;

/// Escape characters that would break a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

pub fn render(registry: &Registry, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("# Service Port Registry\n\n");
    out.push_str(&format!(
        "Registry version {} (last updated {}). Generated at {}.\n\n",
        registry.version,
        registry.last_updated,
        now.to_rfc3339()
    ));

    // Ranges table, sorted by stack key. BTreeMap iteration is already
    // alphabetic.
    out.push_str("## Port Ranges\n\n");
    out.push_str("| Stack | Range |\n");
    out.push_str("|-------|-------|\n");
    for (stack, range) in &registry.ranges {
        out.push_str(&format!("| {} | {} |\n", escape_cell(stack), escape_cell(range)));
    }

    // One table per stack that has at least one service, rows by ascending
    // port.
    for (stack, _) in &registry.ranges {
        let mut members: Vec<_> = registry
            .services
            .iter()
            .filter(|s| &s.stack == stack)
            .collect();
        if members.is_empty() {
            continue;
        }
        members.sort_by_key(|s| s.port);

        out.push_str(&format!("\n## {}\n\n", stack));
        out.push_str("| Service | Port | Protocol | Owner | Status | Description |\n");
        out.push_str("|---------|------|----------|-------|--------|-------------|\n");
        for service in members {
            let status = if service.deprecated {
                "Deprecated"
            } else {
                "Active"
            };
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                escape_cell(&service.name),
                service.port,
                escape_cell(&service.protocol),
                escape_cell(&service.owner),
                status,
                escape_cell(&service.description),
            ));
        }
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
