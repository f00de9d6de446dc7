//! Artifact generators.
//!
//! Each generator is a deterministic mapping from (registry, output target,
//! injected timestamp) to one written artifact. The `render` functions are
//! pure so tests can fix `now` and assert exact output; the `generate`
//! functions add the file write.
//!
//! The six generators have no data dependency on one another, so
//! [`run_all`] spawns one task per generator, joins all of them, and
//! aggregates failures instead of letting the first one mask the rest.

pub mod compose;
pub mod docs;
pub mod env;
pub mod health;
pub mod index;

use crate::error::{Error, Result};
use crate::registry::Registry;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Output paths for every artifact, threaded in explicitly so generation is
/// a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct OutputTargets {
    pub env_file: PathBuf,
    pub docs_file: PathBuf,
    pub compose_dictionary: PathBuf,
    /// Directory receiving one `docker-compose.<stack>.ports.yaml` per stack.
    pub compose_dir: PathBuf,
    pub index_file: PathBuf,
    pub health_script: PathBuf,
}

impl OutputTargets {
    /// Default artifact layout under a single output root.
    pub fn under(root: &Path) -> Self {
        Self {
            env_file: root.join("ports.env"),
            docs_file: root.join("PORTS.md"),
            compose_dictionary: root.join("docker-compose.ports.yaml"),
            compose_dir: root.join("compose"),
            index_file: root.join("ports.index.json"),
            health_script: root.join("check-ports-health.sh"),
        }
    }
}

/// Run every generator concurrently against the same immutable registry.
///
/// All failures are collected; a single failing generator never suppresses
/// the others.
pub async fn run_all(
    registry: Arc<Registry>,
    targets: OutputTargets,
    now: DateTime<Utc>,
) -> Result<()> {
    let jobs: Vec<(&'static str, tokio::task::JoinHandle<Result<()>>)> = vec![
        (
            "env",
            tokio::spawn(env::generate(registry.clone(), targets.env_file, now)),
        ),
        (
            "docs",
            tokio::spawn(docs::generate(registry.clone(), targets.docs_file, now)),
        ),
        (
            "compose-dictionary",
            tokio::spawn(compose::generate_dictionary(
                registry.clone(),
                targets.compose_dictionary,
                now,
            )),
        ),
        (
            "compose-stacks",
            tokio::spawn(compose::generate_stacks(
                registry.clone(),
                targets.compose_dir,
                now,
            )),
        ),
        (
            "index",
            tokio::spawn(index::generate(registry.clone(), targets.index_file, now)),
        ),
        (
            "health-script",
            tokio::spawn(health::generate(registry, targets.health_script, now)),
        ),
    ];

    let mut failures = Vec::new();
    for (name, handle) in jobs {
        match handle.await {
            Ok(Ok(())) => tracing::debug!("generator '{}' finished", name),
            Ok(Err(e)) => failures.push(Error::Generator {
                name: name.to_string(),
                reason: e.to_string(),
            }),
            Err(e) => failures.push(Error::Generator {
                name: name.to_string(),
                reason: format!("task panicked: {}", e),
            }),
        }
    }

    if failures.is_empty() {
        Ok(())
    } else if failures.len() == 1 {
        Err(failures.remove(0))
    } else {
        Err(Error::Multiple(failures))
    }
}

/// Write an artifact, creating its parent directory first. Each generator
/// owns its output directory.
pub(crate) async fn write_artifact(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Filesystem(format!(
                    "Failed to create output directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    tokio::fs::write(path, content).await.map_err(|e| {
        Error::Filesystem(format!("Failed to write '{}': {}", path.display(), e))
    })?;
    Ok(())
}
