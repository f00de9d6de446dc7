//! Hardcoded-port scanner.
//!
//! Walks an allow-list of source roots and flags literal loopback
//! `host:port` bindings whose port is governed by the registry. Ports the
//! registry does not know about are out of scope and never flagged.

use crate::error::Result;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// Marker comment that exempts a line from scanning.
pub const IGNORE_MARKER: &str = "portreg:ignore";

/// Directories never descended into: build output, dependency caches,
/// tests, logs and reports are full of intentional literals.
const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "dist",
    "build",
    "out",
    ".git",
    "coverage",
    "__pycache__",
    ".next",
    "logs",
    "reports",
    "test",
    "tests",
    "__tests__",
];

/// Only these extensions are treated as scannable source text.
const SCANNED_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "mjs", "cjs", "py", "rs", "go", "java", "kt", "rb", "sh", "yaml",
    "yml", "json", "toml", "env", "conf",
];

/// Substrings that mark a line as compliant indirection through
/// configuration or the environment.
const ENV_REFERENCE_PATTERNS: &[&str] = &[
    "process.env",
    "std::env",
    "env::var",
    "os.environ",
    "getenv",
    "ENV[",
    "${",
    "config.",
    "settings.",
];

fn binding_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:localhost|127\.0\.0\.1|0\.0\.0\.0):(\d{4,5})\b")
            .expect("static regex pattern is valid")
    })
}

/// One hardcoded binding of a governed port.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub file: PathBuf,
    pub line: usize,
    pub port: u32,
    pub context: String,
}

fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("//")
        || trimmed.starts_with('#')
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
        || trimmed.starts_with("--")
}

fn references_environment(line: &str) -> bool {
    ENV_REFERENCE_PATTERNS.iter().any(|p| line.contains(p))
}

fn should_scan(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SCANNED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Scan one file's lines for governed-port literals.
fn scan_file(path: &Path, allowed_ports: &HashSet<u32>, violations: &mut Vec<Violation>) {
    // Binary or unreadable files are silently skipped; the scanner is
    // advisory and must not abort the whole walk.
    let Ok(content) = fs::read_to_string(path) else {
        tracing::debug!("skipping unreadable file {}", path.display());
        return;
    };

    for (idx, line) in content.lines().enumerate() {
        if line.contains(IGNORE_MARKER) {
            continue;
        }
        let trimmed = line.trim_start();
        if is_comment_line(trimmed) || references_environment(line) {
            continue;
        }
        for captures in binding_regex().captures_iter(line) {
            let Ok(port) = captures[1].parse::<u32>() else {
                continue;
            };
            if allowed_ports.contains(&port) {
                violations.push(Violation {
                    file: path.to_path_buf(),
                    line: idx + 1,
                    port,
                    context: line.trim().to_string(),
                });
            }
        }
    }
}

/// Walk the given roots and return every hardcoded binding of a port in
/// `allowed_ports`. Roots that do not exist are skipped silently so the
/// caller can pass a fixed allow-list of top-level directories.
pub fn scan(roots: &[PathBuf], allowed_ports: &HashSet<u32>) -> Result<Vec<Violation>> {
    let mut violations = Vec::new();

    for root in roots {
        if !root.exists() {
            tracing::debug!("scan root {} does not exist, skipping", root.display());
            continue;
        }
        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
        });
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("walk error under {}: {}", root.display(), e);
                    continue;
                }
            };
            if entry.file_type().is_file() && should_scan(entry.path()) {
                scan_file(entry.path(), allowed_ports, &mut violations);
            }
        }
    }

    Ok(violations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> HashSet<u32> {
        [3001u32, 5432].into_iter().collect()
    }

    fn scan_str(content: &str) -> Vec<Violation> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.js");
        fs::write(&path, content).unwrap();
        scan(&[dir.path().to_path_buf()], &allowed()).unwrap()
    }

    #[test]
    fn governed_port_literal_is_flagged() {
        let violations = scan_str("const api = 'http://localhost:3001';\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].port, 3001);
        assert_eq!(violations[0].line, 1);
        assert!(violations[0].context.contains("localhost:3001"));
    }

    #[test]
    fn ungoverned_port_is_out_of_scope() {
        let violations = scan_str("const api = 'http://localhost:9999';\n");
        assert!(violations.is_empty());
    }

    #[test]
    fn comments_markers_and_env_lines_are_skipped() {
        let violations = scan_str(
            "// http://localhost:3001\n\
             # http://localhost:3001\n\
             const a = 'http://localhost:3001'; // portreg:ignore\n\
             const b = `http://localhost:${process.env.API_PORT}`;\n",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn skipped_directories_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("node_modules");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("dep.js"), "fetch('http://127.0.0.1:3001')\n").unwrap();
        let violations = scan(&[dir.path().to_path_buf()], &allowed()).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn non_source_extensions_are_not_scanned() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "localhost:3001\n").unwrap();
        let violations = scan(&[dir.path().to_path_buf()], &allowed()).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn missing_roots_are_skipped() {
        let violations = scan(
            &[PathBuf::from("/definitely/not/a/real/root")],
            &allowed(),
        )
        .unwrap();
        assert!(violations.is_empty());
    }
}
