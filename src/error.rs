use miette::Diagnostic;
use std::io;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    #[diagnostic(
        code(portreg::registry::parse),
        help("Check the registry document for YAML syntax errors")
    )]
    Parse(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Filesystem error: {0}")]
    #[diagnostic(code(portreg::filesystem::error))]
    Filesystem(String),

    #[error("Invalid registry: {0} error(s) found")]
    #[diagnostic(
        code(portreg::registry::validation),
        help("Run `portreg validate` for the full error report")
    )]
    Validation(usize),

    #[error("Generator '{name}' failed: {reason}")]
    #[diagnostic(code(portreg::generator::failed))]
    Generator { name: String, reason: String },

    #[error("Found {0} hardcoded port reference(s)")]
    #[diagnostic(
        code(portreg::scanner::violations),
        help("Replace the literal host:port with the generated environment variable, or add a 'portreg:ignore' marker if the literal is intentional")
    )]
    HardcodedPorts(usize),

    #[error("Multiple errors occurred:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Multiple(Vec<Error>),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns a helpful suggestion for resolving this error, if available.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Error::Config(msg) if msg.contains("Failed to read") => Some(
                "Check that the registry file exists, or pass --registry <path>".to_string(),
            ),
            Error::Parse(_) => Some(
                "The registry document is not valid YAML. Fix the syntax and re-run.".to_string(),
            ),
            Error::Validation(_) => {
                Some("Validate the registry with: portreg validate".to_string())
            }
            Error::Generator { name, .. } => Some(format!(
                "Check that the output directory for '{}' exists and is writable",
                name
            )),
            _ => None,
        }
    }

    /// Formats the error with its suggestion (if any) for user-friendly display.
    pub fn with_suggestion(&self) -> String {
        match self.suggestion() {
            Some(suggestion) => format!("{}\n\nHint: {}", self, suggestion),
            None => self.to_string(),
        }
    }
}
