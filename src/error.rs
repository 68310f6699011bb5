use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Prompt directory not found: {}. Create it and add your .yaml prompt files there.", .0.display())]
    StoreNotFound(PathBuf),

    #[error("No prompt named '{name}'. Available prompts: [{}]", available.join(", "))]
    PromptNotFound { name: String, available: Vec<String> },

    #[error("Prompt '{name}' version '{requested}' not found. Available versions: [{}]", available.join(", "))]
    VersionNotFound {
        name: String,
        requested: String,
        available: Vec<String>,
    },

    #[error("Missing variable(s) [{}] for prompt '{prompt}' v{version}. Expected variables: [{}]", missing.join(", "), expected.join(", "))]
    MissingVariable {
        prompt: String,
        version: String,
        missing: Vec<String>,
        expected: Vec<String>,
    },

    #[error("Variable '{variable}' in prompt '{prompt}' v{version} expected {expected}, got {actual}")]
    TypeMismatch {
        prompt: String,
        version: String,
        variable: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid placeholder in prompt '{prompt}' v{version}: line {line}, col {column}")]
    InvalidPlaceholder {
        prompt: String,
        version: String,
        line: usize,
        column: usize,
    },

    #[error("Invalid prompt file {}: {message}", path.display())]
    InvalidRecord { path: PathBuf, message: String },

    #[error("Invalid variable assignment: {0}")]
    InvalidVariable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VaultError {
    /// The names a `MissingVariable` error reports as absent.
    pub fn missing_variables(&self) -> Option<&[String]> {
        match self {
            VaultError::MissingVariable { missing, .. } => Some(missing),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;
