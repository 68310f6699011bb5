use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable naming the prompt directory.
pub const DIR_ENV: &str = "PROMPTVAULT_DIR";
/// Environment variable naming the usage log file.
pub const LOG_ENV: &str = "PROMPTVAULT_LOG";

/// Where a vault reads prompts from and logs usage to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Directory containing the `.yaml` prompt files
    pub prompts_dir: PathBuf,
    /// JSON-lines usage log; logging is disabled when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            prompts_dir: PathBuf::from("./prompts"),
            log_file: None,
        }
    }
}

impl VaultConfig {
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
            log_file: None,
        }
    }

    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.log_file = Some(log_file.into());
        self
    }

    /// Check if usage logging is enabled.
    pub fn logs_usage(&self) -> bool {
        self.log_file.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VaultConfig::default();
        assert_eq!(config.prompts_dir, PathBuf::from("./prompts"));
        assert!(!config.logs_usage());
    }

    #[test]
    fn test_with_log_file() {
        let config = VaultConfig::new("p").with_log_file("usage.jsonl");
        assert!(config.logs_usage());
        assert_eq!(config.log_file, Some(PathBuf::from("usage.jsonl")));
    }

    #[test]
    fn test_serialization() {
        let config = VaultConfig::new("prompts");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("log_file"));
        let parsed: VaultConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
