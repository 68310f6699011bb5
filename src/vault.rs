//! The prompt vault: list, load, render, diff and log prompts kept as YAML
//! files in a directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::VaultConfig;
use crate::diff::unified_diff;
use crate::entity::{PromptRecord, Variables};
use crate::error::{Result, VaultError};
use crate::storage::YamlStore;
use crate::usage::{UsageEntry, UsageLog};
use crate::version::{resolve, sort_versions};
use crate::warnings::{check_records, rejected_files, Warning};

#[derive(Debug, Clone)]
pub struct PromptVault {
    store: YamlStore,
    usage: Option<UsageLog>,
}

impl PromptVault {
    /// Open the vault described by `config`.
    pub fn open(config: &VaultConfig) -> Result<Self> {
        let store = YamlStore::open(&config.prompts_dir)?;
        Ok(Self {
            store,
            usage: config.log_file.clone().map(UsageLog::new),
        })
    }

    /// Open a vault over `prompts_dir` with usage logging disabled.
    pub fn new(prompts_dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(&VaultConfig::new(prompts_dir.as_ref()))
    }

    /// Enable usage logging to `path`.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.usage = Some(UsageLog::new(path));
        self
    }

    pub fn prompts_dir(&self) -> &Path {
        self.store.root()
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.usage.as_ref().map(UsageLog::path)
    }

    /// All prompt names, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        self.store.names()
    }

    /// Every version of `name`, oldest first. Empty for unknown names.
    pub fn versions(&self, name: &str) -> Result<Vec<String>> {
        let mut versions: Vec<String> = self
            .store
            .records_named(name)?
            .into_iter()
            .map(|r| r.version)
            .collect();
        sort_versions(&mut versions);
        Ok(versions)
    }

    /// Load `name` at `version`, or its latest version when `None`.
    pub fn load(&self, name: &str, version: Option<&str>) -> Result<PromptRecord> {
        let records = self.store.load_all()?;
        let (candidates, others): (Vec<PromptRecord>, Vec<PromptRecord>) =
            records.into_iter().partition(|r| r.name == name);

        if candidates.is_empty() {
            let mut available: Vec<String> = others.into_iter().map(|r| r.name).collect();
            available.sort();
            available.dedup();
            return Err(VaultError::PromptNotFound {
                name: name.to_string(),
                available,
            });
        }

        let picked = resolve(name, &candidates, version)?;
        let same_key = candidates
            .iter()
            .filter(|r| r.version == picked.version)
            .count();
        if same_key > 1 {
            warn!(
                prompt = name,
                version = %picked.version,
                count = same_key,
                "duplicate prompt version, using the last file"
            );
        }

        debug!(prompt = name, version = %picked.version, "loaded prompt");
        Ok(picked.clone())
    }

    /// Load a prompt and render it against `supplied`.
    pub fn render(&self, name: &str, version: Option<&str>, supplied: &Variables) -> Result<String> {
        self.load(name, version)?.render(supplied)
    }

    /// Unified diff of the templates of two versions of `name`.
    pub fn diff(&self, name: &str, version_a: &str, version_b: &str) -> Result<String> {
        let a = self.load(name, Some(version_a))?;
        let b = self.load(name, Some(version_b))?;

        Ok(unified_diff(
            &a.template,
            &b.template,
            &format!("{} v{}", name, version_a),
            &format!("{} v{}", name, version_b),
        ))
    }

    /// Append a usage record. Does nothing when no log file is configured.
    pub fn log(&self, entry: &UsageEntry) -> Result<()> {
        match &self.usage {
            Some(usage) => usage.append(entry),
            None => Ok(()),
        }
    }

    /// Consistency warnings for the current contents of the store, skipped
    /// files first.
    pub fn check(&self) -> Result<Vec<Warning>> {
        let scan = self.store.scan()?;
        let mut warnings = rejected_files(&scan.rejected);
        warnings.extend(check_records(&scan.records));
        Ok(warnings)
    }
}
