//! Manage, version and log LLM prompts stored as plain YAML files.
//!
//! ```no_run
//! use promptvault::{PromptVault, Value, Variables};
//!
//! let vault = PromptVault::new("./prompts")?;
//! let prompt = vault.load("summarize", None)?;
//!
//! let mut vars = Variables::new();
//! vars.insert("text".to_string(), Value::from("..."));
//! let text = prompt.render(&vars)?;
//! # Ok::<(), promptvault::VaultError>(())
//! ```

pub mod cli;
pub mod config;
pub mod diff;
pub mod entity;
pub mod error;
pub mod storage;
pub mod template;
pub mod usage;
pub mod vault;
pub mod version;
pub mod warnings;

pub use config::VaultConfig;
pub use entity::{PromptRecord, Value, VarType, VariableSpec, Variables};
pub use error::{Result, VaultError};
pub use usage::{UsageEntry, UsageLog};
pub use vault::PromptVault;
pub use warnings::Warning;
