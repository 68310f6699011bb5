use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{VaultConfig, DIR_ENV, LOG_ENV};

#[derive(Parser, Debug)]
#[command(name = "promptvault")]
#[command(version, about = "Manage, version and log LLM prompts stored as YAML files")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing the .yaml prompt files
    #[arg(long, short = 'd', global = true, env = DIR_ENV, default_value = "./prompts")]
    pub dir: PathBuf,

    /// JSON-lines file usage records are appended to
    #[arg(long, global = true, env = LOG_ENV)]
    pub log_file: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config(&self) -> VaultConfig {
        VaultConfig {
            prompts_dir: self.dir.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all prompt names
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the versions of a prompt, oldest first
    Versions {
        /// Prompt name
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a prompt's metadata and template
    Show {
        /// Prompt name
        name: String,

        /// Exact version (defaults to the latest)
        #[arg(value_name = "VERSION")]
        prompt_version: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a prompt with variables
    Render {
        /// Prompt name
        name: String,

        /// Exact version (defaults to the latest)
        #[arg(value_name = "VERSION")]
        prompt_version: Option<String>,

        /// Variable as KEY=VALUE; booleans and numbers are detected (repeatable)
        #[arg(long = "var", short = 'v', value_name = "KEY=VALUE")]
        vars: Vec<String>,

        /// Variable as KEY=VALUE, always passed as text (repeatable)
        #[arg(long = "str", short = 's', value_name = "KEY=VALUE")]
        strs: Vec<String>,

        /// Read the value of this variable from stdin
        #[arg(long, value_name = "VAR")]
        stdin: Option<String>,

        /// Append the rendering to the usage log
        #[arg(long)]
        log: bool,

        /// Model name recorded with --log
        #[arg(long)]
        model: Option<String>,
    },

    /// Show a unified diff between two versions of a prompt
    Diff {
        /// Prompt name
        name: String,

        /// Old version
        version_a: String,

        /// New version
        version_b: String,
    },

    /// Append a usage record to the log file
    Log {
        /// Prompt name
        name: String,

        /// Prompt version that was used
        #[arg(value_name = "VERSION")]
        prompt_version: Option<String>,

        /// Rendered prompt text sent to the model
        #[arg(long)]
        rendered: Option<String>,

        /// Response received from the model
        #[arg(long)]
        response: Option<String>,

        /// Model that produced the response
        #[arg(long)]
        model: Option<String>,

        /// Additional field as KEY=VALUE (repeatable)
        #[arg(long = "extra", short = 'e', value_name = "KEY=VALUE")]
        extra: Vec<String>,
    },

    /// Report duplicate versions and variable mismatches
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
