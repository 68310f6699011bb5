use std::io::{self, Read};

use crate::config::VaultConfig;
use crate::entity::{Value, Variables};
use crate::error::{Result, VaultError};
use crate::usage::UsageEntry;
use crate::vault::PromptVault;
use crate::warnings::format_warning;

/// Split a `KEY=VALUE` assignment.
fn parse_assignment(s: &str) -> Result<(String, String)> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(VaultError::InvalidVariable(format!(
            "'{}' (expected KEY=VALUE)",
            s
        ))),
    }
}

/// Build render variables from `--var` (kind inferred) and `--str` (text)
/// assignments. Later assignments win.
pub fn parse_variables(vars: &[String], strs: &[String]) -> Result<Variables> {
    let mut variables = Variables::new();
    for assignment in vars {
        let (key, raw) = parse_assignment(assignment)?;
        variables.insert(key, Value::infer(&raw));
    }
    for assignment in strs {
        let (key, raw) = parse_assignment(assignment)?;
        variables.insert(key, Value::Text(raw));
    }
    Ok(variables)
}

/// Print text followed by exactly one trailing newline.
fn print_block(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

pub fn handle_list(config: &VaultConfig, json: bool) -> Result<()> {
    let vault = PromptVault::open(config)?;
    let names = vault.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else if names.is_empty() {
        println!("No prompts found in {}.", vault.prompts_dir().display());
    } else {
        for name in names {
            println!("{}", name);
        }
    }

    Ok(())
}

pub fn handle_versions(config: &VaultConfig, name: String, json: bool) -> Result<()> {
    let vault = PromptVault::open(config)?;
    let versions = vault.versions(&name)?;

    if versions.is_empty() {
        return Err(VaultError::PromptNotFound {
            name,
            available: vault.list()?,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&versions)?);
    } else {
        for version in versions {
            println!("{}", version);
        }
    }

    Ok(())
}

pub fn handle_show(
    config: &VaultConfig,
    name: String,
    version: Option<String>,
    json: bool,
) -> Result<()> {
    let vault = PromptVault::open(config)?;
    let record = vault.load(&name, version.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{} v{}", record.name, record.version);
    if !record.description.is_empty() {
        println!("  description: {}", record.description);
    }
    if !record.author.is_empty() {
        println!("  author: {}", record.author);
    }
    if !record.tags.is_empty() {
        println!("  tags: {}", record.tags.join(", "));
    }
    if !record.variables.is_empty() {
        println!("  variables:");
        for (var, spec) in &record.variables {
            let requirement = if spec.required { "required" } else { "optional" };
            let mut details = vec![requirement.to_string()];
            if let Some(var_type) = spec.var_type {
                details.push(format!("type={}", var_type));
            }
            if let Some(default) = &spec.default {
                details.push(format!("default={}", default));
            }
            println!("    {} ({})", var, details.join(", "));
        }
    }
    for (key, value) in &record.metadata {
        let rendered = serde_json::to_string(value)?;
        println!("  {}: {}", key, rendered);
    }
    println!();
    print_block(&record.template);

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_render(
    config: &VaultConfig,
    name: String,
    version: Option<String>,
    vars: Vec<String>,
    strs: Vec<String>,
    stdin_var: Option<String>,
    log: bool,
    model: Option<String>,
) -> Result<()> {
    let vault = PromptVault::open(config)?;
    let record = vault.load(&name, version.as_deref())?;
    let mut variables = parse_variables(&vars, &strs)?;

    if let Some(var) = stdin_var {
        if atty::is(atty::Stream::Stdin) {
            return Err(VaultError::InvalidVariable(format!(
                "--stdin {} needs input piped on stdin",
                var
            )));
        }
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        variables.insert(var, Value::Text(content));
    }

    let rendered = record.render(&variables)?;
    print_block(&rendered);

    if log {
        if vault.log_file().is_none() {
            eprintln!("Warning: --log given but no log file configured (use --log-file)");
        }
        let mut entry = UsageEntry::new(record.name.clone())
            .version(record.version.clone())
            .rendered(rendered);
        if let Some(model) = model {
            entry = entry.model(model);
        }
        vault.log(&entry)?;
    }

    Ok(())
}

pub fn handle_diff(config: &VaultConfig, name: String, version_a: String, version_b: String) -> Result<()> {
    let vault = PromptVault::open(config)?;
    let diff = vault.diff(&name, &version_a, &version_b)?;
    print_block(&diff);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_log(
    config: &VaultConfig,
    name: String,
    version: Option<String>,
    rendered: Option<String>,
    response: Option<String>,
    model: Option<String>,
    extra: Vec<String>,
) -> Result<()> {
    let vault = PromptVault::open(config)?;

    let mut entry = UsageEntry::new(name);
    entry.version = version;
    entry.rendered = rendered;
    entry.response = response;
    entry.model = model;
    for assignment in &extra {
        let (key, raw) = parse_assignment(assignment)?;
        entry.extra.insert(key, serde_json::to_value(Value::infer(&raw))?);
    }

    match vault.log_file() {
        Some(path) => {
            vault.log(&entry)?;
            println!("Logged usage of '{}' to {}", entry.prompt, path.display());
        }
        None => {
            eprintln!("Warning: no log file configured (use --log-file), nothing logged");
        }
    }

    Ok(())
}

pub fn handle_check(config: &VaultConfig, json: bool) -> Result<()> {
    let vault = PromptVault::open(config)?;
    let warnings = vault.check()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&warnings)?);
    } else if warnings.is_empty() {
        println!("No problems found.");
    } else {
        for warning in &warnings {
            println!("{}", format_warning(warning));
        }
    }

    Ok(())
}
