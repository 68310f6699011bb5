// src/entity/prompt.rs
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Value, VarType, Variables};
use crate::error::Result;

/// Declaration of a single template variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub var_type: Option<VarType>,
}

fn default_required() -> bool {
    true
}

impl Default for VariableSpec {
    fn default() -> Self {
        Self {
            required: true,
            default: None,
            var_type: None,
        }
    }
}

impl VariableSpec {
    pub fn required() -> Self {
        Self::default()
    }

    pub fn optional() -> Self {
        Self {
            required: false,
            ..Self::default()
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_type(mut self, var_type: VarType) -> Self {
        self.var_type = Some(var_type);
        self
    }

    /// True when a render call must supply this variable.
    pub fn must_be_supplied(&self) -> bool {
        self.required && self.default.is_none()
    }
}

/// A named, versioned template with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptRecord {
    pub name: String,
    pub version: String,
    pub template: String,
    pub description: String,
    pub author: String,
    pub tags: Vec<String>,
    pub variables: BTreeMap<String, VariableSpec>,
    /// Every other top-level field of the record, kept as-is.
    pub metadata: BTreeMap<String, serde_yaml::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl PromptRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            template: template.into(),
            description: String::new(),
            author: String::new(),
            tags: Vec::new(),
            variables: BTreeMap::new(),
            metadata: BTreeMap::new(),
            source: None,
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, spec: VariableSpec) -> Self {
        self.variables.insert(name.into(), spec);
        self
    }

    /// Declared variable names, sorted.
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }

    /// Render this record's template against `supplied`.
    pub fn render(&self, supplied: &Variables) -> Result<String> {
        crate::template::render(self, supplied)
    }
}

impl std::fmt::Display for PromptRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}
