use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value as YamlValue;
use tracing::{debug, warn};

use crate::entity::{PromptRecord, Value, VarType, VariableSpec};
use crate::error::{Result, VaultError};

const RECORD_EXTENSIONS: [&str; 2] = ["yaml", "yml"];
const DEFAULT_VERSION: &str = "1.0";
const KNOWN_FIELDS: [&str; 7] = [
    "name",
    "version",
    "template",
    "description",
    "author",
    "tags",
    "variables",
];

/// A directory of YAML prompt files, one record per file.
///
/// Nothing is cached: every call re-reads the directory, so edits made by
/// other processes show up on the next call.
#[derive(Debug, Clone)]
pub struct YamlStore {
    root: PathBuf,
}

impl YamlStore {
    /// Open a store rooted at an existing directory.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(VaultError::StoreNotFound(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Record files in ascending file-name order.
    fn record_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_record = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| RECORD_EXTENSIONS.contains(&ext));
            if is_record && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Read every record file. Files that do not parse are skipped with a
    /// warning and listed in the result instead of failing the scan.
    pub fn scan(&self) -> Result<StoreScan> {
        let paths = self.record_paths()?;
        debug!(root = %self.root.display(), files = paths.len(), "reading prompt store");

        let mut scan = StoreScan::default();
        for path in paths {
            let text = fs::read_to_string(&path)?;
            match parse_record(&path, &text) {
                Ok(record) => scan.records.push(record),
                Err(VaultError::InvalidRecord { path, message }) => {
                    warn!(path = %path.display(), %message, "skipping invalid prompt file");
                    scan.rejected.push(RejectedFile { path, message });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(scan)
    }

    /// Load every valid record in the store.
    pub fn load_all(&self) -> Result<Vec<PromptRecord>> {
        Ok(self.scan()?.records)
    }

    /// Load the records named `name`, in store order.
    pub fn records_named(&self, name: &str) -> Result<Vec<PromptRecord>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|r| r.name == name)
            .collect())
    }

    /// Distinct record names, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.load_all()?.into_iter().map(|r| r.name).collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

/// A record file that could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedFile {
    pub path: PathBuf,
    pub message: String,
}

/// Result of reading a store directory.
#[derive(Debug, Default)]
pub struct StoreScan {
    pub records: Vec<PromptRecord>,
    pub rejected: Vec<RejectedFile>,
}

fn invalid(path: &Path, message: impl Into<String>) -> VaultError {
    VaultError::InvalidRecord {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Text form of a YAML scalar. Numbers keep their YAML spelling.
fn scalar_text(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn optional_text(path: &Path, field: &str, value: Option<&YamlValue>) -> Result<String> {
    match value {
        None | Some(YamlValue::Null) => Ok(String::new()),
        Some(v) => scalar_text(v).ok_or_else(|| invalid(path, format!("'{}' must be a string", field))),
    }
}

fn parse_tags(path: &Path, value: Option<&YamlValue>) -> Result<Vec<String>> {
    match value {
        None | Some(YamlValue::Null) => Ok(Vec::new()),
        Some(YamlValue::Sequence(items)) => items
            .iter()
            .map(|item| scalar_text(item).ok_or_else(|| invalid(path, "'tags' entries must be strings")))
            .collect(),
        Some(_) => Err(invalid(path, "'tags' must be a list")),
    }
}

/// Read one declaration. Fields of the wrong shape fall back to their
/// defaults: `required` to true, `type` to unrecognized. Any `default` key,
/// null included, counts as a default.
fn parse_variable_spec(path: &Path, name: &str, node: &YamlValue) -> VariableSpec {
    let fields = match node {
        YamlValue::Mapping(fields) => fields,
        YamlValue::Null => return VariableSpec::default(),
        _ => {
            warn!(path = %path.display(), variable = name, "variable declaration is not a mapping, ignored");
            return VariableSpec::default();
        }
    };

    let required = match fields.get("required") {
        None => true,
        Some(YamlValue::Bool(b)) => *b,
        Some(_) => {
            warn!(path = %path.display(), variable = name, "'required' is not a boolean, treated as true");
            true
        }
    };
    let var_type = fields.get("type").map(|tag| {
        tag.as_str()
            .and_then(|t| t.parse::<VarType>().ok())
            .unwrap_or(VarType::Unrecognized)
    });
    let default = fields.get("default").map(Value::from_yaml);

    VariableSpec {
        required,
        default,
        var_type,
    }
}

fn parse_variables(path: &Path, value: Option<&YamlValue>) -> BTreeMap<String, VariableSpec> {
    let mapping = match value {
        None | Some(YamlValue::Null) => return BTreeMap::new(),
        Some(YamlValue::Mapping(mapping)) => mapping,
        Some(_) => {
            warn!(path = %path.display(), "'variables' is not a mapping, ignored");
            return BTreeMap::new();
        }
    };

    let mut variables = BTreeMap::new();
    for (key, spec) in mapping {
        match scalar_text(key) {
            Some(name) => {
                let spec = parse_variable_spec(path, &name, spec);
                variables.insert(name, spec);
            }
            None => warn!(path = %path.display(), "variable name is not a scalar, ignored"),
        }
    }
    variables
}

/// Parse one YAML document into a record. `path` supplies the fallback name
/// and is kept as the record's source.
pub fn parse_record(path: &Path, text: &str) -> Result<PromptRecord> {
    let document: YamlValue = serde_yaml::from_str(text).map_err(|e| invalid(path, e.to_string()))?;
    let mapping = match document {
        YamlValue::Mapping(mapping) => mapping,
        YamlValue::Null => serde_yaml::Mapping::new(),
        _ => return Err(invalid(path, "expected a mapping at the top level")),
    };

    let mut fields: BTreeMap<String, YamlValue> = BTreeMap::new();
    for (key, value) in mapping {
        let key = scalar_text(&key).ok_or_else(|| invalid(path, "top-level keys must be strings"))?;
        fields.insert(key, value);
    }

    let name = match fields.get("name") {
        Some(v) => scalar_text(v).ok_or_else(|| invalid(path, "'name' must be a string"))?,
        None => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string(),
    };
    if name.is_empty() {
        return Err(invalid(path, "'name' must not be empty"));
    }

    let version = match fields.get("version") {
        None | Some(YamlValue::Null) => DEFAULT_VERSION.to_string(),
        Some(v) => scalar_text(v).ok_or_else(|| invalid(path, "'version' must be a string or number"))?,
    };

    let template = match fields.get("template") {
        Some(YamlValue::String(s)) => s.clone(),
        Some(_) => return Err(invalid(path, "'template' must be a string")),
        None => return Err(invalid(path, "missing 'template'")),
    };

    let description = optional_text(path, "description", fields.get("description"))?;
    let author = optional_text(path, "author", fields.get("author"))?;
    let tags = parse_tags(path, fields.get("tags"))?;
    let variables = parse_variables(path, fields.get("variables"));

    let metadata = fields
        .into_iter()
        .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
        .collect();

    Ok(PromptRecord {
        name,
        version,
        template,
        description,
        author,
        tags,
        variables,
        metadata,
        source: Some(path.to_path_buf()),
    })
}
