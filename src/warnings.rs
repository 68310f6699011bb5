//! Consistency warnings for a prompt store.
//!
//! None of these fail a call; they point at things that are usually
//! mistakes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::entity::PromptRecord;
use crate::storage::RejectedFile;
use crate::template::placeholders;

/// A non-fatal problem found in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Two or more files declare the same name and version.
    DuplicateVersion {
        name: String,
        version: String,
        sources: Vec<PathBuf>,
    },
    /// A declared variable the template never references.
    UnusedVariable {
        name: String,
        version: String,
        variable: String,
    },
    /// A placeholder with no matching declaration.
    UndeclaredPlaceholder {
        name: String,
        version: String,
        placeholder: String,
    },
    /// A file skipped because it does not parse as a record.
    InvalidRecord { source: PathBuf, message: String },
}

/// Records sharing `(name, version)`. Sources are listed in store order.
pub fn duplicate_versions(records: &[PromptRecord]) -> Vec<Warning> {
    let mut groups: BTreeMap<(&str, &str), Vec<PathBuf>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.name.as_str(), record.version.as_str()))
            .or_default()
            .push(record.source.clone().unwrap_or_default());
    }

    groups
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|((name, version), sources)| Warning::DuplicateVersion {
            name: name.to_string(),
            version: version.to_string(),
            sources,
        })
        .collect()
}

/// Declared-versus-referenced mismatches of one record.
pub fn check_variables(record: &PromptRecord) -> Vec<Warning> {
    let referenced = placeholders(&record.template);
    let mut warnings = Vec::new();

    for variable in record.variables.keys() {
        if !referenced.contains(variable) {
            warnings.push(Warning::UnusedVariable {
                name: record.name.clone(),
                version: record.version.clone(),
                variable: variable.clone(),
            });
        }
    }

    for placeholder in referenced {
        if !record.variables.contains_key(&placeholder) {
            warnings.push(Warning::UndeclaredPlaceholder {
                name: record.name.clone(),
                version: record.version.clone(),
                placeholder,
            });
        }
    }

    warnings
}

/// All warnings for a set of records: duplicates first, then per-record
/// variable checks in store order.
pub fn check_records(records: &[PromptRecord]) -> Vec<Warning> {
    let mut warnings = duplicate_versions(records);
    for record in records {
        warnings.extend(check_variables(record));
    }
    warnings
}

/// One warning per skipped file.
pub fn rejected_files(rejected: &[RejectedFile]) -> Vec<Warning> {
    rejected
        .iter()
        .map(|file| Warning::InvalidRecord {
            source: file.path.clone(),
            message: file.message.clone(),
        })
        .collect()
}

/// Format a warning for display.
pub fn format_warning(warning: &Warning) -> String {
    match warning {
        Warning::DuplicateVersion {
            name,
            version,
            sources,
        } => {
            let files: Vec<String> = sources.iter().map(|p| p.display().to_string()).collect();
            format!(
                "Warning: '{}' v{} is defined {} times ({}) - the last file wins",
                name,
                version,
                sources.len(),
                files.join(", ")
            )
        }
        Warning::UnusedVariable {
            name,
            version,
            variable,
        } => {
            format!(
                "Warning: '{}' v{} declares variable '{}' but never uses it",
                name, version, variable
            )
        }
        Warning::UndeclaredPlaceholder {
            name,
            version,
            placeholder,
        } => {
            format!(
                "Warning: '{}' v{} uses undeclared placeholder '${}'",
                name, version, placeholder
            )
        }
        Warning::InvalidRecord { source, message } => {
            format!("Warning: skipped {}: {}", source.display(), message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::VariableSpec;

    fn record(version: &str, file: &str) -> PromptRecord {
        let mut record = PromptRecord::new("p", version, "$a");
        record.source = Some(PathBuf::from(file));
        record.with_variable("a", VariableSpec::required())
    }

    #[test]
    fn test_no_warnings_for_clean_records() {
        let records = vec![record("1.0", "a.yaml"), record("1.1", "b.yaml")];
        assert!(check_records(&records).is_empty());
    }

    #[test]
    fn test_duplicate_version() {
        let records = vec![
            record("1.0", "a.yaml"),
            record("1.0", "b.yaml"),
            record("2.0", "c.yaml"),
        ];
        let warnings = duplicate_versions(&records);
        assert_eq!(warnings.len(), 1);
        match &warnings[0] {
            Warning::DuplicateVersion { version, sources, .. } => {
                assert_eq!(version, "1.0");
                assert_eq!(sources, &vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]);
            }
            other => panic!("Expected DuplicateVersion warning, got {:?}", other),
        }
    }

    #[test]
    fn test_unused_and_undeclared() {
        let record = PromptRecord::new("p", "1.0", "Hello $who")
            .with_variable("tone", VariableSpec::optional());
        let warnings = check_variables(&record);

        assert_eq!(warnings.len(), 2);
        assert!(matches!(&warnings[0], Warning::UnusedVariable { variable, .. } if variable == "tone"));
        assert!(
            matches!(&warnings[1], Warning::UndeclaredPlaceholder { placeholder, .. } if placeholder == "who")
        );
    }

    #[test]
    fn test_rejected_files_become_warnings() {
        let rejected = vec![RejectedFile {
            path: PathBuf::from("broken.yaml"),
            message: "missing 'template'".to_string(),
        }];
        let warnings = rejected_files(&rejected);

        assert_eq!(warnings.len(), 1);
        assert_eq!(
            format_warning(&warnings[0]),
            "Warning: skipped broken.yaml: missing 'template'"
        );
    }

    #[test]
    fn test_format_duplicate() {
        let warning = Warning::DuplicateVersion {
            name: "p".to_string(),
            version: "1.0".to_string(),
            sources: vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")],
        };
        let msg = format_warning(&warning);
        assert!(msg.contains("2 times"));
        assert!(msg.contains("a.yaml, b.yaml"));
    }

    #[test]
    fn test_format_undeclared() {
        let warning = Warning::UndeclaredPlaceholder {
            name: "p".to_string(),
            version: "1.0".to_string(),
            placeholder: "who".to_string(),
        };
        assert!(format_warning(&warning).contains("'$who'"));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let warning = Warning::UnusedVariable {
            name: "p".to_string(),
            version: "1.0".to_string(),
            variable: "x".to_string(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "unused_variable");
        assert_eq!(json["variable"], "x");
    }
}
