//! Template rendering: variable validation, default merging and
//! `$name` / `${name}` substitution.
//!
//! A doubled marker (`$$`) renders as a literal `$`. Any other `$` that does
//! not start a well-formed placeholder is rejected.

use std::collections::BTreeMap;

use crate::entity::{PromptRecord, Value, Variables};
use crate::error::{Result, VaultError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Dollar,
    Placeholder(&'a str),
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Split a template into literal text and placeholders.
///
/// Returns the byte offset of the offending `$` on malformed input.
fn scan(template: &str) -> std::result::Result<Vec<Segment<'_>>, usize> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        if literal_start < i {
            segments.push(Segment::Literal(&template[literal_start..i]));
        }

        let next = bytes.get(i + 1).copied();
        match next {
            Some(b'$') => {
                segments.push(Segment::Dollar);
                i += 2;
            }
            Some(b) if is_ident_start(b) => {
                let start = i + 1;
                let mut end = start + 1;
                while end < bytes.len() && is_ident_char(bytes[end]) {
                    end += 1;
                }
                segments.push(Segment::Placeholder(&template[start..end]));
                i = end;
            }
            Some(b'{') => {
                let start = i + 2;
                if !bytes.get(start).copied().is_some_and(is_ident_start) {
                    return Err(i);
                }
                let mut end = start + 1;
                while end < bytes.len() && is_ident_char(bytes[end]) {
                    end += 1;
                }
                if bytes.get(end) != Some(&b'}') {
                    return Err(i);
                }
                segments.push(Segment::Placeholder(&template[start..end]));
                i = end + 1;
            }
            _ => return Err(i),
        }
        literal_start = i;
    }

    if literal_start < bytes.len() {
        segments.push(Segment::Literal(&template[literal_start..]));
    }

    Ok(segments)
}

/// 1-based line and column of a byte offset.
fn line_col(template: &str, offset: usize) -> (usize, usize) {
    let before = &template[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().unwrap_or("").chars().count() + 1;
    (line, column)
}

/// Distinct placeholder names in order of first appearance.
///
/// Malformed placeholders end the scan; names seen before them are still
/// returned.
pub fn placeholders(template: &str) -> Vec<String> {
    let segments = match scan(template) {
        Ok(segments) => segments,
        Err(offset) => scan(&template[..offset]).unwrap_or_default(),
    };

    let mut names: Vec<String> = Vec::new();
    for segment in segments {
        if let Segment::Placeholder(name) = segment {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Check required variables and declared types against `supplied`.
fn validate(record: &PromptRecord, supplied: &Variables) -> Result<()> {
    for (name, spec) in &record.variables {
        let value = supplied.get(name);

        if spec.must_be_supplied() && value.is_none() {
            return Err(VaultError::MissingVariable {
                prompt: record.name.clone(),
                version: record.version.clone(),
                missing: vec![name.clone()],
                expected: record.variable_names(),
            });
        }

        if let (Some(var_type), Some(value)) = (spec.var_type, value) {
            if !var_type.accepts(value) {
                return Err(VaultError::TypeMismatch {
                    prompt: record.name.clone(),
                    version: record.version.clone(),
                    variable: name.clone(),
                    expected: var_type.to_string(),
                    actual: value.kind().to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Supplied values win over declared defaults; undeclared supplied values
/// are carried through.
fn merge_defaults<'a>(record: &'a PromptRecord, supplied: &'a Variables) -> BTreeMap<&'a str, &'a Value> {
    let mut merged = BTreeMap::new();

    for (name, spec) in &record.variables {
        if let Some(value) = supplied.get(name).or(spec.default.as_ref()) {
            merged.insert(name.as_str(), value);
        }
    }

    for (name, value) in supplied {
        merged.entry(name.as_str()).or_insert(value);
    }

    merged
}

fn substitute(record: &PromptRecord, values: &BTreeMap<&str, &Value>) -> Result<String> {
    let segments = scan(&record.template).map_err(|offset| {
        let (line, column) = line_col(&record.template, offset);
        VaultError::InvalidPlaceholder {
            prompt: record.name.clone(),
            version: record.version.clone(),
            line,
            column,
        }
    })?;

    let mut out = String::with_capacity(record.template.len());
    let mut missing: Vec<String> = Vec::new();

    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Dollar => out.push('$'),
            Segment::Placeholder(name) => match values.get(name) {
                Some(value) => out.push_str(&value.to_string()),
                None => {
                    if !missing.iter().any(|m| m == name) {
                        missing.push(name.to_string());
                    }
                }
            },
        }
    }

    if !missing.is_empty() {
        return Err(VaultError::MissingVariable {
            prompt: record.name.clone(),
            version: record.version.clone(),
            missing,
            expected: record.variable_names(),
        });
    }

    Ok(out)
}

/// Render `record` against `supplied`.
///
/// Validation runs before defaults are merged, so a type check only ever
/// sees caller-supplied values.
pub fn render(record: &PromptRecord, supplied: &Variables) -> Result<String> {
    validate(record, supplied)?;
    let merged = merge_defaults(record, supplied);
    substitute(record, &merged)
}
