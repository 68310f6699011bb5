//! Append-only usage log.
//!
//! Each call appends one JSON object on its own line. The file is opened,
//! written and closed per record; writers from several processes may
//! interleave whole lines.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value as JsonValue};
use tracing::info;

use crate::error::Result;

/// One render/response event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageEntry {
    pub prompt: String,
    pub version: Option<String>,
    pub model: Option<String>,
    pub rendered: Option<String>,
    pub response: Option<String>,
    /// Merged last, so these keys overwrite the fixed fields on collision.
    pub extra: Map<String, JsonValue>,
}

impl UsageEntry {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn rendered(mut self, rendered: impl Into<String>) -> Self {
        self.rendered = Some(rendered.into());
        self
    }

    pub fn response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The JSON object written to the log for this entry.
    pub fn to_json(&self, timestamp: &DateTime<Utc>) -> JsonValue {
        let mut record = Map::new();
        record.insert("timestamp".into(), format_timestamp(timestamp).into());
        record.insert("prompt".into(), self.prompt.clone().into());
        record.insert("version".into(), self.version.clone().into());
        record.insert("model".into(), self.model.clone().into());
        record.insert("rendered".into(), self.rendered.clone().into());
        record.insert("response".into(), self.response.clone().into());
        for (key, value) in &self.extra {
            record.insert(key.clone(), value.clone());
        }
        JsonValue::Object(record)
    }
}

/// ISO-8601 UTC with microseconds, e.g. `2026-01-05T09:30:00.000000Z`.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// A JSON-lines file that usage entries are appended to.
#[derive(Debug, Clone)]
pub struct UsageLog {
    path: PathBuf,
}

impl UsageLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `entry` stamped with the current time.
    pub fn append(&self, entry: &UsageEntry) -> Result<()> {
        self.append_at(entry, &Utc::now())
    }

    pub fn append_at(&self, entry: &UsageEntry, timestamp: &DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let line = serde_json::to_string(&entry.to_json(timestamp))?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)?;

        info!(prompt = %entry.prompt, path = %self.path.display(), "logged prompt usage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(&fixed_time()), "2026-01-05T09:30:00.000000Z");
    }

    #[test]
    fn test_to_json_fields() {
        let entry = UsageEntry::new("summarize")
            .version("1.0")
            .model("gpt-4o")
            .rendered("Summarize: X")
            .response("X.");
        let json = entry.to_json(&fixed_time());

        assert_eq!(json["prompt"], "summarize");
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["rendered"], "Summarize: X");
        assert_eq!(json["response"], "X.");
        assert_eq!(json["timestamp"], "2026-01-05T09:30:00.000000Z");
    }

    #[test]
    fn test_absent_fields_are_null() {
        let json = UsageEntry::new("p").to_json(&fixed_time());
        assert!(json["version"].is_null());
        assert!(json["response"].is_null());
    }

    #[test]
    fn test_extra_overwrites_fixed_fields() {
        let entry = UsageEntry::new("p")
            .model("a")
            .extra("model", "b")
            .extra("latency_ms", 120);
        let json = entry.to_json(&fixed_time());
        assert_eq!(json["model"], "b");
        assert_eq!(json["latency_ms"], 120);
    }

    #[test]
    fn test_append_creates_parents_and_appends_lines() {
        let tmp = TempDir::new().unwrap();
        let log = UsageLog::new(tmp.path().join("logs/deep/usage.jsonl"));

        log.append(&UsageEntry::new("one")).unwrap();
        log.append(&UsageEntry::new("two").response("héllo")).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(content.ends_with('\n'));

        let second: JsonValue = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["prompt"], "two");
        assert_eq!(second["response"], "héllo");
        assert!(lines[1].contains("héllo"));
    }
}
