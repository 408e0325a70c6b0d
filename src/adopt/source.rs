use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::alarm::MetricAlarm;
use super::error::{AdoptError, AdoptResult};
use crate::traits::FileSystem;

/// Capability that lists the metric alarms of one account and region
pub trait AlarmSource: Send + Sync {
    /// Short description used in diagnostics (file path, region, ...)
    fn describe(&self) -> String;

    /// List every metric alarm
    fn list_alarms(&self) -> AdoptResult<Vec<MetricAlarm>>;
}

/// Alarms held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticAlarmSource {
    alarms: Vec<MetricAlarm>,
}

impl StaticAlarmSource {
    pub fn new(alarms: Vec<MetricAlarm>) -> Self {
        Self { alarms }
    }
}

impl AlarmSource for StaticAlarmSource {
    fn describe(&self) -> String {
        format!("{} in-memory alarm(s)", self.alarms.len())
    }

    fn list_alarms(&self) -> AdoptResult<Vec<MetricAlarm>> {
        for (index, alarm) in self.alarms.iter().enumerate() {
            alarm
                .check_collection_shapes()
                .map_err(|message| AdoptError::Parse {
                    location: format!("alarms[{}] ('{}')", index, alarm.alarm_name),
                    message,
                })?;
        }
        Ok(self.alarms.clone())
    }
}

/// Output of `aws cloudwatch describe-alarms` saved to a file
///
/// The document is either a single response (`{"MetricAlarms": [...]}`) or
/// an array of paged responses whose `MetricAlarms` are concatenated in
/// order. `CompositeAlarms` are ignored. A path of `-` reads stdin.
pub struct DescribeAlarmsFile {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl DescribeAlarmsFile {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    fn read_content(&self) -> AdoptResult<String> {
        if self.path == Path::new("-") {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            return Ok(content);
        }

        if !self.fs.exists(&self.path) {
            return Err(AdoptError::Source(format!(
                "input file not found: {}",
                self.path.display()
            )));
        }

        self.fs
            .read_to_string(&self.path)
            .map_err(|e| AdoptError::Source(format!("{:#}", e)))
    }
}

impl AlarmSource for DescribeAlarmsFile {
    fn describe(&self) -> String {
        if self.path == Path::new("-") {
            "stdin".to_string()
        } else {
            self.path.display().to_string()
        }
    }

    fn list_alarms(&self) -> AdoptResult<Vec<MetricAlarm>> {
        let content = self.read_content()?;
        parse_describe_alarms(&content)
    }
}

/// Parse a describe-alarms response or an array of paged responses
pub fn parse_describe_alarms(content: &str) -> AdoptResult<Vec<MetricAlarm>> {
    let document: Value = serde_json::from_str(content).map_err(|e| AdoptError::Parse {
        location: "document".to_string(),
        message: e.to_string(),
    })?;

    match document {
        Value::Array(pages) => {
            let mut alarms = Vec::new();
            for (index, page) in pages.iter().enumerate() {
                alarms.extend(parse_page(page, &format!("[{}]", index))?);
            }
            Ok(alarms)
        }
        page @ Value::Object(_) => parse_page(&page, ""),
        other => Err(AdoptError::Parse {
            location: "document".to_string(),
            message: format!("expected an object or an array of pages, found {}", kind(&other)),
        }),
    }
}

fn parse_page(page: &Value, prefix: &str) -> AdoptResult<Vec<MetricAlarm>> {
    let location = format!("{}MetricAlarms", prefix);

    let entries = page
        .get("MetricAlarms")
        .ok_or_else(|| AdoptError::Parse {
            location: location.clone(),
            message: "missing field".to_string(),
        })?
        .as_array()
        .ok_or_else(|| AdoptError::Parse {
            location: location.clone(),
            message: "expected an array".to_string(),
        })?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| -> AdoptResult<MetricAlarm> {
            let at = || {
                let name = entry
                    .get("AlarmName")
                    .or_else(|| entry.get("alarm_name"))
                    .and_then(Value::as_str)
                    .map(|n| format!(" ('{}')", n))
                    .unwrap_or_default();
                format!("{}[{}]{}", location, index, name)
            };

            let alarm = serde_json::from_value::<MetricAlarm>(entry.clone()).map_err(|e| {
                AdoptError::Parse {
                    location: at(),
                    message: e.to_string(),
                }
            })?;
            alarm
                .check_collection_shapes()
                .map_err(|message| AdoptError::Parse {
                    location: at(),
                    message,
                })?;
            Ok(alarm)
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
