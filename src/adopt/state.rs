use indexmap::IndexMap;
use serde::Serialize;

use super::alarm::{MetricAlarm, NamedAlarm, RESOURCE_TYPE};
use super::attributes::{build_attributes, AttributeMap};
use super::identifier::IdentifierAllocator;

/// Primary instance of a state record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimaryInstance {
    pub id: String,
    pub attributes: AttributeMap,
}

/// One resource entry of the state document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateRecord {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub primary: PrimaryInstance,
}

impl StateRecord {
    pub fn primary_id(&self) -> &str {
        &self.primary.id
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.primary.attributes
    }
}

/// State records keyed by `"<type>.<identifier>"`, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StateDocument(IndexMap<String, StateRecord>);

impl StateDocument {
    pub fn get(&self, key: &str) -> Option<&StateRecord> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateRecord)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Allocate identifiers for `alarms` and fold them into a state document
pub fn assemble(allocator: &IdentifierAllocator, alarms: &[MetricAlarm]) -> StateDocument {
    let named: Vec<NamedAlarm> = alarms
        .iter()
        .map(|alarm| NamedAlarm {
            identifier: allocator.allocate(&alarm.alarm_name),
            alarm: alarm.clone(),
        })
        .collect();

    assemble_named(&named)
}

/// Fold alarms whose identifiers are already allocated into a state document
pub fn assemble_named(alarms: &[NamedAlarm]) -> StateDocument {
    let records = alarms
        .iter()
        .map(|named| {
            let record = StateRecord {
                resource_type: RESOURCE_TYPE.to_string(),
                primary: PrimaryInstance {
                    id: named.alarm.primary_id().to_string(),
                    attributes: build_attributes(&named.alarm),
                },
            };
            (named.state_key(), record)
        })
        .collect();

    StateDocument(records)
}

/// Legacy (version 1) Terraform state file wrapping a state document
#[derive(Debug, Clone, Serialize)]
pub struct StateFile {
    pub version: u32,
    pub serial: u64,
    pub modules: Vec<StateModule>,
}

/// A module of the state file; only the root module is produced
#[derive(Debug, Clone, Serialize)]
pub struct StateModule {
    pub path: Vec<String>,
    pub outputs: IndexMap<String, serde_json::Value>,
    pub resources: StateDocument,
}

impl StateFile {
    /// Fresh state file with `resources` in the root module
    pub fn new(resources: StateDocument) -> Self {
        Self {
            version: 1,
            serial: 1,
            modules: vec![StateModule {
                path: vec!["root".to_string()],
                outputs: IndexMap::new(),
                resources,
            }],
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_assemble_example_alarm() {
        let alarms = vec![MetricAlarm::new("cpu alarm!!").with_dimension("InstanceId", "i-123")];
        let document = assemble(&IdentifierAllocator::random(), &alarms);

        assert_eq!(document.len(), 1);
        let (key, record) = document.iter().next().unwrap();

        let pattern = regex::Regex::new(r"^aws_cloudwatch_metric_alarm\.cpu_alarm_[0-9a-f]{8}$")
            .unwrap();
        assert!(pattern.is_match(key), "unexpected key {}", key);
        assert_eq!(record.resource_type, "aws_cloudwatch_metric_alarm");
        assert_eq!(record.primary_id(), "cpu alarm!!");
        assert_eq!(
            record.attributes().get("insufficient_data_actions.#"),
            Some("0")
        );
        assert_eq!(record.attributes().get("dimensions.InstanceId"), Some("i-123"));
    }

    #[test]
    fn test_duplicate_names_yield_distinct_keys() {
        let alarms = vec![MetricAlarm::new("Alarm#1"), MetricAlarm::new("Alarm#1")];
        let document = assemble(&IdentifierAllocator::random(), &alarms);

        assert_eq!(document.len(), 2);
        let keys: HashSet<&str> = document.keys().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_every_alarm_has_an_entry_in_order() {
        let alarms: Vec<MetricAlarm> = ["b-first", "a-second", "c third"]
            .iter()
            .map(|name| MetricAlarm::new(*name))
            .collect();
        let document = assemble(&IdentifierAllocator::seeded(1), &alarms);

        let ids: Vec<&str> = document.iter().map(|(_, r)| r.primary_id()).collect();
        assert_eq!(ids, vec!["b-first", "a-second", "c third"]);

        for key in document.keys() {
            assert!(key.starts_with("aws_cloudwatch_metric_alarm."));
        }
    }

    #[test]
    fn test_empty_input_gives_empty_document() {
        let document = assemble(&IdentifierAllocator::random(), &[]);
        assert!(document.is_empty());
    }

    #[test]
    fn test_seeded_assembly_is_reproducible() {
        let alarms = vec![MetricAlarm::new("one"), MetricAlarm::new("two")];

        let first = assemble(&IdentifierAllocator::seeded(99), &alarms);
        let second = assemble(&IdentifierAllocator::seeded(99), &alarms);

        assert_eq!(first, second);
    }

    #[test]
    fn test_state_file_layout() {
        let alarms = vec![MetricAlarm::new("disk").with_alarm_action("arn:aws:sns:x:1:t")];
        let document = assemble(&IdentifierAllocator::seeded(5), &alarms);
        let key = document.keys().next().unwrap().to_string();

        let json = StateFile::new(document).to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["serial"], 1);
        assert_eq!(value["modules"][0]["path"][0], "root");
        assert!(value["modules"][0]["outputs"].as_object().unwrap().is_empty());

        let record = &value["modules"][0]["resources"][&key];
        assert_eq!(record["type"], "aws_cloudwatch_metric_alarm");
        assert_eq!(record["primary"]["id"], "disk");
        assert_eq!(record["primary"]["attributes"]["alarm_actions.#"], "1");
    }
}
