//! Flat attribute maps in the Terraform flatmap state encoding
//!
//! Terraform's legacy state stores every attribute as a string under a
//! dotted key. Lists and sets are flattened into a `<field>.#` count key plus
//! one key per element. Set elements without a natural name are keyed by the
//! CRC-32 of their content, which is what the AWS provider computes for
//! string sets.

use indexmap::IndexMap;
use serde::Serialize;

use super::alarm::{CollectionElement, MetricAlarm};

/// Ordered dotted-key to string-value mapping for one resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeMap(IndexMap<String, String>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Build the state attributes of one alarm
pub fn build_attributes(alarm: &MetricAlarm) -> AttributeMap {
    let mut attributes = AttributeMap::new();

    attributes.insert("actions_enabled", alarm.actions_enabled.to_string());
    attributes.insert("alarm_description", optional_text(&alarm.alarm_description));
    attributes.insert("alarm_name", alarm.alarm_name.as_str());
    attributes.insert("comparison_operator", alarm.comparison_operator.as_str());
    attributes.insert("evaluation_periods", alarm.evaluation_periods.to_string());
    attributes.insert("id", alarm.primary_id());
    attributes.insert("metric_name", alarm.metric_name.as_str());
    attributes.insert("namespace", alarm.namespace.as_str());
    attributes.insert("period", alarm.period.to_string());
    attributes.insert("statistic", alarm.statistic.as_str());
    attributes.insert("threshold", format_float(alarm.threshold));
    attributes.insert("unit", optional_text(&alarm.unit));

    for (field, elements) in alarm.checksummed_collections() {
        insert_collection(&mut attributes, field, elements);
    }

    attributes
}

/// Flatten one sub-collection into `<field>.#` and `<field>.<sub-key>` entries
///
/// Sub-keys are not deduplicated: a later element with the same sub-key
/// overwrites the earlier one, while the count still reflects every element.
pub fn insert_collection(
    attributes: &mut AttributeMap,
    field: &str,
    elements: &[CollectionElement],
) {
    attributes.insert(format!("{}.#", field), elements.len().to_string());

    for element in elements {
        let (sub_key, value) = element_entry(element);
        attributes.insert(format!("{}.{}", field, sub_key), value);
    }
}

/// Sub-key and value of a single collection element
pub fn element_entry(element: &CollectionElement) -> (String, &str) {
    match element {
        CollectionElement::PlainValue(value) => (checksum(value).to_string(), value.as_str()),
        CollectionElement::NamedValue { name, value } => (name.clone(), value.as_str()),
    }
}

/// CRC-32 (IEEE) of the UTF-8 bytes of `value`
pub fn checksum(value: &str) -> u32 {
    crc32fast::hash(value.as_bytes())
}

fn optional_text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Float text as Terraform's AWS provider recorded it
///
/// Fixed notation with at least one fractional digit while the decimal point
/// sits within the first 16 digits and the value is at least `1e-4`;
/// otherwise `d.ddde+XX` with a two-digit minimum exponent.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // Shortest round-trip digits and their decimal exponent
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let point = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if (1..=16).contains(&point) {
        let point = point as usize;
        if digits.len() <= point {
            format!("{}{}.0", digits, "0".repeat(point - digits.len()))
        } else {
            format!("{}.{}", &digits[..point], &digits[point..])
        }
    } else if (-3..=0).contains(&point) {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else {
        let fraction = if digits.len() > 1 { &digits[1..] } else { "0" };
        format!("{}.{}e{:+03}", &digits[..1], fraction, point - 1)
    };

    if value.is_sign_negative() {
        format!("-{}", body)
    } else {
        body
    }
}
