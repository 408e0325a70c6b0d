use serde::{Deserialize, Serialize};

use super::identifier::InternalIdentifier;

/// Terraform resource type handled by this engine
pub const RESOURCE_TYPE: &str = "aws_cloudwatch_metric_alarm";

/// One element of an alarm sub-collection
///
/// Action lists carry plain ARNs, dimensions carry name/value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollectionElement {
    /// A bare string such as an SNS topic ARN
    PlainValue(String),
    /// A named pair such as `InstanceId = i-123`
    NamedValue {
        #[serde(alias = "Name")]
        name: String,
        #[serde(alias = "Value")]
        value: String,
    },
}

impl CollectionElement {
    /// Create a plain string element
    pub fn plain(value: impl Into<String>) -> Self {
        CollectionElement::PlainValue(value.into())
    }

    /// Create a name/value element
    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        CollectionElement::NamedValue {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A CloudWatch metric alarm as returned by `DescribeAlarms`
///
/// Accepts both the AWS API casing (`AlarmName`, `OKActions`, ...) and
/// snake_case on input; always serializes as snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAlarm {
    #[serde(alias = "AlarmName")]
    pub alarm_name: String,

    #[serde(alias = "ActionsEnabled")]
    pub actions_enabled: bool,

    #[serde(alias = "AlarmDescription", default)]
    pub alarm_description: Option<String>,

    #[serde(alias = "ComparisonOperator")]
    pub comparison_operator: String,

    #[serde(alias = "EvaluationPeriods")]
    pub evaluation_periods: i64,

    #[serde(alias = "MetricName")]
    pub metric_name: String,

    #[serde(alias = "Namespace")]
    pub namespace: String,

    #[serde(alias = "Period")]
    pub period: i64,

    #[serde(alias = "Statistic")]
    pub statistic: String,

    #[serde(alias = "Threshold")]
    pub threshold: f64,

    #[serde(alias = "Unit", default)]
    pub unit: Option<String>,

    #[serde(alias = "InsufficientDataActions", default)]
    pub insufficient_data_actions: Vec<CollectionElement>,

    #[serde(alias = "AlarmActions", default)]
    pub alarm_actions: Vec<CollectionElement>,

    #[serde(alias = "OKActions", default)]
    pub ok_actions: Vec<CollectionElement>,

    #[serde(alias = "Dimensions", default)]
    pub dimensions: Vec<CollectionElement>,
}

impl MetricAlarm {
    /// Create an alarm with the given name and neutral defaults
    pub fn new(alarm_name: impl Into<String>) -> Self {
        Self {
            alarm_name: alarm_name.into(),
            actions_enabled: true,
            alarm_description: None,
            comparison_operator: "GreaterThanOrEqualToThreshold".to_string(),
            evaluation_periods: 1,
            metric_name: "CPUUtilization".to_string(),
            namespace: "AWS/EC2".to_string(),
            period: 300,
            statistic: "Average".to_string(),
            threshold: 0.0,
            unit: None,
            insufficient_data_actions: Vec::new(),
            alarm_actions: Vec::new(),
            ok_actions: Vec::new(),
            dimensions: Vec::new(),
        }
    }

    /// The identifier Terraform uses to import this alarm
    pub fn primary_id(&self) -> &str {
        &self.alarm_name
    }

    /// Sub-collections in the order they are written to state
    pub fn checksummed_collections(&self) -> [(&'static str, &[CollectionElement]); 4] {
        [
            (
                "insufficient_data_actions",
                self.insufficient_data_actions.as_slice(),
            ),
            ("alarm_actions", self.alarm_actions.as_slice()),
            ("ok_actions", self.ok_actions.as_slice()),
            ("dimensions", self.dimensions.as_slice()),
        ]
    }

    /// Check that action lists hold plain values and dimensions hold pairs
    pub fn check_collection_shapes(&self) -> Result<(), String> {
        for (field, elements) in self.checksummed_collections() {
            let wants_pairs = field == "dimensions";
            for (index, element) in elements.iter().enumerate() {
                let is_pair = matches!(element, CollectionElement::NamedValue { .. });
                if is_pair != wants_pairs {
                    let expected = if wants_pairs {
                        "a name/value pair"
                    } else {
                        "a plain string"
                    };
                    return Err(format!("{}[{}] must be {}", field, index, expected));
                }
            }
        }
        Ok(())
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.alarm_description = Some(description.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_alarm_action(mut self, arn: impl Into<String>) -> Self {
        self.alarm_actions.push(CollectionElement::plain(arn));
        self
    }

    pub fn with_ok_action(mut self, arn: impl Into<String>) -> Self {
        self.ok_actions.push(CollectionElement::plain(arn));
        self
    }

    pub fn with_insufficient_data_action(mut self, arn: impl Into<String>) -> Self {
        self.insufficient_data_actions
            .push(CollectionElement::plain(arn));
        self
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.push(CollectionElement::named(name, value));
        self
    }
}

/// An alarm paired with the identifier allocated for it
///
/// Serializes flat: the descriptor fields plus `identifier`.
#[derive(Debug, Clone, Serialize)]
pub struct NamedAlarm {
    pub identifier: InternalIdentifier,
    #[serde(flatten)]
    pub alarm: MetricAlarm,
}

impl NamedAlarm {
    /// Key of this alarm in the state document
    pub fn state_key(&self) -> String {
        format!("{}.{}", RESOURCE_TYPE, self.identifier)
    }
}
