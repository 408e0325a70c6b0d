//! CloudWatch Metric Alarm Adoption
//!
//! This module turns existing, manually created CloudWatch metric alarms into
//! two artifacts that let Terraform manage them without recreating them:
//!
//! - A Terraform configuration with one `aws_cloudwatch_metric_alarm` block
//!   per alarm
//! - A state document in the legacy flatmap encoding, keyed by
//!   `aws_cloudwatch_metric_alarm.<identifier>`
//!
//! # Pipeline
//!
//! 1. An [`AlarmSource`] lists the alarms once; the engine memoizes them
//! 2. The [`IdentifierAllocator`] derives a resource name for each alarm
//! 3. The configuration is rendered from the cached alarms
//! 4. The state document is assembled from the same cached alarms
//!
//! # Usage
//!
//! ```bash
//! aws cloudwatch describe-alarms > alarms.json
//! tfadopt export --input alarms.json --output-dir ./adopted
//! ```

pub mod alarm;
pub mod attributes;
pub mod engine;
pub mod error;
pub mod identifier;
pub mod renderer;
pub mod source;
pub mod state;

// Re-export commonly used types
pub use alarm::{CollectionElement, MetricAlarm, NamedAlarm, RESOURCE_TYPE};
pub use attributes::{build_attributes, AttributeMap};
pub use engine::{AdoptionOutput, AlarmEngine};
pub use error::{AdoptError, AdoptResult};
pub use identifier::{EntropySource, IdentifierAllocator, InternalIdentifier};
pub use renderer::{HandlebarsRenderer, TemplateRenderer, ALARM_TEMPLATE};
pub use source::{AlarmSource, DescribeAlarmsFile, StaticAlarmSource};
pub use state::{assemble, StateDocument, StateFile};
