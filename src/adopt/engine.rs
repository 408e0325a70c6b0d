use serde_json::json;
use std::sync::{Mutex, OnceLock, PoisonError};

use super::alarm::NamedAlarm;
use super::error::AdoptResult;
use super::identifier::IdentifierAllocator;
use super::renderer::{TemplateRenderer, ALARM_TEMPLATE};
use super::source::AlarmSource;
use super::state::{assemble_named, StateDocument, StateFile};

/// Both artifacts of one engine run
#[derive(Debug, Clone)]
pub struct AdoptionOutput {
    /// Rendered Terraform configuration
    pub tf: String,
    /// State document keyed by `"<type>.<identifier>"`
    pub tfstate: StateDocument,
}

/// Extraction and state synthesis for metric alarms
///
/// The source is queried at most once per engine. Identifiers are allocated
/// when the fetch is memoized, so the rendered configuration and the state
/// document always name the same resources.
pub struct AlarmEngine {
    source: Box<dyn AlarmSource>,
    renderer: Box<dyn TemplateRenderer>,
    allocator: IdentifierAllocator,
    alarms: OnceLock<Vec<NamedAlarm>>,
    fetch_lock: Mutex<()>,
}

impl AlarmEngine {
    pub fn new(
        source: Box<dyn AlarmSource>,
        renderer: Box<dyn TemplateRenderer>,
        allocator: IdentifierAllocator,
    ) -> Self {
        Self {
            source,
            renderer,
            allocator,
            alarms: OnceLock::new(),
            fetch_lock: Mutex::new(()),
        }
    }

    /// Produce the configuration and the state document together
    pub fn execute(&self) -> AdoptResult<AdoptionOutput> {
        let tf = self.tf()?;
        let tfstate = self.tfstate()?;
        Ok(AdoptionOutput { tf, tfstate })
    }

    /// Cached alarms with their identifiers, for the template renderer
    pub fn provide_context(&self) -> AdoptResult<&[NamedAlarm]> {
        Ok(self.alarms()?.as_slice())
    }

    /// Render the Terraform configuration
    pub fn tf(&self) -> AdoptResult<String> {
        let alarms = self.provide_context()?;
        let context = json!({ "alarms": alarms });

        tracing::debug!("Rendering {} with {} alarm(s)", ALARM_TEMPLATE, alarms.len());
        self.renderer.render(ALARM_TEMPLATE, &context)
    }

    /// Build the state document
    pub fn tfstate(&self) -> AdoptResult<StateDocument> {
        let alarms = self.alarms()?;
        let document = assemble_named(alarms);

        tracing::debug!("Assembled state document with {} record(s)", document.len());
        Ok(document)
    }

    /// Description of the alarm source, for status output
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Build the state document wrapped in a state file envelope
    pub fn tfstate_file(&self) -> AdoptResult<StateFile> {
        Ok(StateFile::new(self.tfstate()?))
    }

    fn alarms(&self) -> AdoptResult<&Vec<NamedAlarm>> {
        if let Some(alarms) = self.alarms.get() {
            return Ok(alarms);
        }

        // First callers queue here so the source is listed once
        let _guard = self
            .fetch_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(alarms) = self.alarms.get() {
            return Ok(alarms);
        }

        tracing::debug!("Listing alarms from {}", self.source.describe());
        let named: Vec<NamedAlarm> = self
            .source
            .list_alarms()?
            .into_iter()
            .map(|alarm| NamedAlarm {
                identifier: self.allocator.allocate(&alarm.alarm_name),
                alarm,
            })
            .collect();
        tracing::debug!("Fetched {} alarm(s)", named.len());

        Ok(self.alarms.get_or_init(|| named))
    }
}
