//! Pipeline orchestration
//!
//! This module provides the public API for Nutriplan. It runs a questionnaire
//! through every stage: parse → validate → calculate → encode (→ persist).

use crate::calculator::NutritionCalculator;
use crate::error::PlanError;
use crate::intake::IntakeForm;
use crate::store::PlanStore;
use crate::types::{IntakeAnswer, NutritionPlan, PlanProducer, PlanRecord};
use crate::{NUTRIPLAN_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current plan record format version
pub const RECORD_VERSION: &str = "1.0.0";

/// Convert a raw questionnaire JSON into a plan record JSON.
///
/// # Arguments
/// * `raw_json` - Questionnaire answers as submitted by the onboarding form
///
/// # Example
/// ```ignore
/// let record_json = intake_to_plan(
///     r#"{"name": "Ana", "age": "28", "weight": "62", "height": "168"}"#.to_string()
/// )?;
/// ```
pub fn intake_to_plan(raw_json: String) -> Result<String, PlanError> {
    let form = IntakeForm::from_json(&raw_json)?;
    let record = PlanProcessor::new().process(&form)?;
    Ok(record.to_json()?)
}

/// Encoder stamping producer metadata and creation time on plans
pub struct PlanEncoder {
    instance_id: String,
}

impl Default for PlanEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn encode(&self, intake: IntakeAnswer, plan: NutritionPlan) -> PlanRecord {
        PlanRecord {
            record_version: RECORD_VERSION.to_string(),
            producer: PlanProducer {
                name: PRODUCER_NAME.to_string(),
                version: NUTRIPLAN_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            intake,
            plan,
            created_at: Utc::now(),
        }
    }
}

/// Processor that can optionally persist every plan it produces.
pub struct PlanProcessor {
    encoder: PlanEncoder,
    store: Option<PlanStore>,
}

impl Default for PlanProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanProcessor {
    /// Create a processor without persistence
    pub fn new() -> Self {
        Self {
            encoder: PlanEncoder::new(),
            store: None,
        }
    }

    /// Create a processor that saves every record to `store`
    pub fn with_store(store: PlanStore) -> Self {
        Self {
            encoder: PlanEncoder::new(),
            store: Some(store),
        }
    }

    /// Replace the encoder (fixed instance IDs in tests)
    pub fn with_encoder(mut self, encoder: PlanEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Validate, calculate and encode a questionnaire
    pub fn process(&self, form: &IntakeForm) -> Result<PlanRecord, PlanError> {
        let answer = form.validate()?;
        self.process_answer(answer)
    }

    /// Calculate and encode an already validated answer
    pub fn process_answer(&self, answer: IntakeAnswer) -> Result<PlanRecord, PlanError> {
        let plan = NutritionCalculator::calculate(&answer)?;
        let record = self.encoder.encode(answer, plan);

        if let Some(store) = &self.store {
            store.save(&record)?;
        }

        Ok(record)
    }

    /// Most recently persisted record, if a store is attached
    pub fn last_record(&self) -> Result<Option<PlanRecord>, PlanError> {
        match &self.store {
            Some(store) => store.load(),
            None => Ok(None),
        }
    }
}
