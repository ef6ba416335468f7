//! Intake questionnaire parsing and validation
//!
//! The onboarding questionnaire submits every answer as typed by the user:
//! numbers may arrive as JSON numbers or as strings, and objective/activity
//! answers are display labels. This module turns those raw answers into a
//! validated [`IntakeAnswer`].

use crate::error::{PlanError, ValidationError};
use crate::types::{ActivityLevel, Gender, IntakeAnswer, Objective};
use serde::{Deserialize, Serialize};

/// Accepted age range (years)
pub const AGE_RANGE: (f64, f64) = (12.0, 120.0);
/// Accepted weight range (kg)
pub const WEIGHT_RANGE: (f64, f64) = (30.0, 300.0);
/// Accepted height range (cm)
pub const HEIGHT_RANGE: (f64, f64) = (100.0, 250.0);
/// Accepted sleep range (hours per night)
pub const SLEEP_RANGE: (f64, f64) = (4.0, 12.0);

/// A numeric answer as submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Raw questionnaire answers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeForm {
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default, alias = "activityLevel")]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<FieldValue>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, alias = "weight")]
    pub weight_kg: Option<FieldValue>,
    #[serde(default, alias = "height")]
    pub height_cm: Option<FieldValue>,
    #[serde(default, alias = "sleepHours")]
    pub sleep_hours: Option<FieldValue>,
}

impl IntakeForm {
    /// Parse a single form from JSON
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a JSON array of forms
    pub fn parse_array(json: &str) -> Result<Vec<Self>, PlanError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse newline-delimited JSON, one form per line
    pub fn parse_ndjson(input: &str) -> Result<Vec<Self>, PlanError> {
        input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Self::from_json)
            .collect()
    }

    /// Validate the answers and resolve labels
    pub fn validate(&self) -> Result<IntakeAnswer, ValidationError> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ValidationError::MissingField("name".to_string()))?
            .to_string();

        let age = required_number("age", self.age.as_ref(), AGE_RANGE)?;
        let weight_kg = required_number("weight_kg", self.weight_kg.as_ref(), WEIGHT_RANGE)?;
        let height_cm = required_number("height_cm", self.height_cm.as_ref(), HEIGHT_RANGE)?;
        let sleep_hours = optional_number("sleep_hours", self.sleep_hours.as_ref(), SLEEP_RANGE)?;

        let gender = match self.gender.as_deref().map(str::trim) {
            None | Some("") => Gender::default(),
            Some(label) => {
                Gender::from_label(label).ok_or_else(|| ValidationError::UnknownValue {
                    field: "gender".to_string(),
                    value: label.to_string(),
                })?
            }
        };

        let objective = resolve_label("objective", self.objective.as_deref(), Objective::from_label);
        let activity_level = resolve_label(
            "activity_level",
            self.activity_level.as_deref(),
            ActivityLevel::from_label,
        );

        Ok(IntakeAnswer {
            objective,
            activity_level,
            name,
            age,
            gender,
            weight_kg,
            height_cm,
            sleep_hours,
        })
    }
}

/// Validate a batch of forms, returning only the failures
pub fn validate_forms(forms: &[IntakeForm]) -> Vec<ValidationResult> {
    forms
        .iter()
        .enumerate()
        .filter_map(|(index, form)| {
            form.validate().err().map(|error| ValidationResult {
                index,
                name: form.name.clone(),
                error,
            })
        })
        .collect()
}

/// A failed form in a batch
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub index: usize,
    pub name: Option<String>,
    pub error: ValidationError,
}

fn resolve_label<T>(field: &str, label: Option<&str>, resolve: fn(&str) -> Option<T>) -> Option<T> {
    let label = label.map(str::trim).filter(|l| !l.is_empty())?;
    let resolved = resolve(label);
    if resolved.is_none() {
        tracing::warn!(field, label, "unrecognised label, using default");
    }
    resolved
}

fn parse_number(field: &str, value: &FieldValue) -> Result<f64, ValidationError> {
    let number = match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => s.trim().parse::<f64>().map_err(|_| ValidationError::NotANumber {
            field: field.to_string(),
            value: s.clone(),
        })?,
    };

    if !number.is_finite() {
        return Err(ValidationError::NotANumber {
            field: field.to_string(),
            value: number.to_string(),
        });
    }
    Ok(number)
}

fn check_range(field: &str, value: f64, (min, max): (f64, f64)) -> Result<f64, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn required_number(
    field: &str,
    value: Option<&FieldValue>,
    range: (f64, f64),
) -> Result<f64, ValidationError> {
    match value {
        Some(v) if !v.is_blank() => check_range(field, parse_number(field, v)?, range),
        _ => Err(ValidationError::MissingField(field.to_string())),
    }
}

fn optional_number(
    field: &str,
    value: Option<&FieldValue>,
    range: (f64, f64),
) -> Result<Option<f64>, ValidationError> {
    match value {
        Some(v) if !v.is_blank() => check_range(field, parse_number(field, v)?, range).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn questionnaire_json() -> &'static str {
        r#"{
            "objective": "Perder peso",
            "activityLevel": "Muy activo",
            "name": "Ana",
            "age": "28",
            "gender": "female",
            "weight": "62.5",
            "height": "168",
            "sleepHours": "7"
        }"#
    }

    #[test]
    fn test_questionnaire_form() {
        let form = IntakeForm::from_json(questionnaire_json()).unwrap();
        let answer = form.validate().unwrap();

        assert_eq!(
            answer,
            IntakeAnswer {
                objective: Some(Objective::LoseWeight),
                activity_level: Some(ActivityLevel::VeryActive),
                name: "Ana".to_string(),
                age: 28.0,
                gender: Gender::Female,
                weight_kg: 62.5,
                height_cm: 168.0,
                sleep_hours: Some(7.0),
            }
        );
    }

    #[test]
    fn test_numeric_json_values() {
        let form = IntakeForm::from_json(
            r#"{"name": "Leo", "age": 40, "weight_kg": 80, "height_cm": 180.5}"#,
        )
        .unwrap();
        let answer = form.validate().unwrap();

        assert_eq!(answer.age, 40.0);
        assert_eq!(answer.height_cm, 180.5);
        assert_eq!(answer.gender, Gender::Male);
        assert_eq!(answer.objective, None);
        assert_eq!(answer.activity_level, None);
        assert_eq!(answer.sleep_hours, None);
    }

    #[test]
    fn test_missing_fields() {
        let mut form = IntakeForm::from_json(questionnaire_json()).unwrap();
        form.name = Some("   ".to_string());
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::MissingField("name".to_string())
        );

        let mut form = IntakeForm::from_json(questionnaire_json()).unwrap();
        form.weight_kg = Some("".into());
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::MissingField("weight_kg".to_string())
        );
    }

    #[test]
    fn test_not_a_number() {
        let mut form = IntakeForm::from_json(questionnaire_json()).unwrap();
        form.age = Some("twenty".into());
        assert!(matches!(
            form.validate().unwrap_err(),
            ValidationError::NotANumber { ref field, .. } if field == "age"
        ));
    }

    #[test]
    fn test_out_of_range() {
        let mut form = IntakeForm::from_json(questionnaire_json()).unwrap();
        form.height_cm = Some(FieldValue::Number(90.0));
        assert!(matches!(
            form.validate().unwrap_err(),
            ValidationError::OutOfRange { ref field, .. } if field == "height_cm"
        ));

        let mut form = IntakeForm::from_json(questionnaire_json()).unwrap();
        form.sleep_hours = Some("15".into());
        assert!(matches!(
            form.validate().unwrap_err(),
            ValidationError::OutOfRange { ref field, .. } if field == "sleep_hours"
        ));
    }

    #[test]
    fn test_gender_words() {
        let mut form = IntakeForm::from_json(questionnaire_json()).unwrap();
        form.gender = Some("woman".to_string());
        assert_eq!(form.validate().unwrap().gender, Gender::Female);

        form.gender = Some("Man".to_string());
        assert_eq!(form.validate().unwrap().gender, Gender::Male);
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let mut form = IntakeForm::from_json(questionnaire_json()).unwrap();
        form.gender = Some("unspecified".to_string());
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::UnknownValue {
                field: "gender".to_string(),
                value: "unspecified".to_string(),
            }
        );

        // Blank keeps the questionnaire default
        form.gender = Some("  ".to_string());
        assert_eq!(form.validate().unwrap().gender, Gender::Male);
    }

    #[test]
    fn test_unknown_labels_resolve_to_none() {
        let mut form = IntakeForm::from_json(questionnaire_json()).unwrap();
        form.objective = Some("something else".to_string());
        form.activity_level = Some("couch".to_string());
        let answer = form.validate().unwrap();
        assert_eq!(answer.objective, None);
        assert_eq!(answer.activity_level, None);
    }

    #[test]
    fn test_parse_ndjson_and_validate_batch() {
        let input = format!(
            "{}\n\n{}\n",
            r#"{"name": "Ana", "age": 28, "weight": 62, "height": 168}"#,
            r#"{"name": "Bo", "age": 8, "weight": 30, "height": 120}"#
        );
        let forms = IntakeForm::parse_ndjson(&input).unwrap();
        assert_eq!(forms.len(), 2);

        let failures = validate_forms(&forms);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[0].name.as_deref(), Some("Bo"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(IntakeForm::from_json("not json").is_err());
        assert!(IntakeForm::parse_array("{}").is_err());
    }
}
