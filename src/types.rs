//! Core types for Nutriplan
//!
//! This module defines the data structures that flow through the planner:
//! questionnaire answers, the computed nutrition plan, and the persisted record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Biological sex used to select the BMR coefficients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Resolve a questionnaire label
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "male" | "m" | "man" | "masculino" | "hombre" | "homem" => Some(Gender::Male),
            "female" | "f" | "woman" | "femenino" | "feminino" | "mujer" | "mulher" => {
                Some(Gender::Female)
            }
            _ => None,
        }
    }
}

/// What the user wants to achieve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    LoseWeight,
    GainMass,
    Maintain,
    Performance,
}

impl Objective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::LoseWeight => "lose_weight",
            Objective::GainMass => "gain_mass",
            Objective::Maintain => "maintain",
            Objective::Performance => "performance",
        }
    }

    /// Resolve a canonical name, English label, or questionnaire display label
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "lose_weight" | "lose weight" | "perder peso" => Some(Objective::LoseWeight),
            "gain_mass" | "gain mass" | "ganhar massa" | "ganar masa" => Some(Objective::GainMass),
            "maintain" | "manter saude" | "manter saúde" | "mantener salud" => {
                Some(Objective::Maintain)
            }
            "performance" | "melhorar rendimento" | "mejorar rendimiento" => {
                Some(Objective::Performance)
            }
            _ => None,
        }
    }
}

/// Stated exercise frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Resolve a canonical name, English label, or questionnaire display label
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "sedentary" | "sedentario" | "sedentário" => Some(ActivityLevel::Sedentary),
            "light" | "ligero" | "leve" => Some(ActivityLevel::Light),
            "moderate" | "moderado" => Some(ActivityLevel::Moderate),
            "active" | "activo" | "ativo" => Some(ActivityLevel::Active),
            "very_active" | "very active" | "muy activo" | "muito ativo" => {
                Some(ActivityLevel::VeryActive)
            }
            _ => None,
        }
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Validated questionnaire answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeAnswer {
    /// Stated objective; `None` when the label was missing or unrecognised
    pub objective: Option<Objective>,
    /// Stated activity level; `None` when the label was missing or unrecognised
    pub activity_level: Option<ActivityLevel>,
    pub name: String,
    /// Age in years
    pub age: f64,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
    /// Usual hours of sleep per night
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
}

/// Daily nutrition targets derived from an intake answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionPlan {
    /// Daily calorie target (kcal)
    pub calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
    pub meals_per_day: u32,
}

/// Producer metadata stamped on persisted records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// The persisted questionnaire result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub record_version: String,
    pub producer: PlanProducer,
    pub intake: IntakeAnswer,
    pub plan: NutritionPlan,
    pub created_at: DateTime<Utc>,
}

impl PlanRecord {
    /// Load a record from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize a record to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
