//! Nutriplan - On-device calorie and macronutrient planning
//!
//! Nutriplan turns onboarding questionnaire answers into daily nutrition targets
//! through a deterministic pipeline: intake validation → Harris-Benedict energy
//! estimate → macronutrient split → plan record encoding.
//!
//! ## Modules
//!
//! - **Calculator**: BMR, activity multiplier and macro split
//! - **Intake**: Questionnaire parsing and validation
//! - **Meals**: Meal-plan book summaries, grouping and toggles

pub mod calculator;
pub mod config;
pub mod error;
pub mod intake;
pub mod meals;
pub mod pipeline;
pub mod store;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use calculator::{BodyProfile, MacroRatios, NutritionCalculator};
pub use config::PlannerConfig;
pub use error::{PlanError, ValidationError};
pub use intake::IntakeForm;
pub use meals::{Meal, MealBook, MealType};
pub use pipeline::{intake_to_plan, PlanEncoder, PlanProcessor};
pub use store::PlanStore;
pub use types::{ActivityLevel, Gender, IntakeAnswer, NutritionPlan, Objective, PlanRecord};

/// Nutriplan version embedded in all plan records
pub const NUTRIPLAN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for plan records
pub const PRODUCER_NAME: &str = "nutriplan";
