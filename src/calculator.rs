//! Calorie and macronutrient calculation
//!
//! Daily energy is estimated with the Harris-Benedict equations (metric units),
//! scaled by an activity multiplier, then split into protein, carbohydrate and
//! fat gram targets according to the stated objective.

use crate::error::PlanError;
use crate::types::{ActivityLevel, Gender, IntakeAnswer, NutritionPlan, Objective};

/// Energy density of protein and carbohydrate (kcal/g)
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
/// Energy density of fat (kcal/g)
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Largest daily energy a plan can carry (kcal); every gram target is smaller
pub const MAX_DAILY_ENERGY: f64 = u32::MAX as f64;

/// Multiplier applied when the activity level is unknown
pub const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.2;

/// Fraction of daily calories allotted to each macronutrient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroRatios {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroRatios {
    /// Ratio profile for an objective. Maintain, performance and unknown
    /// objectives share the balanced profile.
    pub fn for_objective(objective: Option<Objective>) -> Self {
        match objective {
            Some(Objective::LoseWeight) => Self {
                protein: 0.30,
                carbs: 0.40,
                fat: 0.25,
            },
            Some(Objective::GainMass) => Self {
                protein: 0.35,
                carbs: 0.45,
                fat: 0.20,
            },
            Some(Objective::Maintain) | Some(Objective::Performance) | None => Self {
                protein: 0.30,
                carbs: 0.50,
                fat: 0.20,
            },
        }
    }

    /// Sum of the three fractions
    pub fn total(&self) -> f64 {
        self.protein + self.carbs + self.fat
    }
}

/// Body measurements and lifestyle inputs for the calculator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProfile {
    pub gender: Gender,
    pub age: f64,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: Option<ActivityLevel>,
    pub objective: Option<Objective>,
}

impl From<&IntakeAnswer> for BodyProfile {
    fn from(answer: &IntakeAnswer) -> Self {
        Self {
            gender: answer.gender,
            age: answer.age,
            weight_kg: answer.weight_kg,
            height_cm: answer.height_cm,
            activity_level: answer.activity_level,
            objective: answer.objective,
        }
    }
}

/// Stateless calculator for nutrition plans
pub struct NutritionCalculator;

impl NutritionCalculator {
    /// Compute the plan for a validated intake answer
    pub fn calculate(answer: &IntakeAnswer) -> Result<NutritionPlan, PlanError> {
        Self::calculate_profile(&BodyProfile::from(answer))
    }

    /// Compute the plan for a body profile
    pub fn calculate_profile(profile: &BodyProfile) -> Result<NutritionPlan, PlanError> {
        let energy = daily_energy(profile)?;
        let ratios = MacroRatios::for_objective(profile.objective);

        let plan = NutritionPlan {
            calories: round_kcal(energy),
            protein_g: round_kcal(energy * ratios.protein / KCAL_PER_GRAM_PROTEIN),
            carbs_g: round_kcal(energy * ratios.carbs / KCAL_PER_GRAM_CARBS),
            fat_g: round_kcal(energy * ratios.fat / KCAL_PER_GRAM_FAT),
            meals_per_day: meals_per_day(profile.activity_level),
        };

        tracing::debug!(
            calories = plan.calories,
            protein_g = plan.protein_g,
            carbs_g = plan.carbs_g,
            fat_g = plan.fat_g,
            "computed nutrition plan"
        );

        Ok(plan)
    }
}

/// Basal metabolic rate (kcal/day) from the Harris-Benedict equations
pub fn basal_metabolic_rate(gender: Gender, age: f64, weight_kg: f64, height_cm: f64) -> f64 {
    match gender {
        Gender::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age,
        Gender::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age,
    }
}

/// Activity multiplier applied to the BMR
pub fn activity_multiplier(level: Option<ActivityLevel>) -> f64 {
    match level {
        Some(ActivityLevel::Sedentary) => 1.2,
        Some(ActivityLevel::Light) => 1.375,
        Some(ActivityLevel::Moderate) => 1.55,
        Some(ActivityLevel::Active) => 1.725,
        Some(ActivityLevel::VeryActive) => 1.9,
        None => DEFAULT_ACTIVITY_MULTIPLIER,
    }
}

/// Number of meals the plan is split into
pub fn meals_per_day(level: Option<ActivityLevel>) -> u32 {
    match level {
        Some(ActivityLevel::VeryActive) => 6,
        _ => 5,
    }
}

/// Unrounded daily energy expenditure (kcal/day)
pub fn daily_energy(profile: &BodyProfile) -> Result<f64, PlanError> {
    check_positive("age", profile.age)?;
    check_positive("weight_kg", profile.weight_kg)?;
    check_positive("height_cm", profile.height_cm)?;

    let bmr = basal_metabolic_rate(
        profile.gender,
        profile.age,
        profile.weight_kg,
        profile.height_cm,
    );
    if !(bmr.is_finite() && bmr > 0.0) {
        return Err(PlanError::invalid_input(
            "bmr",
            format!("basal metabolic rate must be positive, got {bmr:.1}"),
        ));
    }

    let energy = bmr * activity_multiplier(profile.activity_level);
    if energy > MAX_DAILY_ENERGY {
        return Err(PlanError::invalid_input(
            "calories",
            format!("daily energy {energy:.0} kcal exceeds {MAX_DAILY_ENERGY:.0} kcal"),
        ));
    }

    Ok(energy)
}

fn check_positive(field: &str, value: f64) -> Result<(), PlanError> {
    if !value.is_finite() {
        return Err(PlanError::invalid_input(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(PlanError::invalid_input(
            field,
            format!("must be greater than zero, got {value}"),
        ));
    }
    Ok(())
}

// `daily_energy` keeps the value within 0..=MAX_DAILY_ENERGY.
fn round_kcal(value: f64) -> u32 {
    value.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile(gender: Gender, activity: Option<ActivityLevel>) -> BodyProfile {
        BodyProfile {
            gender,
            age: 30.0,
            weight_kg: 70.0,
            height_cm: 175.0,
            activity_level: activity,
            objective: Some(Objective::Maintain),
        }
    }

    #[test]
    fn test_male_bmr_sedentary() {
        let bmr = basal_metabolic_rate(Gender::Male, 30.0, 70.0, 175.0);
        assert!((bmr - 1695.667).abs() < 0.001);

        let plan = NutritionCalculator::calculate_profile(&profile(
            Gender::Male,
            Some(ActivityLevel::Sedentary),
        ))
        .unwrap();
        assert_eq!(plan.calories, 2035);
        assert_eq!(plan.meals_per_day, 5);
    }

    #[test]
    fn test_female_bmr_moderate() {
        let bmr = basal_metabolic_rate(Gender::Female, 30.0, 70.0, 175.0);
        assert!((bmr - 1507.133).abs() < 0.001);

        let plan = NutritionCalculator::calculate_profile(&profile(
            Gender::Female,
            Some(ActivityLevel::Moderate),
        ))
        .unwrap();
        assert_eq!(plan.calories, 2336);
    }

    #[test]
    fn test_macro_split_maintain() {
        let plan = NutritionCalculator::calculate_profile(&profile(
            Gender::Male,
            Some(ActivityLevel::Sedentary),
        ))
        .unwrap();

        // energy = 2034.8004
        assert_eq!(
            plan,
            NutritionPlan {
                calories: 2035,
                protein_g: 153,
                carbs_g: 254,
                fat_g: 45,
                meals_per_day: 5,
            }
        );
    }

    #[test]
    fn test_macro_energy_matches_calories() {
        let objectives = [
            Some(Objective::LoseWeight),
            Some(Objective::GainMass),
            Some(Objective::Maintain),
            Some(Objective::Performance),
            None,
        ];
        let levels = [
            Some(ActivityLevel::Sedentary),
            Some(ActivityLevel::Light),
            Some(ActivityLevel::Moderate),
            Some(ActivityLevel::Active),
            Some(ActivityLevel::VeryActive),
        ];

        for gender in [Gender::Male, Gender::Female] {
            for objective in objectives {
                for level in levels {
                    let mut p = profile(gender, level);
                    p.objective = objective;
                    let plan = NutritionCalculator::calculate_profile(&p).unwrap();
                    let ratios = MacroRatios::for_objective(objective);

                    let macro_kcal = plan.protein_g as f64 * KCAL_PER_GRAM_PROTEIN
                        + plan.carbs_g as f64 * KCAL_PER_GRAM_CARBS
                        + plan.fat_g as f64 * KCAL_PER_GRAM_FAT;
                    let expected = plan.calories as f64 * ratios.total();

                    // Each gram target is off by at most half a gram
                    assert!(
                        (macro_kcal - expected).abs() <= 9.0,
                        "{gender:?} {objective:?} {level:?}: {macro_kcal} vs {expected}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_meals_per_day_only_very_active() {
        assert_eq!(meals_per_day(Some(ActivityLevel::VeryActive)), 6);
        assert_eq!(meals_per_day(Some(ActivityLevel::Active)), 5);
        assert_eq!(meals_per_day(Some(ActivityLevel::Sedentary)), 5);
        assert_eq!(meals_per_day(None), 5);
    }

    #[test]
    fn test_unknown_activity_matches_sedentary() {
        let unknown =
            NutritionCalculator::calculate_profile(&profile(Gender::Female, None)).unwrap();
        let sedentary = NutritionCalculator::calculate_profile(&profile(
            Gender::Female,
            Some(ActivityLevel::Sedentary),
        ))
        .unwrap();
        assert_eq!(unknown, sedentary);
    }

    #[test]
    fn test_performance_uses_balanced_ratios() {
        assert_eq!(
            MacroRatios::for_objective(Some(Objective::Performance)),
            MacroRatios::for_objective(None)
        );
        assert_eq!(
            MacroRatios::for_objective(Some(Objective::Maintain)),
            MacroRatios::for_objective(None)
        );
    }

    #[test]
    fn test_idempotent() {
        let p = profile(Gender::Male, Some(ActivityLevel::Active));
        let first = NutritionCalculator::calculate_profile(&p).unwrap();
        let second = NutritionCalculator::calculate_profile(&p).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_nan_and_non_positive() {
        let mut p = profile(Gender::Male, None);
        p.weight_kg = f64::NAN;
        let err = NutritionCalculator::calculate_profile(&p).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput { ref field, .. } if field == "weight_kg"));

        let mut p = profile(Gender::Male, None);
        p.height_cm = 0.0;
        let err = NutritionCalculator::calculate_profile(&p).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput { ref field, .. } if field == "height_cm"));

        let mut p = profile(Gender::Male, None);
        p.age = -4.0;
        assert!(NutritionCalculator::calculate_profile(&p).is_err());
    }

    #[test]
    fn test_rejects_unrepresentable_energy() {
        let mut p = profile(Gender::Male, Some(ActivityLevel::VeryActive));
        p.weight_kg = 1e30;
        let err = NutritionCalculator::calculate_profile(&p).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput { ref field, .. } if field == "calories"));
    }

    #[test]
    fn test_rejects_non_positive_bmr() {
        let p = BodyProfile {
            gender: Gender::Male,
            age: 500.0,
            weight_kg: 30.0,
            height_cm: 100.0,
            activity_level: None,
            objective: None,
        };
        let err = NutritionCalculator::calculate_profile(&p).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput { ref field, .. } if field == "bmr"));
    }
}
