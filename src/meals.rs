//! Meal-plan book
//!
//! Operations behind the meal-plan browser: today's registered calories against
//! a goal, upcoming meals grouped by date, and favorite/registered toggles.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Daily calorie goal used when no plan is available
pub const DEFAULT_DAILY_CALORIE_GOAL: u32 = 2200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: u32,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub name: String,
    /// Scheduled time (HH:MM)
    pub time: String,
    pub calories: u32,
    #[serde(default)]
    pub registered: bool,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, alias = "isFavorite")]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Registered calories against the daily goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub registered_calories: u64,
    pub goal: u32,
    /// Share of the goal reached, capped at 100
    pub percentage: u32,
}

/// Upcoming meals sharing a date; `date` is `None` for undated meals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealGroup {
    pub date: Option<NaiveDate>,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealBook {
    #[serde(default)]
    pub today: Vec<Meal>,
    #[serde(default)]
    pub upcoming: Vec<Meal>,
}

impl MealBook {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn all_meals(&self) -> impl Iterator<Item = &Meal> {
        self.today.iter().chain(self.upcoming.iter())
    }

    fn all_meals_mut(&mut self) -> impl Iterator<Item = &mut Meal> {
        self.today.iter_mut().chain(self.upcoming.iter_mut())
    }

    /// Favorite meals from both lists, first occurrence of each id
    pub fn favorites(&self) -> Vec<Meal> {
        let mut seen = HashSet::new();
        self.all_meals()
            .filter(|meal| meal.is_favorite && seen.insert(meal.id))
            .cloned()
            .collect()
    }

    /// Flip `registered` for every meal with this id; returns the new state
    pub fn toggle_registered(&mut self, id: u32) -> Option<bool> {
        let current = self.all_meals().find(|m| m.id == id)?.registered;
        let next = !current;
        for meal in self.all_meals_mut().filter(|m| m.id == id) {
            meal.registered = next;
        }
        Some(next)
    }

    /// Flip `is_favorite` for every meal with this id; returns the new state
    pub fn toggle_favorite(&mut self, id: u32) -> Option<bool> {
        let current = self.all_meals().find(|m| m.id == id)?.is_favorite;
        let next = !current;
        for meal in self.all_meals_mut().filter(|m| m.id == id) {
            meal.is_favorite = next;
        }
        Some(next)
    }

    /// Summary of today's registered meals
    pub fn today_summary(&self, goal: u32) -> DailySummary {
        daily_summary(&self.today, goal)
    }

    /// Upcoming meals grouped by date, earliest first, undated last
    pub fn upcoming_by_date(&self) -> Vec<MealGroup> {
        let mut dated: BTreeMap<NaiveDate, Vec<Meal>> = BTreeMap::new();
        let mut undated = Vec::new();

        for meal in &self.upcoming {
            match meal.date {
                Some(date) => dated.entry(date).or_default().push(meal.clone()),
                None => undated.push(meal.clone()),
            }
        }

        let mut groups: Vec<MealGroup> = dated
            .into_iter()
            .map(|(date, meals)| MealGroup {
                date: Some(date),
                meals,
            })
            .collect();

        if !undated.is_empty() {
            groups.push(MealGroup {
                date: None,
                meals: undated,
            });
        }

        groups
    }
}

/// Sum registered calories and compare against the goal
pub fn daily_summary(meals: &[Meal], goal: u32) -> DailySummary {
    let registered_calories: u64 = meals
        .iter()
        .filter(|m| m.registered)
        .map(|m| u64::from(m.calories))
        .sum();

    let percentage = if goal == 0 {
        0
    } else {
        let pct = (registered_calories as f64 / goal as f64 * 100.0).round();
        pct.min(100.0) as u32
    };

    DailySummary {
        registered_calories,
        goal,
        percentage,
    }
}
