//! Planner configuration
//!
//! Defaults can be overridden from the environment:
//! - `NUTRIPLAN_STORE`: path of the stored plan record
//! - `NUTRIPLAN_CALORIE_GOAL`: fallback daily calorie goal for meal summaries

use crate::meals::DEFAULT_DAILY_CALORIE_GOAL;
use crate::store::{PlanStore, DEFAULT_STORE_FILE};
use std::path::PathBuf;

pub const STORE_ENV: &str = "NUTRIPLAN_STORE";
pub const CALORIE_GOAL_ENV: &str = "NUTRIPLAN_CALORIE_GOAL";

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub store_path: PathBuf,
    pub daily_calorie_goal: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            daily_calorie_goal: DEFAULT_DAILY_CALORIE_GOAL,
        }
    }
}

impl PlannerConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(STORE_ENV).filter(|p| !p.trim().is_empty()) {
            config.store_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(CALORIE_GOAL_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(goal) if goal > 0 => config.daily_calorie_goal = goal,
                _ => tracing::warn!(
                    value = %raw,
                    "ignoring invalid {CALORIE_GOAL_ENV}"
                ),
            }
        }

        config
    }

    pub fn store(&self) -> PlanStore {
        PlanStore::new(&self.store_path)
    }

    /// Daily goal for meal summaries: the stored plan's calories, else the
    /// configured goal. An unreadable record falls back to the configured goal.
    pub fn summary_goal(&self) -> u32 {
        match self.store().load() {
            Ok(Some(record)) => record.plan.calories,
            Ok(None) => self.daily_calorie_goal,
            Err(e) => {
                tracing::warn!(
                    path = %self.store_path.display(),
                    error = %e,
                    "cannot read stored plan, using configured calorie goal"
                );
                self.daily_calorie_goal
            }
        }
    }
}
