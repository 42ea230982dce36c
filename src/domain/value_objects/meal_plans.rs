use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::meal_plans::MealPlanEntity;

pub const MAX_PLAN_DURATION_DAYS: i32 = 365;
pub const MAX_MEALS_PER_DAY: i32 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMealPlanModel {
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i32,
    pub duration_days: i32,
    pub meals_per_day: i32,
    #[serde(default)]
    pub leave_days_allowed: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMealPlanModel {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_minor: Option<i32>,
    pub duration_days: Option<i32>,
    pub meals_per_day: Option<i32>,
    pub leave_days_allowed: Option<i32>,
}

/// Terms every plan must satisfy after create or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTerms {
    pub price_minor: i32,
    pub duration_days: i32,
    pub meals_per_day: i32,
    pub leave_days_allowed: i32,
}

impl PlanTerms {
    pub fn validate(&self) -> Result<(), String> {
        if self.price_minor < 0 {
            return Err("price must not be negative".to_string());
        }
        if !(1..=MAX_PLAN_DURATION_DAYS).contains(&self.duration_days) {
            return Err(format!(
                "duration_days must be between 1 and {}",
                MAX_PLAN_DURATION_DAYS
            ));
        }
        if !(1..=MAX_MEALS_PER_DAY).contains(&self.meals_per_day) {
            return Err(format!(
                "meals_per_day must be between 1 and {}",
                MAX_MEALS_PER_DAY
            ));
        }
        if self.leave_days_allowed < 0 || self.leave_days_allowed >= self.duration_days {
            return Err("leave_days_allowed must be within the plan duration".to_string());
        }
        Ok(())
    }

    pub fn from_entity(plan: &MealPlanEntity) -> Self {
        Self {
            price_minor: plan.price_minor,
            duration_days: plan.duration_days,
            meals_per_day: plan.meals_per_day,
            leave_days_allowed: plan.leave_days_allowed,
        }
    }

    pub fn apply(self, update: &UpdateMealPlanModel) -> Self {
        Self {
            price_minor: update.price_minor.unwrap_or(self.price_minor),
            duration_days: update.duration_days.unwrap_or(self.duration_days),
            meals_per_day: update.meals_per_day.unwrap_or(self.meals_per_day),
            leave_days_allowed: update.leave_days_allowed.unwrap_or(self.leave_days_allowed),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MealPlanDto {
    pub id: Uuid,
    pub mess_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i32,
    pub duration_days: i32,
    pub meals_per_day: i32,
    pub leave_days_allowed: i32,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<MealPlanEntity> for MealPlanDto {
    fn from(value: MealPlanEntity) -> Self {
        Self {
            id: value.id,
            mess_id: value.mess_id,
            name: value.name,
            description: value.description,
            price_minor: value.price_minor,
            duration_days: value.duration_days,
            meals_per_day: value.meals_per_day,
            leave_days_allowed: value.leave_days_allowed,
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly() -> PlanTerms {
        PlanTerms {
            price_minor: 300_000,
            duration_days: 30,
            meals_per_day: 2,
            leave_days_allowed: 4,
        }
    }

    #[test]
    fn accepts_reasonable_plan() {
        assert!(monthly().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_terms() {
        let mut terms = monthly();
        terms.meals_per_day = 4;
        assert!(terms.validate().is_err());

        let mut terms = monthly();
        terms.duration_days = 0;
        assert!(terms.validate().is_err());

        let mut terms = monthly();
        terms.leave_days_allowed = 30;
        assert!(terms.validate().is_err());

        let mut terms = monthly();
        terms.price_minor = -1;
        assert!(terms.validate().is_err());
    }

    #[test]
    fn update_keeps_untouched_terms() {
        let updated = monthly().apply(&UpdateMealPlanModel {
            duration_days: Some(15),
            ..Default::default()
        });

        assert_eq!(updated.duration_days, 15);
        assert_eq!(updated.price_minor, 300_000);
        assert_eq!(updated.leave_days_allowed, 4);
    }
}
