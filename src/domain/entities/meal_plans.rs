use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::meal_plans;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = meal_plans)]
pub struct MealPlanEntity {
    pub id: Uuid,
    pub mess_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i32,
    pub duration_days: i32,
    pub meals_per_day: i32,
    pub leave_days_allowed: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = meal_plans)]
pub struct InsertMealPlanEntity {
    pub mess_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i32,
    pub duration_days: i32,
    pub meals_per_day: i32,
    pub leave_days_allowed: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = meal_plans)]
pub struct UpdateMealPlanEntity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_minor: Option<i32>,
    pub duration_days: Option<i32>,
    pub meals_per_day: Option<i32>,
    pub leave_days_allowed: Option<i32>,
}
