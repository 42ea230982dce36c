use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::meal_activations;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = meal_activations)]
pub struct MealActivationEntity {
    pub id: Uuid,
    pub code: String,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub meal_id: Uuid,
    pub membership_id: Uuid,
    pub activation_date: NaiveDate,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub activated_at: Option<DateTime<Utc>>,
    pub activated_by: Option<Uuid>,
    pub activation_method: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = meal_activations)]
pub struct InsertMealActivationEntity {
    pub code: String,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub meal_id: Uuid,
    pub membership_id: Uuid,
    pub activation_date: NaiveDate,
    pub status: String,
    pub expires_at: DateTime<Utc>,
}
