use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::meals;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = meals)]
pub struct MealEntity {
    pub id: Uuid,
    pub mess_id: Uuid,
    pub meal_type: String,
    pub name: String,
    pub served_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = meals)]
pub struct InsertMealEntity {
    pub mess_id: Uuid,
    pub meal_type: String,
    pub name: String,
    pub served_on: NaiveDate,
}
