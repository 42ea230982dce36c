use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::meals::MealEntity, value_objects::enums::meal_types::MealType,
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMealModel {
    pub meal_type: MealType,
    pub name: String,
    pub served_on: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMealsFilter {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MealDto {
    pub id: Uuid,
    pub mess_id: Uuid,
    pub meal_type: Option<MealType>,
    pub name: String,
    pub served_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<MealEntity> for MealDto {
    fn from(value: MealEntity) -> Self {
        Self {
            id: value.id,
            mess_id: value.mess_id,
            meal_type: MealType::from_str(&value.meal_type),
            name: value.name,
            served_on: value.served_on,
            created_at: value.created_at,
        }
    }
}
