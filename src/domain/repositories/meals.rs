use anyhow::Result;
use axum::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::meals::{InsertMealEntity, MealEntity};

#[automock]
#[async_trait]
pub trait MealRepository {
    /// `None` when the mess already serves that meal type on that date.
    async fn create(&self, meal: InsertMealEntity) -> Result<Option<MealEntity>>;
    async fn find_by_id(&self, meal_id: Uuid) -> Result<Option<MealEntity>>;
    async fn list_by_mess(
        &self,
        mess_id: Uuid,
        served_on: Option<NaiveDate>,
    ) -> Result<Vec<MealEntity>>;
}
