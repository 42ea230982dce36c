use anyhow::Result;
use axum::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::meal_plans::{
    InsertMealPlanEntity, MealPlanEntity, UpdateMealPlanEntity,
};

#[automock]
#[async_trait]
pub trait MealPlanRepository {
    async fn create(&self, plan: InsertMealPlanEntity) -> Result<MealPlanEntity>;
    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<MealPlanEntity>>;
    async fn list_active_by_mess(&self, mess_id: Uuid) -> Result<Vec<MealPlanEntity>>;
    async fn update(&self, plan_id: Uuid, changes: UpdateMealPlanEntity) -> Result<MealPlanEntity>;
    async fn deactivate(&self, plan_id: Uuid) -> Result<()>;
}
