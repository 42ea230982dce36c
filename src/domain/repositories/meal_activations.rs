use anyhow::Result;
use axum::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::meal_activations::{InsertMealActivationEntity, MealActivationEntity},
    value_objects::meal_activations::{ActivationStamp, ListActivationsFilter},
};

#[automock]
#[async_trait]
pub trait MealActivationRepository {
    async fn find_by_code(&self, code: String) -> Result<Option<MealActivationEntity>>;
    async fn find_for_user_meal(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        activation_date: NaiveDate,
    ) -> Result<Option<MealActivationEntity>>;
    /// `None` when a code for the same user, meal and date already exists.
    async fn create(
        &self,
        activation: InsertMealActivationEntity,
    ) -> Result<Option<MealActivationEntity>>;
    /// Moves `generated -> activated`; `None` if the row left `generated` first.
    async fn activate(
        &self,
        activation_id: Uuid,
        stamp: ActivationStamp,
    ) -> Result<Option<MealActivationEntity>>;
    async fn expire(&self, activation_id: Uuid) -> Result<bool>;
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<usize>;
    async fn list_by_user(
        &self,
        user_id: Uuid,
        filter: ListActivationsFilter,
    ) -> Result<Vec<MealActivationEntity>>;
    async fn list_by_mess(
        &self,
        mess_id: Uuid,
        activation_date: Option<NaiveDate>,
    ) -> Result<Vec<MealActivationEntity>>;
}
