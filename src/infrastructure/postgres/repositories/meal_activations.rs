use anyhow::Result;
use axum::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::{insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::meal_activations::{InsertMealActivationEntity, MealActivationEntity},
        repositories::meal_activations::MealActivationRepository,
        value_objects::{
            enums::activation_statuses::ActivationStatus,
            meal_activations::{ActivationStamp, ListActivationsFilter},
        },
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::meal_activations},
};

pub struct MealActivationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MealActivationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MealActivationRepository for MealActivationPostgres {
    async fn find_by_code(&self, code: String) -> Result<Option<MealActivationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = meal_activations::table
            .filter(meal_activations::code.eq(code))
            .select(MealActivationEntity::as_select())
            .first::<MealActivationEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_for_user_meal(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        activation_date: NaiveDate,
    ) -> Result<Option<MealActivationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = meal_activations::table
            .filter(meal_activations::user_id.eq(user_id))
            .filter(meal_activations::meal_id.eq(meal_id))
            .filter(meal_activations::activation_date.eq(activation_date))
            .select(MealActivationEntity::as_select())
            .first::<MealActivationEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn create(
        &self,
        activation: InsertMealActivationEntity,
    ) -> Result<Option<MealActivationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(meal_activations::table)
            .values(&activation)
            .on_conflict_do_nothing()
            .returning(MealActivationEntity::as_returning())
            .get_result(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn activate(
        &self,
        activation_id: Uuid,
        stamp: ActivationStamp,
    ) -> Result<Option<MealActivationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(meal_activations::table)
            .filter(meal_activations::id.eq(activation_id))
            .filter(meal_activations::status.eq(ActivationStatus::Generated.to_string()))
            .filter(meal_activations::expires_at.ge(stamp.activated_at))
            .set((
                meal_activations::status.eq(ActivationStatus::Activated.to_string()),
                meal_activations::activated_at.eq(Some(stamp.activated_at)),
                meal_activations::activated_by.eq(Some(stamp.activated_by)),
                meal_activations::activation_method.eq(Some(stamp.method.to_string())),
            ))
            .returning(MealActivationEntity::as_returning())
            .get_result(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn expire(&self, activation_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(meal_activations::table)
            .filter(meal_activations::id.eq(activation_id))
            .filter(meal_activations::status.eq(ActivationStatus::Generated.to_string()))
            .set(meal_activations::status.eq(ActivationStatus::Expired.to_string()))
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(meal_activations::table)
            .filter(meal_activations::status.eq(ActivationStatus::Generated.to_string()))
            .filter(meal_activations::expires_at.lt(now))
            .set(meal_activations::status.eq(ActivationStatus::Expired.to_string()))
            .execute(&mut conn)?;

        Ok(updated)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        filter: ListActivationsFilter,
    ) -> Result<Vec<MealActivationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let mut query = meal_activations::table
            .filter(meal_activations::user_id.eq(user_id))
            .select(MealActivationEntity::as_select())
            .into_boxed();

        if let Some(from) = filter.from {
            query = query.filter(meal_activations::activation_date.ge(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(meal_activations::activation_date.le(to));
        }

        let results = query
            .order(meal_activations::created_at.desc())
            .load::<MealActivationEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_mess(
        &self,
        mess_id: Uuid,
        activation_date: Option<NaiveDate>,
    ) -> Result<Vec<MealActivationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let mut query = meal_activations::table
            .filter(meal_activations::mess_id.eq(mess_id))
            .select(MealActivationEntity::as_select())
            .into_boxed();

        if let Some(activation_date) = activation_date {
            query = query.filter(meal_activations::activation_date.eq(activation_date));
        }

        let results = query
            .order(meal_activations::created_at.desc())
            .load::<MealActivationEntity>(&mut conn)?;

        Ok(results)
    }
}
