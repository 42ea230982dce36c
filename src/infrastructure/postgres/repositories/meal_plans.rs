use anyhow::Result;
use axum::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::meal_plans::{InsertMealPlanEntity, MealPlanEntity, UpdateMealPlanEntity},
        repositories::meal_plans::MealPlanRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::meal_plans},
};

pub struct MealPlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MealPlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MealPlanRepository for MealPlanPostgres {
    async fn create(&self, plan: InsertMealPlanEntity) -> Result<MealPlanEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(meal_plans::table)
            .values(&plan)
            .returning(MealPlanEntity::as_returning())
            .get_result(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<MealPlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = meal_plans::table
            .filter(meal_plans::id.eq(plan_id))
            .select(MealPlanEntity::as_select())
            .first::<MealPlanEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_active_by_mess(&self, mess_id: Uuid) -> Result<Vec<MealPlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = meal_plans::table
            .filter(meal_plans::mess_id.eq(mess_id))
            .filter(meal_plans::is_active.eq(true))
            .order(meal_plans::price_minor.asc())
            .select(MealPlanEntity::as_select())
            .load::<MealPlanEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(&self, plan_id: Uuid, changes: UpdateMealPlanEntity) -> Result<MealPlanEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(meal_plans::table)
            .filter(meal_plans::id.eq(plan_id))
            .set((&changes, meal_plans::updated_at.eq(Utc::now())))
            .returning(MealPlanEntity::as_returning())
            .get_result(&mut conn)?;

        Ok(result)
    }

    async fn deactivate(&self, plan_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(meal_plans::table)
            .filter(meal_plans::id.eq(plan_id))
            .set((
                meal_plans::is_active.eq(false),
                meal_plans::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
