use anyhow::Result;
use axum::async_trait;
use chrono::NaiveDate;
use diesel::{insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::meals::{InsertMealEntity, MealEntity},
        repositories::meals::MealRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::meals},
};

pub struct MealPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MealPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MealRepository for MealPostgres {
    async fn create(&self, meal: InsertMealEntity) -> Result<Option<MealEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(meals::table)
            .values(&meal)
            .on_conflict_do_nothing()
            .returning(MealEntity::as_returning())
            .get_result(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_id(&self, meal_id: Uuid) -> Result<Option<MealEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = meals::table
            .filter(meals::id.eq(meal_id))
            .select(MealEntity::as_select())
            .first::<MealEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_by_mess(
        &self,
        mess_id: Uuid,
        served_on: Option<NaiveDate>,
    ) -> Result<Vec<MealEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let mut query = meals::table
            .filter(meals::mess_id.eq(mess_id))
            .select(MealEntity::as_select())
            .into_boxed();

        if let Some(served_on) = served_on {
            query = query.filter(meals::served_on.eq(served_on));
        }

        let results = query
            .order((meals::served_on.desc(), meals::meal_type.asc()))
            .load::<MealEntity>(&mut conn)?;

        Ok(results)
    }
}
