use anyhow::Result;
use axum::async_trait;
use diesel::{Connection, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            chat_groups::InsertChatGroupEntity,
            mess_credits::InsertMessCreditsEntity,
            messes::{InsertMessEntity, MessEntity},
        },
        repositories::messes::MessRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{chat_groups, mess_credits, messes},
    },
};

pub struct MessPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MessPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MessRepository for MessPostgres {
    async fn register(
        &self,
        mess: InsertMessEntity,
        initial_balance: i32,
        member_cost: i32,
    ) -> Result<MessEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let created = conn.transaction::<MessEntity, diesel::result::Error, _>(|tx| {
            let created = insert_into(messes::table)
                .values(&mess)
                .returning(MessEntity::as_returning())
                .get_result(tx)?;

            insert_into(mess_credits::table)
                .values(&InsertMessCreditsEntity {
                    mess_id: created.id,
                    balance: initial_balance,
                    member_cost,
                })
                .execute(tx)?;

            // Members land here on admission.
            insert_into(chat_groups::table)
                .values(&InsertChatGroupEntity {
                    mess_id: created.id,
                    name: format!("{} members", created.name),
                    is_default: true,
                })
                .execute(tx)?;

            Ok(created)
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, mess_id: Uuid) -> Result<Option<MessEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = messes::table
            .filter(messes::id.eq(mess_id))
            .select(MessEntity::as_select())
            .first::<MessEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_active(&self) -> Result<Vec<MessEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = messes::table
            .filter(messes::is_active.eq(true))
            .order(messes::name.asc())
            .select(MessEntity::as_select())
            .load::<MessEntity>(&mut conn)?;

        Ok(results)
    }
}
