use anyhow::Result;
use axum::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::transactions::TransactionEntity,
        repositories::transactions::TransactionRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::transactions},
};

pub struct TransactionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TransactionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TransactionRepository for TransactionPostgres {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<TransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .order(transactions::created_at.desc())
            .select(TransactionEntity::as_select())
            .load::<TransactionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_mess(&self, mess_id: Uuid) -> Result<Vec<TransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = transactions::table
            .filter(transactions::mess_id.eq(mess_id))
            .order(transactions::created_at.desc())
            .select(TransactionEntity::as_select())
            .load::<TransactionEntity>(&mut conn)?;

        Ok(results)
    }
}
