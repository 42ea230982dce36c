use anyhow::Result;
use axum::async_trait;
use chrono::Utc;
use diesel::{Connection, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            credit_ledger::{CreditLedgerEntity, InsertCreditLedgerEntity},
            mess_credits::MessCreditsEntity,
        },
        repositories::mess_credits::MessCreditsRepository,
        value_objects::credits::GrantCreditsCommand,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{credit_ledger, mess_credits, transactions},
    },
};

pub struct MessCreditsPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MessCreditsPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MessCreditsRepository for MessCreditsPostgres {
    async fn find_by_mess_id(&self, mess_id: Uuid) -> Result<Option<MessCreditsEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = mess_credits::table
            .filter(mess_credits::mess_id.eq(mess_id))
            .select(MessCreditsEntity::as_select())
            .first::<MessCreditsEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn grant(&self, command: GrantCreditsCommand) -> Result<MessCreditsEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let credits = conn.transaction::<MessCreditsEntity, diesel::result::Error, _>(|tx| {
            let credits = update(mess_credits::table)
                .filter(mess_credits::mess_id.eq(command.mess_id))
                .set((
                    mess_credits::balance.eq(mess_credits::balance + command.amount),
                    mess_credits::version.eq(mess_credits::version + 1),
                    mess_credits::updated_at.eq(now),
                ))
                .returning(MessCreditsEntity::as_returning())
                .get_result(tx)?;

            insert_into(credit_ledger::table)
                .values(&InsertCreditLedgerEntity {
                    mess_id: command.mess_id,
                    delta: command.amount,
                    balance_after: credits.balance,
                    reason: command.reason.clone(),
                    reference_id: None,
                    created_by: Some(command.granted_by),
                })
                .execute(tx)?;

            insert_into(transactions::table)
                .values(&command.transaction)
                .execute(tx)?;

            Ok(credits)
        })?;

        Ok(credits)
    }

    async fn list_ledger(&self, mess_id: Uuid) -> Result<Vec<CreditLedgerEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = credit_ledger::table
            .filter(credit_ledger::mess_id.eq(mess_id))
            .order(credit_ledger::created_at.desc())
            .select(CreditLedgerEntity::as_select())
            .load::<CreditLedgerEntity>(&mut conn)?;

        Ok(results)
    }
}
