use anyhow::Result;
use axum::async_trait;
use chrono::{DateTime, Utc};
use diesel::{Connection, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            membership_payments::MembershipPaymentEntity, memberships::MembershipEntity,
            notifications::InsertNotificationEntity,
        },
        repositories::memberships::MembershipRepository,
        value_objects::enums::{
            membership_statuses::MembershipStatus, payment_statuses::PaymentStatus,
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{membership_payments, memberships, notifications},
    },
};

pub struct MembershipPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MembershipPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MembershipRepository for MembershipPostgres {
    async fn find_by_id(&self, membership_id: Uuid) -> Result<Option<MembershipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = memberships::table
            .filter(memberships::id.eq(membership_id))
            .select(MembershipEntity::as_select())
            .first::<MembershipEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_user_and_mess(
        &self,
        user_id: Uuid,
        mess_id: Uuid,
    ) -> Result<Option<MembershipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = memberships::table
            .filter(memberships::user_id.eq(user_id))
            .filter(memberships::mess_id.eq(mess_id))
            .select(MembershipEntity::as_select())
            .first::<MembershipEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<MembershipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = memberships::table
            .filter(memberships::user_id.eq(user_id))
            .order(memberships::created_at.desc())
            .select(MembershipEntity::as_select())
            .load::<MembershipEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_mess(&self, mess_id: Uuid) -> Result<Vec<MembershipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = memberships::table
            .filter(memberships::mess_id.eq(mess_id))
            .order(memberships::created_at.desc())
            .select(MembershipEntity::as_select())
            .load::<MembershipEntity>(&mut conn)?;

        Ok(results)
    }

    async fn cancel(
        &self,
        membership_id: Uuid,
        expected_version: i32,
    ) -> Result<Option<MembershipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(memberships::table)
            .filter(memberships::id.eq(membership_id))
            .filter(memberships::version.eq(expected_version))
            .set((
                memberships::status.eq(MembershipStatus::Inactive.to_string()),
                memberships::version.eq(memberships::version + 1),
                memberships::updated_at.eq(Utc::now()),
            ))
            .returning(MembershipEntity::as_returning())
            .get_result(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_payments(&self, membership_id: Uuid) -> Result<Vec<MembershipPaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = membership_payments::table
            .filter(membership_payments::membership_id.eq(membership_id))
            .order(membership_payments::paid_at.desc())
            .select(MembershipPaymentEntity::as_select())
            .load::<MembershipPaymentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_lapsed_paid(&self, now: DateTime<Utc>) -> Result<Vec<MembershipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = memberships::table
            .filter(memberships::status.eq(MembershipStatus::Active.to_string()))
            .filter(memberships::payment_status.eq(PaymentStatus::Paid.to_string()))
            .filter(memberships::subscription_end.lt(now))
            .select(MembershipEntity::as_select())
            .load::<MembershipEntity>(&mut conn)?;

        Ok(results)
    }

    async fn mark_overdue(
        &self,
        membership_id: Uuid,
        expected_version: i32,
        reminder: InsertNotificationEntity,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let flagged = conn.transaction::<bool, diesel::result::Error, _>(|tx| {
            let updated = update(memberships::table)
                .filter(memberships::id.eq(membership_id))
                .filter(memberships::version.eq(expected_version))
                .filter(memberships::payment_status.eq(PaymentStatus::Paid.to_string()))
                .set((
                    memberships::payment_status.eq(PaymentStatus::Overdue.to_string()),
                    memberships::version.eq(memberships::version + 1),
                    memberships::updated_at.eq(now),
                ))
                .execute(tx)?;

            if updated == 0 {
                return Ok(false);
            }

            insert_into(notifications::table)
                .values(&reminder)
                .execute(tx)?;

            Ok(true)
        })?;

        Ok(flagged)
    }
}
