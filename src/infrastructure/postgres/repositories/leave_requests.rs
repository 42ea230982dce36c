use anyhow::Result;
use axum::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::{Connection, dsl::count_star, insert_into, prelude::*, update};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::leave_requests::LeaveRequestEntity,
        repositories::leave_requests::LeaveRequestRepository,
        value_objects::{
            approvals::{
                ApprovalOutcome, LeaveApprovalCommand, LeaveRejectionCommand,
                LeaveSubmissionCommand, MembershipWrite,
            },
            enums::{
                leave_statuses::LeaveStatus, notification_statuses::NotificationStatus,
                notification_types::NotificationType,
            },
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::guards::{self, GuardFailure},
        schema::{leave_requests, notifications},
    },
};

pub struct LeaveRequestPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl LeaveRequestPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// Final status of the owner's `leave_request` notification for a leave.
fn settle_owner_notice(
    tx: &mut PgConnection,
    leave_id: Uuid,
    status: NotificationStatus,
    acted_by: Uuid,
) -> QueryResult<usize> {
    let now = Utc::now();

    update(notifications::table)
        .filter(notifications::notification_type.eq(NotificationType::LeaveRequest.to_string()))
        .filter(notifications::status.eq(NotificationStatus::Pending.to_string()))
        .filter(notifications::data.contains(json!({ "leave_request_id": leave_id })))
        .set((
            notifications::status.eq(status.to_string()),
            notifications::acted_by.eq(Some(acted_by)),
            notifications::acted_at.eq(Some(now)),
            notifications::updated_at.eq(now),
        ))
        .execute(tx)
}

fn review_leave(
    tx: &mut PgConnection,
    leave_id: Uuid,
    status: LeaveStatus,
    reviewed_by: Uuid,
    reason: Option<String>,
) -> Result<LeaveRequestEntity> {
    let reviewed = update(leave_requests::table)
        .filter(leave_requests::id.eq(leave_id))
        .filter(leave_requests::status.eq(LeaveStatus::Pending.to_string()))
        .set((
            leave_requests::status.eq(status.to_string()),
            leave_requests::reviewed_by.eq(Some(reviewed_by)),
            leave_requests::reviewed_at.eq(Some(Utc::now())),
            leave_requests::rejection_reason.eq(reason),
        ))
        .returning(LeaveRequestEntity::as_returning())
        .get_result(tx)
        .optional()?;

    reviewed.ok_or_else(|| GuardFailure::AlreadyProcessed.into())
}

#[async_trait]
impl LeaveRequestRepository for LeaveRequestPostgres {
    async fn submit(&self, command: LeaveSubmissionCommand) -> Result<LeaveRequestEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let LeaveSubmissionCommand {
            leave,
            mut owner_notice,
        } = command;

        let created = conn.transaction::<LeaveRequestEntity, diesel::result::Error, _>(|tx| {
            let created = insert_into(leave_requests::table)
                .values(&leave)
                .returning(LeaveRequestEntity::as_returning())
                .get_result(tx)?;

            if let Value::Object(data) = &mut owner_notice.data {
                data.insert("leave_request_id".to_string(), json!(created.id));
            }
            insert_into(notifications::table)
                .values(&owner_notice)
                .execute(tx)?;

            Ok(created)
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, leave_id: Uuid) -> Result<Option<LeaveRequestEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = leave_requests::table
            .filter(leave_requests::id.eq(leave_id))
            .select(LeaveRequestEntity::as_select())
            .first::<LeaveRequestEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_by_membership(&self, membership_id: Uuid) -> Result<Vec<LeaveRequestEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = leave_requests::table
            .filter(leave_requests::membership_id.eq(membership_id))
            .order(leave_requests::start_date.desc())
            .select(LeaveRequestEntity::as_select())
            .load::<LeaveRequestEntity>(&mut conn)?;

        Ok(results)
    }

    async fn has_overlapping(
        &self,
        membership_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let blocking = vec![
            LeaveStatus::Pending.to_string(),
            LeaveStatus::Approved.to_string(),
        ];

        let total = leave_requests::table
            .filter(leave_requests::membership_id.eq(membership_id))
            .filter(leave_requests::status.eq_any(blocking))
            .filter(leave_requests::start_date.le(end))
            .filter(leave_requests::end_date.ge(start))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(total > 0)
    }

    async fn has_approved_leave_on(&self, membership_id: Uuid, date: NaiveDate) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = leave_requests::table
            .filter(leave_requests::membership_id.eq(membership_id))
            .filter(leave_requests::status.eq(LeaveStatus::Approved.to_string()))
            .filter(leave_requests::start_date.le(date))
            .filter(leave_requests::end_date.ge(date))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(total > 0)
    }

    async fn approve(
        &self,
        command: LeaveApprovalCommand,
    ) -> Result<ApprovalOutcome<LeaveRequestEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let result = conn.transaction::<LeaveRequestEntity, anyhow::Error, _>(|tx| {
            let leave = review_leave(
                tx,
                command.leave_id,
                LeaveStatus::Approved,
                command.reviewed_by,
                None,
            )?;

            guards::write_membership(
                tx,
                &MembershipWrite::Update {
                    membership_id: command.membership_id,
                    expected_version: command.expected_version,
                    changes: command.changes.clone(),
                },
                now,
            )?;

            settle_owner_notice(tx, leave.id, NotificationStatus::Approved, command.reviewed_by)?;

            insert_into(notifications::table)
                .values(&command.member_notice)
                .execute(tx)?;

            Ok(leave)
        });

        guards::resolve(result)
    }

    async fn reject(
        &self,
        command: LeaveRejectionCommand,
    ) -> Result<ApprovalOutcome<LeaveRequestEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<LeaveRequestEntity, anyhow::Error, _>(|tx| {
            let leave = review_leave(
                tx,
                command.leave_id,
                LeaveStatus::Rejected,
                command.reviewed_by,
                command.reason.clone(),
            )?;

            settle_owner_notice(tx, leave.id, NotificationStatus::Rejected, command.reviewed_by)?;

            insert_into(notifications::table)
                .values(&command.member_notice)
                .execute(tx)?;

            Ok(leave)
        });

        guards::resolve(result)
    }
}
