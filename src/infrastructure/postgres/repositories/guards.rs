use anyhow::Result;
use chrono::{DateTime, Utc};
use diesel::{
    PgConnection,
    insert_into,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
    update,
};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            credit_ledger::InsertCreditLedgerEntity, memberships::MembershipEntity,
            notifications::NotificationEntity,
        },
        value_objects::{
            approvals::{ApprovalOutcome, MembershipWrite},
            credits::{CreditCharge, REASON_MEMBER_ADMISSION},
            enums::notification_statuses::NotificationStatus,
        },
    },
    infrastructure::postgres::schema::{credit_ledger, mess_credits, memberships, notifications},
};

/// Raised inside a transaction to roll it back and report a lost race.
#[derive(Debug, Clone, Copy, Error)]
pub enum GuardFailure {
    #[error("request already processed")]
    AlreadyProcessed,
    #[error("membership changed concurrently")]
    StaleMembership,
    #[error("credit balance changed concurrently")]
    CreditsChanged,
}

impl GuardFailure {
    fn into_outcome<T>(self) -> ApprovalOutcome<T> {
        match self {
            GuardFailure::AlreadyProcessed => ApprovalOutcome::AlreadyProcessed,
            GuardFailure::StaleMembership => ApprovalOutcome::StaleMembership,
            GuardFailure::CreditsChanged => ApprovalOutcome::CreditsChanged,
        }
    }
}

/// Maps the result of a guarded transaction onto an outcome.
pub fn resolve<T>(result: Result<T>) -> Result<ApprovalOutcome<T>> {
    match result {
        Ok(value) => Ok(ApprovalOutcome::Applied(value)),
        Err(err) => match err.downcast::<GuardFailure>() {
            Ok(guard) => Ok(guard.into_outcome()),
            Err(err) => Err(err),
        },
    }
}

/// Moves a pending request notification to its final status.
pub fn settle_request(
    tx: &mut PgConnection,
    notification_id: Uuid,
    status: NotificationStatus,
    acted_by: Uuid,
    now: DateTime<Utc>,
) -> Result<NotificationEntity> {
    let settled = update(notifications::table)
        .filter(notifications::id.eq(notification_id))
        .filter(notifications::status.eq(NotificationStatus::Pending.to_string()))
        .set((
            notifications::status.eq(status.to_string()),
            notifications::acted_by.eq(Some(acted_by)),
            notifications::acted_at.eq(Some(now)),
            notifications::is_read.eq(true),
            notifications::updated_at.eq(now),
        ))
        .returning(NotificationEntity::as_returning())
        .get_result(tx)
        .optional()?;

    settled.ok_or_else(|| GuardFailure::AlreadyProcessed.into())
}

pub fn write_membership(
    tx: &mut PgConnection,
    write: &MembershipWrite,
    now: DateTime<Utc>,
) -> Result<MembershipEntity> {
    match write {
        MembershipWrite::Insert(membership) => {
            match insert_into(memberships::table)
                .values(membership)
                .returning(MembershipEntity::as_returning())
                .get_result(tx)
            {
                Ok(created) => Ok(created),
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    Err(GuardFailure::StaleMembership.into())
                }
                Err(err) => Err(err.into()),
            }
        }
        MembershipWrite::Update {
            membership_id,
            expected_version,
            changes,
        } => {
            let updated = update(memberships::table)
                .filter(memberships::id.eq(*membership_id))
                .filter(memberships::version.eq(*expected_version))
                .set((
                    changes,
                    memberships::version.eq(memberships::version + 1),
                    memberships::updated_at.eq(now),
                ))
                .returning(MembershipEntity::as_returning())
                .get_result(tx)
                .optional()?;

            updated.ok_or_else(|| GuardFailure::StaleMembership.into())
        }
    }
}

/// Deducts the admission cost and appends the matching ledger row.
pub fn charge_credits(
    tx: &mut PgConnection,
    charge: &CreditCharge,
    membership_id: Uuid,
    now: DateTime<Utc>,
) -> Result<()> {
    let balance_after = update(mess_credits::table)
        .filter(mess_credits::mess_id.eq(charge.mess_id))
        .filter(mess_credits::version.eq(charge.expected_version))
        .filter(mess_credits::balance.ge(charge.amount))
        .set((
            mess_credits::balance.eq(mess_credits::balance - charge.amount),
            mess_credits::version.eq(mess_credits::version + 1),
            mess_credits::updated_at.eq(now),
        ))
        .returning(mess_credits::balance)
        .get_result::<i32>(tx)
        .optional()?
        .ok_or(GuardFailure::CreditsChanged)?;

    insert_into(credit_ledger::table)
        .values(&InsertCreditLedgerEntity {
            mess_id: charge.mess_id,
            delta: -charge.amount,
            balance_after,
            reason: REASON_MEMBER_ADMISSION.to_string(),
            reference_id: Some(membership_id),
            created_by: Some(charge.charged_by),
        })
        .execute(tx)?;

    Ok(())
}
