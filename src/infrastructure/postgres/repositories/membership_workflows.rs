use anyhow::Result;
use axum::async_trait;
use chrono::Utc;
use diesel::{Connection, insert_into, prelude::*, update};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::{
    domain::{
        entities::{
            membership_payments::InsertMembershipPaymentEntity,
            memberships::{MembershipEntity, UpdateMembershipEntity},
            payment_verifications::InsertPaymentVerificationEntity,
            transactions::TransactionEntity,
        },
        repositories::membership_workflows::MembershipWorkflowRepository,
        value_objects::{
            approvals::{
                ApprovalOutcome, JoinApprovalCommand, MembershipWrite, PaymentApprovalCommand,
                PaymentApprovalResult, PaymentSubmissionCommand, PaymentSubmissionResult,
                RejectRequestCommand,
            },
            enums::{
                notification_statuses::NotificationStatus,
                payment_request_statuses::PaymentRequestStatus,
                verification_statuses::VerificationStatus,
            },
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::guards::{self, GuardFailure},
        schema::{membership_payments, notifications, payment_verifications, transactions},
    },
};

pub struct MembershipWorkflowPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MembershipWorkflowPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MembershipWorkflowRepository for MembershipWorkflowPostgres {
    async fn approve_join_request(
        &self,
        command: JoinApprovalCommand,
    ) -> Result<ApprovalOutcome<MembershipEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let result = conn.transaction::<MembershipEntity, anyhow::Error, _>(|tx| {
            guards::settle_request(
                tx,
                command.notification_id,
                NotificationStatus::Approved,
                command.acted_by,
                now,
            )?;

            let membership = guards::write_membership(tx, &command.membership, now)?;

            if let Some(charge) = &command.credit_charge {
                guards::charge_credits(tx, charge, membership.id, now)?;
            }

            insert_into(notifications::table)
                .values(&command.requester_notice)
                .execute(tx)?;

            Ok(membership)
        });

        guards::resolve(result)
    }

    async fn approve_payment_request(
        &self,
        command: PaymentApprovalCommand,
    ) -> Result<ApprovalOutcome<PaymentApprovalResult>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let result = conn.transaction::<PaymentApprovalResult, anyhow::Error, _>(|tx| {
            guards::settle_request(
                tx,
                command.notification_id,
                NotificationStatus::Approved,
                command.acted_by,
                now,
            )?;

            let membership = guards::write_membership(
                tx,
                &MembershipWrite::Update {
                    membership_id: command.membership_id,
                    expected_version: command.expected_version,
                    changes: command.changes.clone(),
                },
                now,
            )?;

            if let Some(charge) = &command.credit_charge {
                guards::charge_credits(tx, charge, membership.id, now)?;
            }

            let transaction = insert_into(transactions::table)
                .values(&command.transaction)
                .returning(TransactionEntity::as_returning())
                .get_result(tx)?;

            let record = &command.payment_record;
            insert_into(membership_payments::table)
                .values(&InsertMembershipPaymentEntity {
                    membership_id: membership.id,
                    amount_minor: record.amount_minor,
                    payment_method: record.payment_method.to_string(),
                    transaction_id: Some(transaction.id),
                    period_start: record.period_start,
                    period_end: record.period_end,
                    paid_at: record.paid_at,
                })
                .execute(tx)?;

            let verified = update(payment_verifications::table)
                .filter(payment_verifications::id.eq(command.verification_id))
                .filter(
                    payment_verifications::status.eq(VerificationStatus::Pending.to_string()),
                )
                .set((
                    payment_verifications::status.eq(VerificationStatus::Approved.to_string()),
                    payment_verifications::reviewed_by.eq(Some(command.acted_by)),
                    payment_verifications::reviewed_at.eq(Some(now)),
                    payment_verifications::updated_at.eq(now),
                ))
                .execute(tx)?;
            if verified == 0 {
                return Err(GuardFailure::AlreadyProcessed.into());
            }

            insert_into(notifications::table)
                .values(&command.requester_notice)
                .execute(tx)?;

            Ok(PaymentApprovalResult {
                membership,
                transaction,
            })
        });

        guards::resolve(result)
    }

    async fn reject_request(&self, command: RejectRequestCommand) -> Result<ApprovalOutcome<()>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let result = conn.transaction::<(), anyhow::Error, _>(|tx| {
            guards::settle_request(
                tx,
                command.notification_id,
                NotificationStatus::Rejected,
                command.acted_by,
                now,
            )?;

            if let Some(payment) = &command.payment {
                guards::write_membership(
                    tx,
                    &MembershipWrite::Update {
                        membership_id: payment.membership_id,
                        expected_version: payment.expected_version,
                        changes: UpdateMembershipEntity {
                            payment_request_status: Some(
                                PaymentRequestStatus::Rejected.to_string(),
                            ),
                            ..Default::default()
                        },
                    },
                    now,
                )?;

                update(payment_verifications::table)
                    .filter(payment_verifications::id.eq(payment.verification_id))
                    .filter(
                        payment_verifications::status
                            .eq(VerificationStatus::Pending.to_string()),
                    )
                    .set((
                        payment_verifications::status
                            .eq(VerificationStatus::Rejected.to_string()),
                        payment_verifications::reviewed_by.eq(Some(command.acted_by)),
                        payment_verifications::reviewed_at.eq(Some(now)),
                        payment_verifications::rejection_reason.eq(command.reason.clone()),
                        payment_verifications::updated_at.eq(now),
                    ))
                    .execute(tx)?;
            }

            insert_into(notifications::table)
                .values(&command.requester_notice)
                .execute(tx)?;

            Ok(())
        });

        guards::resolve(result)
    }

    async fn submit_payment_request(
        &self,
        command: PaymentSubmissionCommand,
    ) -> Result<ApprovalOutcome<PaymentSubmissionResult>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();
        let PaymentSubmissionCommand {
            membership,
            verification,
            mut owner_notice,
        } = command;

        let result = conn.transaction::<PaymentSubmissionResult, anyhow::Error, _>(|tx| {
            let membership = guards::write_membership(tx, &membership, now)?;

            let verification_id = insert_into(payment_verifications::table)
                .values(&InsertPaymentVerificationEntity {
                    membership_id: membership.id,
                    user_id: verification.user_id,
                    mess_id: verification.mess_id,
                    meal_plan_id: verification.meal_plan_id,
                    amount_minor: verification.amount_minor,
                    payment_method: verification.payment_method.to_string(),
                    screenshot_url: verification.screenshot_url.clone(),
                    status: VerificationStatus::Pending.to_string(),
                })
                .returning(payment_verifications::id)
                .get_result(tx)?;

            if let Value::Object(data) = &mut owner_notice.data {
                data.insert("membership_id".to_string(), json!(membership.id));
                data.insert("verification_id".to_string(), json!(verification_id));
            }
            let notification_id = insert_into(notifications::table)
                .values(&owner_notice)
                .returning(notifications::id)
                .get_result(tx)?;

            Ok(PaymentSubmissionResult {
                notification_id,
                membership_id: membership.id,
                verification_id,
            })
        });

        guards::resolve(result)
    }
}
