use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::{
        mess_access,
        request_reviews::{self, ReviewError},
    },
    domain::{
        entities::{
            memberships::{InsertMembershipEntity, UpdateMembershipEntity},
            transactions::InsertTransactionEntity,
        },
        repositories::{
            meal_plans::MealPlanRepository, membership_workflows::MembershipWorkflowRepository,
            memberships::MembershipRepository, mess_credits::MessCreditsRepository,
            messes::MessRepository, notifications::NotificationRepository,
        },
        value_objects::{
            actors::Actor,
            approvals::{
                ApprovalOutcome, MembershipWrite, PaymentApprovalCommand, PaymentRecord, PaymentRejection,
                PaymentSubmissionCommand, PaymentVerificationDraft, RejectRequestCommand,
            },
            enums::{
                membership_statuses::MembershipStatus, notification_types::NotificationType,
                payment_request_statuses::PaymentRequestStatus, payment_statuses::PaymentStatus,
                transaction_statuses::TransactionStatus, transaction_types::TransactionType,
            },
            memberships::{self, MembershipDto, payment_period},
            notifications::{self, PaymentRequestData},
            payment_requests::{
                PaymentApprovalDto, PaymentRequestReceiptDto, SubmitPaymentRequestModel,
            },
            transactions::{TransactionDto, generate_transaction_id},
        },
    },
};

pub type UseCaseResult<T> = std::result::Result<T, ReviewError>;

pub struct PaymentRequestUseCase<M, P, Ms, N, C, W>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
    C: MessCreditsRepository + Send + Sync + 'static,
    W: MembershipWorkflowRepository + Send + Sync + 'static,
{
    mess_repository: Arc<M>,
    meal_plan_repository: Arc<P>,
    membership_repository: Arc<Ms>,
    notification_repository: Arc<N>,
    credits_repository: Arc<C>,
    workflow_repository: Arc<W>,
}

impl<M, P, Ms, N, C, W> PaymentRequestUseCase<M, P, Ms, N, C, W>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
    C: MessCreditsRepository + Send + Sync + 'static,
    W: MembershipWorkflowRepository + Send + Sync + 'static,
{
    pub fn new(
        mess_repository: Arc<M>,
        meal_plan_repository: Arc<P>,
        membership_repository: Arc<Ms>,
        notification_repository: Arc<N>,
        credits_repository: Arc<C>,
        workflow_repository: Arc<W>,
    ) -> Self {
        Self {
            mess_repository,
            meal_plan_repository,
            membership_repository,
            notification_repository,
            credits_repository,
            workflow_repository,
        }
    }

    pub async fn submit_payment_request(
        &self,
        actor: Actor,
        model: SubmitPaymentRequestModel,
    ) -> UseCaseResult<PaymentRequestReceiptDto> {
        let user_id = actor.user_id;
        let mess_id = model.mess_id;
        info!(
            %user_id,
            %mess_id,
            meal_plan_id = %model.meal_plan_id,
            amount_minor = model.amount_minor,
            "payment_requests: submit requested"
        );

        let mess = mess_access::load_mess(self.mess_repository.as_ref(), mess_id).await?;
        if !mess.is_active {
            return Err(ReviewError::MessNotFound);
        }
        let plan = request_reviews::load_offered_plan(
            self.meal_plan_repository.as_ref(),
            model.meal_plan_id,
            mess.id,
        )
        .await?;

        if model.amount_minor != plan.price_minor {
            let err = ReviewError::AmountMismatch {
                expected: plan.price_minor,
                got: model.amount_minor,
            };
            warn!(%user_id, %mess_id, status = err.status_code().as_u16(), "payment_requests: amount mismatch");
            return Err(err);
        }

        let existing = self
            .membership_repository
            .find_by_user_and_mess(user_id, mess_id)
            .await
            .map_err(|err| {
                error!(%user_id, %mess_id, db_error = ?err, "payment_requests: failed to load membership");
                ReviewError::Internal(err)
            })?;
        if existing.as_ref().is_some_and(memberships::has_pending_payment_request) {
            let err = ReviewError::DuplicateRequest;
            warn!(%user_id, %mess_id, status = err.status_code().as_u16(), "payment_requests: request already pending");
            return Err(err);
        }

        let membership = match &existing {
            None => MembershipWrite::Insert(InsertMembershipEntity {
                user_id,
                mess_id,
                meal_plan_id: plan.id,
                status: MembershipStatus::Pending.to_string(),
                payment_status: PaymentStatus::Pending.to_string(),
                payment_request_status: PaymentRequestStatus::Pending.to_string(),
                subscription_start: None,
                subscription_end: None,
                leave_days_used: 0,
                credits_charged: false,
            }),
            Some(current) => MembershipWrite::Update {
                membership_id: current.id,
                expected_version: current.version,
                changes: UpdateMembershipEntity {
                    meal_plan_id: Some(plan.id),
                    payment_request_status: Some(PaymentRequestStatus::Pending.to_string()),
                    ..Default::default()
                },
            },
        };

        let data = PaymentRequestData {
            requester_id: user_id,
            membership_id: None,
            verification_id: None,
            meal_plan_id: plan.id,
            amount_minor: model.amount_minor,
            payment_method: model.payment_method,
        };
        let command = PaymentSubmissionCommand {
            membership,
            verification: PaymentVerificationDraft {
                user_id,
                mess_id,
                meal_plan_id: plan.id,
                amount_minor: model.amount_minor,
                payment_method: model.payment_method,
                screenshot_url: model.screenshot_url.filter(|url| !url.trim().is_empty()),
            },
            owner_notice: notifications::request_for_owner(
                mess.owner_id,
                mess.id,
                NotificationType::PaymentRequest,
                "New payment request",
                format!(
                    "A member paid {} via {} for the {} plan",
                    model.amount_minor, model.payment_method, plan.name
                ),
                json!(data),
            ),
        };

        let outcome = self
            .workflow_repository
            .submit_payment_request(command)
            .await
            .map_err(|err| {
                error!(%user_id, %mess_id, db_error = ?err, "payment_requests: submission transaction failed");
                ReviewError::Internal(err)
            })?;
        let submitted = match outcome {
            ApprovalOutcome::Applied(result) => result,
            _ => {
                let err = ReviewError::ConcurrentUpdate;
                warn!(%user_id, %mess_id, status = err.status_code().as_u16(), "payment_requests: membership changed during submission");
                return Err(err);
            }
        };

        info!(
            %user_id,
            %mess_id,
            notification_id = %submitted.notification_id,
            membership_id = %submitted.membership_id,
            verification_id = %submitted.verification_id,
            "payment_requests: request submitted"
        );
        Ok(PaymentRequestReceiptDto {
            notification_id: submitted.notification_id,
            membership_id: submitted.membership_id,
            verification_id: submitted.verification_id,
        })
    }

    pub async fn approve_payment_request(
        &self,
        actor: Actor,
        notification_id: Uuid,
    ) -> UseCaseResult<PaymentApprovalDto> {
        let acted_by = actor.user_id;
        info!(%acted_by, %notification_id, "payment_requests: approval requested");

        let request = request_reviews::load_pending_request(
            self.notification_repository.as_ref(),
            self.mess_repository.as_ref(),
            &actor,
            notification_id,
            NotificationType::PaymentRequest,
        )
        .await?;
        let mess = request.mess;
        let data: PaymentRequestData =
            notifications::decode_data(&request.notification).ok_or(ReviewError::MalformedRequest)?;
        let (Some(membership_id), Some(verification_id)) = (data.membership_id, data.verification_id)
        else {
            return Err(ReviewError::MalformedRequest);
        };

        let membership = self
            .membership_repository
            .find_by_id(membership_id)
            .await
            .map_err(|err| {
                error!(%membership_id, db_error = ?err, "payment_requests: failed to load membership");
                ReviewError::Internal(err)
            })?
            .filter(|membership| membership.mess_id == mess.id)
            .ok_or(ReviewError::MembershipNotFound)?;

        if !memberships::has_pending_payment_request(&membership) {
            let err = ReviewError::NoPendingPayment;
            warn!(
                %membership_id,
                payment_request_status = %membership.payment_request_status,
                status = err.status_code().as_u16(),
                "payment_requests: membership has no pending payment"
            );
            return Err(err);
        }

        let plan = self
            .meal_plan_repository
            .find_by_id(data.meal_plan_id)
            .await
            .map_err(|err| {
                error!(meal_plan_id = %data.meal_plan_id, db_error = ?err, "payment_requests: failed to load meal plan");
                ReviewError::Internal(err)
            })?
            .filter(|plan| plan.mess_id == mess.id)
            .ok_or(ReviewError::PlanUnavailable)?;

        let credit_charge = if membership.credits_charged {
            None
        } else {
            request_reviews::prepare_admission_charge(
                self.credits_repository.as_ref(),
                mess.id,
                acted_by,
            )
            .await?
        };

        let now = Utc::now();
        let (period_start, period_end) = payment_period(&membership, now, plan.duration_days);
        let restarts = period_start == now;

        let changes = UpdateMembershipEntity {
            meal_plan_id: Some(plan.id),
            status: Some(MembershipStatus::Active.to_string()),
            payment_status: Some(PaymentStatus::Paid.to_string()),
            payment_request_status: Some(PaymentRequestStatus::Approved.to_string()),
            subscription_start: restarts.then_some(period_start),
            subscription_end: Some(period_end),
            leave_days_used: restarts.then_some(0),
            credits_charged: Some(true),
        };

        let command = PaymentApprovalCommand {
            notification_id,
            acted_by,
            membership_id,
            expected_version: membership.version,
            changes,
            credit_charge,
            verification_id,
            transaction: InsertTransactionEntity {
                transaction_id: generate_transaction_id(now),
                user_id: membership.user_id,
                mess_id: mess.id,
                membership_id: Some(membership_id),
                transaction_type: TransactionType::SubscriptionPayment.to_string(),
                amount_minor: data.amount_minor,
                status: TransactionStatus::Success.to_string(),
                gateway: data.payment_method.to_string(),
                gateway_ref: Some(verification_id.to_string()),
                description: Some(format!("{} subscription", plan.name)),
            },
            payment_record: PaymentRecord {
                amount_minor: data.amount_minor,
                payment_method: data.payment_method,
                period_start,
                period_end,
                paid_at: now,
            },
            requester_notice: notifications::notice(
                membership.user_id,
                Some(mess.id),
                NotificationType::PaymentApproved,
                "Payment approved",
                format!(
                    "{} confirmed your payment. Subscription runs until {}.",
                    mess.name,
                    period_end.format("%Y-%m-%d")
                ),
                json!({ "membership_id": membership_id, "subscription_end": period_end }),
            ),
        };

        let outcome = self
            .workflow_repository
            .approve_payment_request(command)
            .await
            .map_err(|err| {
                error!(%acted_by, %notification_id, db_error = ?err, "payment_requests: approval transaction failed");
                ReviewError::Internal(err)
            })?;
        let approved = request_reviews::settle(outcome, notification_id)?;

        info!(
            %acted_by,
            %notification_id,
            %membership_id,
            transaction_id = %approved.transaction.transaction_id,
            charged = !membership.credits_charged,
            "payment_requests: request approved"
        );
        Ok(PaymentApprovalDto {
            membership: MembershipDto::from(approved.membership),
            transaction: TransactionDto::from(approved.transaction),
        })
    }

    pub async fn reject_payment_request(
        &self,
        actor: Actor,
        notification_id: Uuid,
        reason: Option<String>,
    ) -> UseCaseResult<()> {
        let acted_by = actor.user_id;
        info!(%acted_by, %notification_id, "payment_requests: rejection requested");

        let request = request_reviews::load_pending_request(
            self.notification_repository.as_ref(),
            self.mess_repository.as_ref(),
            &actor,
            notification_id,
            NotificationType::PaymentRequest,
        )
        .await?;
        let data: PaymentRequestData =
            notifications::decode_data(&request.notification).ok_or(ReviewError::MalformedRequest)?;
        let (Some(membership_id), Some(verification_id)) = (data.membership_id, data.verification_id)
        else {
            return Err(ReviewError::MalformedRequest);
        };

        let membership = self
            .membership_repository
            .find_by_id(membership_id)
            .await
            .map_err(|err| {
                error!(%membership_id, db_error = ?err, "payment_requests: failed to load membership");
                ReviewError::Internal(err)
            })?
            .ok_or(ReviewError::MembershipNotFound)?;

        let reason = reason.filter(|reason| !reason.trim().is_empty());
        let message = match &reason {
            Some(reason) => format!("{} could not confirm your payment: {}", request.mess.name, reason),
            None => format!("{} could not confirm your payment", request.mess.name),
        };

        let outcome = self
            .workflow_repository
            .reject_request(RejectRequestCommand {
                notification_id,
                acted_by,
                reason: reason.clone(),
                requester_notice: notifications::notice(
                    data.requester_id,
                    Some(request.mess.id),
                    NotificationType::PaymentRejected,
                    "Payment rejected",
                    message,
                    json!({ "membership_id": membership_id, "reason": reason }),
                ),
                payment: Some(PaymentRejection {
                    membership_id,
                    expected_version: membership.version,
                    verification_id,
                }),
            })
            .await
            .map_err(|err| {
                error!(%acted_by, %notification_id, db_error = ?err, "payment_requests: rejection transaction failed");
                ReviewError::Internal(err)
            })?;
        request_reviews::settle(outcome, notification_id)?;

        info!(%acted_by, %notification_id, %membership_id, "payment_requests: request rejected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usecases::fixtures,
        domain::{
            entities::{
                meal_plans::MealPlanEntity, memberships::MembershipEntity, messes::MessEntity,
                notifications::NotificationEntity, transactions::TransactionEntity,
            },
            repositories::{
                meal_plans::MockMealPlanRepository,
                membership_workflows::MockMembershipWorkflowRepository,
                memberships::MockMembershipRepository, mess_credits::MockMessCreditsRepository,
                messes::MockMessRepository, notifications::MockNotificationRepository,
            },
            value_objects::{
                approvals::{PaymentApprovalResult, PaymentSubmissionResult},
                enums::{
                    notification_statuses::NotificationStatus, payment_methods::PaymentMethod,
                    user_roles::UserRole,
                },
            },
        },
    };
    use chrono::Duration;
    use mockall::predicate::eq;

    type TestUseCase = PaymentRequestUseCase<
        MockMessRepository,
        MockMealPlanRepository,
        MockMembershipRepository,
        MockNotificationRepository,
        MockMessCreditsRepository,
        MockMembershipWorkflowRepository,
    >;

    #[derive(Default)]
    struct Mocks {
        messes: MockMessRepository,
        plans: MockMealPlanRepository,
        memberships: MockMembershipRepository,
        notifications: MockNotificationRepository,
        credits: MockMessCreditsRepository,
        workflows: MockMembershipWorkflowRepository,
    }

    impl Mocks {
        fn build(self) -> TestUseCase {
            PaymentRequestUseCase::new(
                Arc::new(self.messes),
                Arc::new(self.plans),
                Arc::new(self.memberships),
                Arc::new(self.notifications),
                Arc::new(self.credits),
                Arc::new(self.workflows),
            )
        }

        fn with_mess(&mut self, mess: &MessEntity) {
            let mess = mess.clone();
            self.messes
                .expect_find_by_id()
                .with(eq(mess.id))
                .returning(move |_| Ok(Some(mess.clone())));
        }

        fn with_plan(&mut self, plan: &MealPlanEntity) {
            let plan = plan.clone();
            self.plans
                .expect_find_by_id()
                .with(eq(plan.id))
                .returning(move |_| Ok(Some(plan.clone())));
        }

        fn with_notification(&mut self, notification: &NotificationEntity) {
            let notification = notification.clone();
            self.notifications
                .expect_find_by_id()
                .with(eq(notification.id))
                .returning(move |_| Ok(Some(notification.clone())));
        }

        fn with_membership(&mut self, membership: &MembershipEntity) {
            let membership = membership.clone();
            self.memberships
                .expect_find_by_id()
                .with(eq(membership.id))
                .returning(move |_| Ok(Some(membership.clone())));
        }
    }

    fn payment_notification(
        owner_id: Uuid,
        membership: &MembershipEntity,
        plan: &MealPlanEntity,
    ) -> NotificationEntity {
        fixtures::notification(
            owner_id,
            membership.mess_id,
            NotificationType::PaymentRequest,
            NotificationStatus::Pending,
            json!(PaymentRequestData {
                requester_id: membership.user_id,
                membership_id: Some(membership.id),
                verification_id: Some(Uuid::new_v4()),
                meal_plan_id: plan.id,
                amount_minor: plan.price_minor,
                payment_method: PaymentMethod::Upi,
            }),
        )
    }

    fn recorded(command: &PaymentApprovalCommand, base: &MembershipEntity) -> PaymentApprovalResult {
        let mut membership = base.clone();
        membership.status = MembershipStatus::Active.to_string();
        membership.payment_status = PaymentStatus::Paid.to_string();
        membership.payment_request_status = PaymentRequestStatus::Approved.to_string();
        membership.subscription_end = command.changes.subscription_end;
        membership.version += 1;

        let transaction = TransactionEntity {
            id: Uuid::new_v4(),
            transaction_id: command.transaction.transaction_id.clone(),
            user_id: command.transaction.user_id,
            mess_id: command.transaction.mess_id,
            membership_id: command.transaction.membership_id,
            transaction_type: command.transaction.transaction_type.clone(),
            amount_minor: command.transaction.amount_minor,
            status: command.transaction.status.clone(),
            gateway: command.transaction.gateway.clone(),
            gateway_ref: command.transaction.gateway_ref.clone(),
            description: command.transaction.description.clone(),
            created_at: Utc::now(),
        };

        PaymentApprovalResult {
            membership,
            transaction,
        }
    }

    #[tokio::test]
    async fn first_payment_charges_credits_and_records_transaction() {
        let owner = Actor::new(Uuid::new_v4(), UserRole::MessOwner);
        let mess = fixtures::mess(owner.user_id);
        let plan = fixtures::plan(mess.id, 250_000);
        let membership = fixtures::awaiting_payment_membership(Uuid::new_v4(), mess.id, plan.id);
        let notification = payment_notification(owner.user_id, &membership, &plan);
        let mess_id = mess.id;
        let membership_id = membership.id;

        let mut mocks = Mocks::default();
        mocks.with_mess(&mess);
        mocks.with_plan(&plan);
        mocks.with_notification(&notification);
        mocks.with_membership(&membership);
        mocks
            .credits
            .expect_find_by_mess_id()
            .with(eq(mess_id))
            .times(1)
            .returning(move |_| Ok(Some(fixtures::credits(mess_id, 2, 1))));
        let base = membership.clone();
        mocks
            .workflows
            .expect_approve_payment_request()
            .withf(move |command| {
                command.membership_id == membership_id
                    && command.expected_version == 1
                    && command.credit_charge.is_some()
                    && command.transaction.transaction_id.starts_with("TXN-")
                    && command.transaction.transaction_type == "subscription_payment"
                    && command.transaction.status == "success"
                    && command.transaction.gateway == "upi"
                    && command.transaction.amount_minor == 250_000
                    && command.changes.subscription_start.is_some()
                    && command.changes.credits_charged == Some(true)
            })
            .times(1)
            .returning(move |command| Ok(ApprovalOutcome::Applied(recorded(&command, &base))));

        let usecase = mocks.build();
        let approved = usecase
            .approve_payment_request(owner, notification.id)
            .await
            .unwrap();

        assert_eq!(approved.membership.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(approved.transaction.amount_minor, 250_000);
    }

    #[tokio::test]
    async fn renewal_of_charged_membership_extends_from_current_end() {
        let owner = Actor::new(Uuid::new_v4(), UserRole::MessOwner);
        let mess = fixtures::mess(owner.user_id);
        let plan = fixtures::plan(mess.id, 250_000);
        let mut membership = fixtures::paid_membership(Uuid::new_v4(), mess.id, plan.id);
        membership.payment_request_status = PaymentRequestStatus::Pending.to_string();
        let current_end = membership.subscription_end.unwrap();
        let notification = payment_notification(owner.user_id, &membership, &plan);

        let mut mocks = Mocks::default();
        mocks.with_mess(&mess);
        mocks.with_plan(&plan);
        mocks.with_notification(&notification);
        mocks.with_membership(&membership);
        mocks.credits.expect_find_by_mess_id().never();
        let base = membership.clone();
        mocks
            .workflows
            .expect_approve_payment_request()
            .withf(move |command| {
                command.credit_charge.is_none()
                    && command.changes.subscription_start.is_none()
                    && command.changes.subscription_end == Some(current_end + Duration::days(30))
                    && command.payment_record.period_start == current_end
            })
            .times(1)
            .returning(move |command| Ok(ApprovalOutcome::Applied(recorded(&command, &base))));

        let usecase = mocks.build();
        usecase
            .approve_payment_request(owner, notification.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn first_payment_after_join_settles_the_admission_window() {
        let owner = Actor::new(Uuid::new_v4(), UserRole::MessOwner);
        let mess = fixtures::mess(owner.user_id);
        let plan = fixtures::plan(mess.id, 250_000);
        let joined_at = Utc::now();
        let mut membership = fixtures::paid_membership(Uuid::new_v4(), mess.id, plan.id);
        membership.payment_status = PaymentStatus::Pending.to_string();
        membership.payment_request_status = PaymentRequestStatus::Pending.to_string();
        membership.subscription_start = Some(joined_at);
        membership.subscription_end = Some(joined_at + Duration::days(30));
        let notification = payment_notification(owner.user_id, &membership, &plan);

        let mut mocks = Mocks::default();
        mocks.with_mess(&mess);
        mocks.with_plan(&plan);
        mocks.with_notification(&notification);
        mocks.with_membership(&membership);
        mocks.credits.expect_find_by_mess_id().never();
        let base = membership.clone();
        mocks
            .workflows
            .expect_approve_payment_request()
            .withf(move |command| {
                command.credit_charge.is_none()
                    && command.changes.subscription_start.is_none()
                    && command.changes.leave_days_used.is_none()
                    && command.changes.subscription_end == Some(joined_at + Duration::days(30))
                    && command.payment_record.period_start == joined_at
                    && command.payment_record.period_end == joined_at + Duration::days(30)
            })
            .times(1)
            .returning(move |command| Ok(ApprovalOutcome::Applied(recorded(&command, &base))));

        let usecase = mocks.build();
        let approved = usecase
            .approve_payment_request(owner, notification.id)
            .await
            .unwrap();

        assert_eq!(
            approved.membership.subscription_end,
            Some(joined_at + Duration::days(30))
        );
    }

    #[tokio::test]
    async fn membership_without_pending_payment_is_conflict() {
        let owner = Actor::new(Uuid::new_v4(), UserRole::MessOwner);
        let mess = fixtures::mess(owner.user_id);
        let plan = fixtures::plan(mess.id, 250_000);
        let membership = fixtures::paid_membership(Uuid::new_v4(), mess.id, plan.id);
        let notification = payment_notification(owner.user_id, &membership, &plan);

        let mut mocks = Mocks::default();
        mocks.with_mess(&mess);
        mocks.with_notification(&notification);
        mocks.with_membership(&membership);
        mocks.workflows.expect_approve_payment_request().never();

        let usecase = mocks.build();
        let err = usecase
            .approve_payment_request(owner, notification.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::NoPendingPayment));
    }

    #[tokio::test]
    async fn stale_membership_surfaces_as_conflict() {
        let owner = Actor::new(Uuid::new_v4(), UserRole::MessOwner);
        let mess = fixtures::mess(owner.user_id);
        let plan = fixtures::plan(mess.id, 250_000);
        let membership = fixtures::awaiting_payment_membership(Uuid::new_v4(), mess.id, plan.id);
        let notification = payment_notification(owner.user_id, &membership, &plan);
        let mess_id = mess.id;

        let mut mocks = Mocks::default();
        mocks.with_mess(&mess);
        mocks.with_plan(&plan);
        mocks.with_notification(&notification);
        mocks.with_membership(&membership);
        mocks
            .credits
            .expect_find_by_mess_id()
            .returning(move |_| Ok(Some(fixtures::credits(mess_id, 2, 1))));
        mocks
            .workflows
            .expect_approve_payment_request()
            .returning(|_| Ok(ApprovalOutcome::StaleMembership));

        let usecase = mocks.build();
        let err = usecase
            .approve_payment_request(owner, notification.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::ConcurrentUpdate));
    }

    #[tokio::test]
    async fn submission_with_wrong_amount_is_refused() {
        let user = Actor::new(Uuid::new_v4(), UserRole::User);
        let mess = fixtures::mess(Uuid::new_v4());
        let plan = fixtures::plan(mess.id, 250_000);

        let mut mocks = Mocks::default();
        mocks.with_mess(&mess);
        mocks.with_plan(&plan);
        mocks.workflows.expect_submit_payment_request().never();

        let usecase = mocks.build();
        let err = usecase
            .submit_payment_request(
                user,
                SubmitPaymentRequestModel {
                    mess_id: mess.id,
                    meal_plan_id: plan.id,
                    amount_minor: 100,
                    payment_method: PaymentMethod::Cash,
                    screenshot_url: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReviewError::AmountMismatch {
                expected: 250_000,
                got: 100
            }
        ));
    }

    fn submission(mess: &MessEntity, plan: &MealPlanEntity) -> SubmitPaymentRequestModel {
        SubmitPaymentRequestModel {
            mess_id: mess.id,
            meal_plan_id: plan.id,
            amount_minor: plan.price_minor,
            payment_method: PaymentMethod::Upi,
            screenshot_url: None,
        }
    }

    #[tokio::test]
    async fn second_submission_while_one_is_pending_is_conflict() {
        let user = Actor::new(Uuid::new_v4(), UserRole::User);
        let mess = fixtures::mess(Uuid::new_v4());
        let plan = fixtures::plan(mess.id, 250_000);
        let pending = fixtures::awaiting_payment_membership(user.user_id, mess.id, plan.id);

        let mut mocks = Mocks::default();
        mocks.with_mess(&mess);
        mocks.with_plan(&plan);
        mocks
            .memberships
            .expect_find_by_user_and_mess()
            .with(eq(user.user_id), eq(mess.id))
            .returning(move |_, _| Ok(Some(pending.clone())));
        mocks.workflows.expect_submit_payment_request().never();

        let usecase = mocks.build();
        let err = usecase
            .submit_payment_request(user, submission(&mess, &plan))
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::DuplicateRequest));
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn submission_to_inactive_mess_is_refused() {
        let user = Actor::new(Uuid::new_v4(), UserRole::User);
        let mut mess = fixtures::mess(Uuid::new_v4());
        mess.is_active = false;
        let plan = fixtures::plan(mess.id, 250_000);

        let mut mocks = Mocks::default();
        mocks.with_mess(&mess);
        mocks.plans.expect_find_by_id().never();
        mocks.memberships.expect_find_by_user_and_mess().never();
        mocks.workflows.expect_submit_payment_request().never();

        let usecase = mocks.build();
        let err = usecase
            .submit_payment_request(user, submission(&mess, &plan))
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::MessNotFound));
    }

    #[tokio::test]
    async fn first_submission_creates_uncharged_pending_membership() {
        let user = Actor::new(Uuid::new_v4(), UserRole::User);
        let mess = fixtures::mess(Uuid::new_v4());
        let plan = fixtures::plan(mess.id, 250_000);
        let owner_id = mess.owner_id;

        let mut mocks = Mocks::default();
        mocks.with_mess(&mess);
        mocks.with_plan(&plan);
        mocks
            .memberships
            .expect_find_by_user_and_mess()
            .with(eq(user.user_id), eq(mess.id))
            .returning(|_, _| Ok(None));
        let receipt = PaymentSubmissionResult {
            notification_id: Uuid::new_v4(),
            membership_id: Uuid::new_v4(),
            verification_id: Uuid::new_v4(),
        };
        let returned = receipt.clone();
        mocks
            .workflows
            .expect_submit_payment_request()
            .withf(move |command| {
                matches!(
                    &command.membership,
                    MembershipWrite::Insert(insert)
                        if !insert.credits_charged
                            && insert.status == "pending"
                            && insert.payment_request_status == "pending"
                ) && command.owner_notice.user_id == owner_id
                    && command.owner_notice.status == "pending"
                    && command.verification.payment_method == PaymentMethod::Upi
            })
            .times(1)
            .returning(move |_| Ok(ApprovalOutcome::Applied(returned.clone())));

        let usecase = mocks.build();
        let result = usecase
            .submit_payment_request(
                user,
                SubmitPaymentRequestModel {
                    mess_id: mess.id,
                    meal_plan_id: plan.id,
                    amount_minor: 250_000,
                    payment_method: PaymentMethod::Upi,
                    screenshot_url: Some("https://cdn.example/pay.png".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.membership_id, receipt.membership_id);
        assert_eq!(result.verification_id, receipt.verification_id);
    }

    #[tokio::test]
    async fn rejection_reverts_payment_request_state() {
        let owner = Actor::new(Uuid::new_v4(), UserRole::MessOwner);
        let mess = fixtures::mess(owner.user_id);
        let plan = fixtures::plan(mess.id, 250_000);
        let membership = fixtures::awaiting_payment_membership(Uuid::new_v4(), mess.id, plan.id);
        let notification = payment_notification(owner.user_id, &membership, &plan);
        let membership_id = membership.id;

        let mut mocks = Mocks::default();
        mocks.with_mess(&mess);
        mocks.with_notification(&notification);
        mocks.with_membership(&membership);
        mocks
            .workflows
            .expect_reject_request()
            .withf(move |command| {
                command.reason.as_deref() == Some("screenshot unreadable")
                    && command
                        .payment
                        .as_ref()
                        .is_some_and(|payment| payment.membership_id == membership_id)
                    && command.requester_notice.notification_type == "payment_rejected"
            })
            .times(1)
            .returning(|_| Ok(ApprovalOutcome::Applied(())));

        let usecase = mocks.build();
        usecase
            .reject_payment_request(
                owner,
                notification.id,
                Some("screenshot unreadable".to_string()),
            )
            .await
            .unwrap();
    }
}
