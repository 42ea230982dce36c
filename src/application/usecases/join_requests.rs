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
        entities::memberships::{InsertMembershipEntity, UpdateMembershipEntity},
        repositories::{
            chat_groups::ChatGroupRepository, meal_plans::MealPlanRepository,
            membership_workflows::MembershipWorkflowRepository, memberships::MembershipRepository,
            mess_credits::MessCreditsRepository, messes::MessRepository,
            notifications::NotificationRepository,
        },
        value_objects::{
            actors::Actor,
            approvals::{JoinApprovalCommand, MembershipWrite, RejectRequestCommand},
            enums::{
                membership_statuses::MembershipStatus, notification_types::NotificationType,
                payment_request_statuses::PaymentRequestStatus, payment_statuses::PaymentStatus,
            },
            join_requests::{RequestReceiptDto, SubmitJoinRequestModel},
            memberships::{self, MembershipDto, admission_period},
            notifications::{self, JoinRequestData},
        },
    },
};

pub type UseCaseResult<T> = std::result::Result<T, ReviewError>;

pub struct JoinRequestUseCase<M, P, Ms, N, C, W, G>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
    C: MessCreditsRepository + Send + Sync + 'static,
    W: MembershipWorkflowRepository + Send + Sync + 'static,
    G: ChatGroupRepository + Send + Sync + 'static,
{
    mess_repository: Arc<M>,
    meal_plan_repository: Arc<P>,
    membership_repository: Arc<Ms>,
    notification_repository: Arc<N>,
    credits_repository: Arc<C>,
    workflow_repository: Arc<W>,
    chat_group_repository: Arc<G>,
}

impl<M, P, Ms, N, C, W, G> JoinRequestUseCase<M, P, Ms, N, C, W, G>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
    C: MessCreditsRepository + Send + Sync + 'static,
    W: MembershipWorkflowRepository + Send + Sync + 'static,
    G: ChatGroupRepository + Send + Sync + 'static,
{
    pub fn new(
        mess_repository: Arc<M>,
        meal_plan_repository: Arc<P>,
        membership_repository: Arc<Ms>,
        notification_repository: Arc<N>,
        credits_repository: Arc<C>,
        workflow_repository: Arc<W>,
        chat_group_repository: Arc<G>,
    ) -> Self {
        Self {
            mess_repository,
            meal_plan_repository,
            membership_repository,
            notification_repository,
            credits_repository,
            workflow_repository,
            chat_group_repository,
        }
    }

    pub async fn submit_join_request(
        &self,
        actor: Actor,
        mess_id: Uuid,
        model: SubmitJoinRequestModel,
    ) -> UseCaseResult<RequestReceiptDto> {
        let user_id = actor.user_id;
        info!(%user_id, %mess_id, meal_plan_id = %model.meal_plan_id, "join_requests: submit requested");

        let mess = mess_access::load_mess(self.mess_repository.as_ref(), mess_id).await?;
        if !mess.is_active {
            return Err(ReviewError::MessNotFound);
        }
        let plan = request_reviews::load_offered_plan(
            self.meal_plan_repository.as_ref(),
            model.meal_plan_id,
            mess_id,
        )
        .await?;

        let existing = self
            .membership_repository
            .find_by_user_and_mess(user_id, mess_id)
            .await
            .map_err(|err| {
                error!(%user_id, %mess_id, db_error = ?err, "join_requests: failed to load membership");
                ReviewError::Internal(err)
            })?;
        if existing.as_ref().is_some_and(memberships::is_active) {
            let err = ReviewError::AlreadyMember;
            warn!(%user_id, %mess_id, status = err.status_code().as_u16(), "join_requests: already a member");
            return Err(err);
        }

        let pending = self
            .notification_repository
            .has_pending_join_request(mess_id, user_id)
            .await
            .map_err(|err| {
                error!(%user_id, %mess_id, db_error = ?err, "join_requests: failed to check pending requests");
                ReviewError::Internal(err)
            })?;
        if pending {
            let err = ReviewError::DuplicateRequest;
            warn!(%user_id, %mess_id, status = err.status_code().as_u16(), "join_requests: request already pending");
            return Err(err);
        }

        let data = JoinRequestData {
            requester_id: user_id,
            meal_plan_id: plan.id,
            message: model.message.filter(|message| !message.trim().is_empty()),
        };
        let notification = self
            .notification_repository
            .create(notifications::request_for_owner(
                mess.owner_id,
                mess.id,
                NotificationType::JoinRequest,
                "New join request",
                format!("A user asked to join {} on the {} plan", mess.name, plan.name),
                json!(data),
            ))
            .await
            .map_err(|err| {
                error!(%user_id, %mess_id, db_error = ?err, "join_requests: failed to store request");
                ReviewError::Internal(err)
            })?;

        info!(%user_id, %mess_id, notification_id = %notification.id, "join_requests: request submitted");
        Ok(RequestReceiptDto {
            notification_id: notification.id,
        })
    }

    pub async fn approve_join_request(
        &self,
        actor: Actor,
        notification_id: Uuid,
    ) -> UseCaseResult<MembershipDto> {
        let acted_by = actor.user_id;
        info!(%acted_by, %notification_id, "join_requests: approval requested");

        let request = request_reviews::load_pending_request(
            self.notification_repository.as_ref(),
            self.mess_repository.as_ref(),
            &actor,
            notification_id,
            NotificationType::JoinRequest,
        )
        .await?;
        let mess = request.mess;
        let data: JoinRequestData =
            notifications::decode_data(&request.notification).ok_or(ReviewError::MalformedRequest)?;
        let requester_id = data.requester_id;

        let plan = request_reviews::load_offered_plan(
            self.meal_plan_repository.as_ref(),
            data.meal_plan_id,
            mess.id,
        )
        .await?;

        let existing = self
            .membership_repository
            .find_by_user_and_mess(requester_id, mess.id)
            .await
            .map_err(|err| {
                error!(%requester_id, mess_id = %mess.id, db_error = ?err, "join_requests: failed to load membership");
                ReviewError::Internal(err)
            })?;
        if existing.as_ref().is_some_and(memberships::is_active) {
            let err = ReviewError::AlreadyMember;
            warn!(%requester_id, mess_id = %mess.id, status = err.status_code().as_u16(), "join_requests: requester already active");
            return Err(err);
        }

        let already_charged = existing.as_ref().is_some_and(|m| m.credits_charged);
        let credit_charge = if already_charged {
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
        let (start, end) = admission_period(now, plan.duration_days);
        let payment_status = if plan.price_minor == 0 {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        };

        let membership = match &existing {
            None => MembershipWrite::Insert(InsertMembershipEntity {
                user_id: requester_id,
                mess_id: mess.id,
                meal_plan_id: plan.id,
                status: MembershipStatus::Active.to_string(),
                payment_status: payment_status.to_string(),
                payment_request_status: PaymentRequestStatus::NotRequested.to_string(),
                subscription_start: Some(start),
                subscription_end: Some(end),
                leave_days_used: 0,
                credits_charged: true,
            }),
            Some(current) => MembershipWrite::Update {
                membership_id: current.id,
                expected_version: current.version,
                changes: UpdateMembershipEntity {
                    meal_plan_id: Some(plan.id),
                    status: Some(MembershipStatus::Active.to_string()),
                    payment_status: Some(payment_status.to_string()),
                    subscription_start: Some(start),
                    subscription_end: Some(end),
                    leave_days_used: Some(0),
                    credits_charged: Some(true),
                    ..Default::default()
                },
            },
        };

        let command = JoinApprovalCommand {
            notification_id,
            acted_by,
            membership,
            credit_charge,
            requester_notice: notifications::notice(
                requester_id,
                Some(mess.id),
                NotificationType::JoinApproved,
                "Join request approved",
                format!("Welcome to {}. Your {} plan is active.", mess.name, plan.name),
                json!({ "mess_id": mess.id, "meal_plan_id": plan.id }),
            ),
        };

        let outcome = self
            .workflow_repository
            .approve_join_request(command)
            .await
            .map_err(|err| {
                error!(%acted_by, %notification_id, db_error = ?err, "join_requests: approval transaction failed");
                ReviewError::Internal(err)
            })?;
        let membership = request_reviews::settle(outcome, notification_id)?;

        info!(
            %acted_by,
            %notification_id,
            membership_id = %membership.id,
            %requester_id,
            charged = !already_charged,
            "join_requests: request approved"
        );

        match self
            .chat_group_repository
            .add_member_to_mess_groups(mess.id, requester_id)
            .await
        {
            Ok(groups) => info!(%requester_id, mess_id = %mess.id, groups, "join_requests: member added to chat groups"),
            Err(err) => error!(
                %requester_id,
                mess_id = %mess.id,
                db_error = ?err,
                "join_requests: chat group auto-join failed"
            ),
        }

        Ok(MembershipDto::from(membership))
    }

    pub async fn reject_join_request(
        &self,
        actor: Actor,
        notification_id: Uuid,
        reason: Option<String>,
    ) -> UseCaseResult<()> {
        let acted_by = actor.user_id;
        info!(%acted_by, %notification_id, "join_requests: rejection requested");

        let request = request_reviews::load_pending_request(
            self.notification_repository.as_ref(),
            self.mess_repository.as_ref(),
            &actor,
            notification_id,
            NotificationType::JoinRequest,
        )
        .await?;
        let data: JoinRequestData =
            notifications::decode_data(&request.notification).ok_or(ReviewError::MalformedRequest)?;

        let reason = reason.filter(|reason| !reason.trim().is_empty());
        let message = match &reason {
            Some(reason) => format!("{} declined your request: {}", request.mess.name, reason),
            None => format!("{} declined your request", request.mess.name),
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
                    NotificationType::JoinRejected,
                    "Join request rejected",
                    message,
                    json!({ "mess_id": request.mess.id, "reason": reason }),
                ),
                payment: None,
            })
            .await
            .map_err(|err| {
                error!(%acted_by, %notification_id, db_error = ?err, "join_requests: rejection transaction failed");
                ReviewError::Internal(err)
            })?;
        request_reviews::settle(outcome, notification_id)?;

        info!(%acted_by, %notification_id, requester_id = %data.requester_id, "join_requests: request rejected");
        Ok(())
    }
}
