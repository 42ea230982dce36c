use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::mess_access::{self, MessAccessError},
    domain::{
        entities::{
            leave_requests::{InsertLeaveRequestEntity, LeaveRequestEntity},
            memberships::{MembershipEntity, UpdateMembershipEntity},
        },
        repositories::{
            leave_requests::LeaveRequestRepository, meal_plans::MealPlanRepository,
            memberships::MembershipRepository, messes::MessRepository,
        },
        value_objects::{
            actors::Actor,
            approvals::{
                ApprovalOutcome, LeaveApprovalCommand, LeaveRejectionCommand,
                LeaveSubmissionCommand,
            },
            enums::{leave_statuses::LeaveStatus, notification_types::NotificationType},
            leave_requests::{
                LeaveRequestDto, SubmitLeaveRequestModel, leave_span_days, remaining_leave_days,
            },
            memberships,
            notifications::{self, LeaveRequestData},
        },
    },
};

#[derive(Debug, Error)]
pub enum LeaveError {
    #[error("leave request not found")]
    NotFound,
    #[error("membership not found")]
    MembershipNotFound,
    #[error("mess not found")]
    MessNotFound,
    #[error("not allowed to act on this leave request")]
    Forbidden,
    #[error("membership is not active")]
    MembershipInactive,
    #[error("invalid leave: {0}")]
    Invalid(String),
    #[error("only {remaining} leave days remain on this plan")]
    AllowanceExceeded { remaining: i32 },
    #[error("leave overlaps an existing request")]
    Overlapping,
    #[error("leave request already processed")]
    AlreadyProcessed,
    #[error("membership changed concurrently, retry")]
    ConcurrentUpdate,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl LeaveError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            LeaveError::NotFound | LeaveError::MembershipNotFound | LeaveError::MessNotFound => {
                StatusCode::NOT_FOUND
            }
            LeaveError::Forbidden => StatusCode::FORBIDDEN,
            LeaveError::MembershipInactive
            | LeaveError::Invalid(_)
            | LeaveError::AllowanceExceeded { .. } => StatusCode::BAD_REQUEST,
            LeaveError::Overlapping
            | LeaveError::AlreadyProcessed
            | LeaveError::ConcurrentUpdate => StatusCode::CONFLICT,
            LeaveError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MessAccessError> for LeaveError {
    fn from(err: MessAccessError) -> Self {
        match err {
            MessAccessError::NotFound => LeaveError::MessNotFound,
            MessAccessError::Forbidden => LeaveError::Forbidden,
            MessAccessError::Internal(err) => LeaveError::Internal(err),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, LeaveError>;

pub struct LeaveRequestUseCase<M, P, Ms, L>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
    L: LeaveRequestRepository + Send + Sync + 'static,
{
    mess_repository: Arc<M>,
    meal_plan_repository: Arc<P>,
    membership_repository: Arc<Ms>,
    leave_repository: Arc<L>,
}

impl<M, P, Ms, L> LeaveRequestUseCase<M, P, Ms, L>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
    L: LeaveRequestRepository + Send + Sync + 'static,
{
    pub fn new(
        mess_repository: Arc<M>,
        meal_plan_repository: Arc<P>,
        membership_repository: Arc<Ms>,
        leave_repository: Arc<L>,
    ) -> Self {
        Self {
            mess_repository,
            meal_plan_repository,
            membership_repository,
            leave_repository,
        }
    }

    pub async fn submit_leave_request(
        &self,
        actor: Actor,
        membership_id: Uuid,
        model: SubmitLeaveRequestModel,
    ) -> UseCaseResult<LeaveRequestDto> {
        let user_id = actor.user_id;
        info!(
            %user_id,
            %membership_id,
            start_date = %model.start_date,
            end_date = %model.end_date,
            "leave_requests: submit requested"
        );

        let membership = self.load_membership(membership_id).await?;
        if membership.user_id != user_id {
            let err = LeaveError::Forbidden;
            warn!(%user_id, %membership_id, status = err.status_code().as_u16(), "leave_requests: not the member");
            return Err(err);
        }
        if !memberships::is_active(&membership) {
            return Err(LeaveError::MembershipInactive);
        }

        let days = leave_span_days(model.start_date, model.end_date)
            .ok_or_else(|| LeaveError::Invalid("start_date must not be after end_date".to_string()))?;
        if model.start_date < Utc::now().date_naive() {
            return Err(LeaveError::Invalid("start_date is in the past".to_string()));
        }

        self.ensure_allowance(&membership, days).await?;

        let overlapping = self
            .leave_repository
            .has_overlapping(membership_id, model.start_date, model.end_date)
            .await
            .map_err(|err| {
                error!(%membership_id, db_error = ?err, "leave_requests: failed to check overlap");
                LeaveError::Internal(err)
            })?;
        if overlapping {
            let err = LeaveError::Overlapping;
            warn!(%membership_id, status = err.status_code().as_u16(), "leave_requests: overlapping leave");
            return Err(err);
        }

        let mess = mess_access::load_mess(self.mess_repository.as_ref(), membership.mess_id).await?;
        let data = LeaveRequestData {
            requester_id: user_id,
            membership_id,
            leave_request_id: None,
            start_date: model.start_date,
            end_date: model.end_date,
            days,
        };
        let command = LeaveSubmissionCommand {
            leave: InsertLeaveRequestEntity {
                membership_id,
                user_id,
                mess_id: mess.id,
                start_date: model.start_date,
                end_date: model.end_date,
                days,
                reason: model.reason.filter(|reason| !reason.trim().is_empty()),
                status: LeaveStatus::Pending.to_string(),
            },
            owner_notice: notifications::request_for_owner(
                mess.owner_id,
                mess.id,
                NotificationType::LeaveRequest,
                "New leave request",
                format!(
                    "A member asked for {} leave day(s) from {} to {}",
                    days, model.start_date, model.end_date
                ),
                json!(data),
            ),
        };

        let leave = self.leave_repository.submit(command).await.map_err(|err| {
            error!(%membership_id, db_error = ?err, "leave_requests: failed to store leave");
            LeaveError::Internal(err)
        })?;

        info!(%user_id, %membership_id, leave_id = %leave.id, days, "leave_requests: leave submitted");
        Ok(LeaveRequestDto::from(leave))
    }

    /// Approval consumes `days` of the allowance and pushes the subscription
    /// end out by the same amount.
    pub async fn approve_leave_request(
        &self,
        actor: Actor,
        leave_id: Uuid,
    ) -> UseCaseResult<LeaveRequestDto> {
        let reviewed_by = actor.user_id;
        info!(%reviewed_by, %leave_id, "leave_requests: approval requested");

        let leave = self.load_pending_leave(&actor, leave_id).await?;
        let membership = self.load_membership(leave.membership_id).await?;
        self.ensure_allowance(&membership, leave.days).await?;

        let extended_end = membership
            .subscription_end
            .map(|end| end + Duration::days(i64::from(leave.days)));
        let command = LeaveApprovalCommand {
            leave_id,
            reviewed_by,
            membership_id: membership.id,
            expected_version: membership.version,
            changes: UpdateMembershipEntity {
                leave_days_used: Some(membership.leave_days_used + leave.days),
                subscription_end: extended_end,
                ..Default::default()
            },
            member_notice: notifications::notice(
                leave.user_id,
                Some(leave.mess_id),
                NotificationType::LeaveApproved,
                "Leave approved",
                format!(
                    "Your leave from {} to {} was approved",
                    leave.start_date, leave.end_date
                ),
                json!({ "leave_request_id": leave_id, "days": leave.days }),
            ),
        };

        let outcome = self.leave_repository.approve(command).await.map_err(|err| {
            error!(%leave_id, db_error = ?err, "leave_requests: approval transaction failed");
            LeaveError::Internal(err)
        })?;
        let approved = settle(outcome, leave_id)?;

        info!(%reviewed_by, %leave_id, days = approved.days, "leave_requests: leave approved");
        Ok(LeaveRequestDto::from(approved))
    }

    pub async fn reject_leave_request(
        &self,
        actor: Actor,
        leave_id: Uuid,
        reason: Option<String>,
    ) -> UseCaseResult<LeaveRequestDto> {
        let reviewed_by = actor.user_id;
        info!(%reviewed_by, %leave_id, "leave_requests: rejection requested");

        let leave = self.load_pending_leave(&actor, leave_id).await?;
        let reason = reason.filter(|reason| !reason.trim().is_empty());
        let message = match &reason {
            Some(reason) => format!("Your leave request was declined: {}", reason),
            None => "Your leave request was declined".to_string(),
        };

        let outcome = self
            .leave_repository
            .reject(LeaveRejectionCommand {
                leave_id,
                reviewed_by,
                reason: reason.clone(),
                member_notice: notifications::notice(
                    leave.user_id,
                    Some(leave.mess_id),
                    NotificationType::LeaveRejected,
                    "Leave rejected",
                    message,
                    json!({ "leave_request_id": leave_id, "reason": reason }),
                ),
            })
            .await
            .map_err(|err| {
                error!(%leave_id, db_error = ?err, "leave_requests: rejection transaction failed");
                LeaveError::Internal(err)
            })?;
        let rejected = settle(outcome, leave_id)?;

        info!(%reviewed_by, %leave_id, "leave_requests: leave rejected");
        Ok(LeaveRequestDto::from(rejected))
    }

    pub async fn list_leave_requests(
        &self,
        actor: Actor,
        membership_id: Uuid,
    ) -> UseCaseResult<Vec<LeaveRequestDto>> {
        let membership = self.load_membership(membership_id).await?;
        let mess = mess_access::load_mess(self.mess_repository.as_ref(), membership.mess_id).await?;
        if !actor.can_view_membership(&membership, &mess) {
            return Err(LeaveError::Forbidden);
        }

        let leaves = self
            .leave_repository
            .list_by_membership(membership_id)
            .await
            .map_err(|err| {
                error!(%membership_id, db_error = ?err, "leave_requests: failed to list leave");
                LeaveError::Internal(err)
            })?;

        Ok(leaves.into_iter().map(LeaveRequestDto::from).collect())
    }

    async fn load_membership(&self, membership_id: Uuid) -> UseCaseResult<MembershipEntity> {
        self.membership_repository
            .find_by_id(membership_id)
            .await
            .map_err(|err| {
                error!(%membership_id, db_error = ?err, "leave_requests: failed to load membership");
                LeaveError::Internal(err)
            })?
            .ok_or(LeaveError::MembershipNotFound)
    }

    async fn load_pending_leave(
        &self,
        actor: &Actor,
        leave_id: Uuid,
    ) -> UseCaseResult<LeaveRequestEntity> {
        let leave = self
            .leave_repository
            .find_by_id(leave_id)
            .await
            .map_err(|err| {
                error!(%leave_id, db_error = ?err, "leave_requests: failed to load leave");
                LeaveError::Internal(err)
            })?
            .ok_or(LeaveError::NotFound)?;

        mess_access::load_managed_mess(self.mess_repository.as_ref(), actor, leave.mess_id).await?;

        if LeaveStatus::from_str(&leave.status) != Some(LeaveStatus::Pending) {
            let err = LeaveError::AlreadyProcessed;
            warn!(%leave_id, leave_status = %leave.status, status = err.status_code().as_u16(), "leave_requests: leave already processed");
            return Err(err);
        }

        Ok(leave)
    }

    async fn ensure_allowance(&self, membership: &MembershipEntity, days: i32) -> UseCaseResult<()> {
        let plan_id = membership.meal_plan_id;
        let plan = self
            .meal_plan_repository
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "leave_requests: failed to load meal plan");
                LeaveError::Internal(err)
            })?
            .ok_or_else(|| LeaveError::Invalid("membership plan no longer exists".to_string()))?;

        let remaining = remaining_leave_days(plan.leave_days_allowed, membership.leave_days_used);
        if days > remaining {
            let err = LeaveError::AllowanceExceeded { remaining };
            warn!(
                membership_id = %membership.id,
                days,
                remaining,
                status = err.status_code().as_u16(),
                "leave_requests: allowance exceeded"
            );
            return Err(err);
        }

        Ok(())
    }
}

fn settle(outcome: ApprovalOutcome<LeaveRequestEntity>, leave_id: Uuid) -> UseCaseResult<LeaveRequestEntity> {
    match outcome {
        ApprovalOutcome::Applied(leave) => Ok(leave),
        ApprovalOutcome::AlreadyProcessed => {
            warn!(%leave_id, "leave_requests: leave settled concurrently");
            Err(LeaveError::AlreadyProcessed)
        }
        ApprovalOutcome::StaleMembership | ApprovalOutcome::CreditsChanged => {
            warn!(%leave_id, "leave_requests: membership version moved");
            Err(LeaveError::ConcurrentUpdate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usecases::fixtures,
        domain::{
            repositories::{
                leave_requests::MockLeaveRequestRepository, meal_plans::MockMealPlanRepository,
                memberships::MockMembershipRepository, messes::MockMessRepository,
            },
            value_objects::enums::user_roles::UserRole,
        },
    };
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    struct Setup {
        member: Actor,
        owner: Actor,
        membership: MembershipEntity,
        messes: MockMessRepository,
        plans: MockMealPlanRepository,
        memberships: MockMembershipRepository,
        leaves: MockLeaveRequestRepository,
    }

    fn setup(leave_days_used: i32) -> Setup {
        let owner = Actor::new(Uuid::new_v4(), UserRole::MessOwner);
        let member = Actor::new(Uuid::new_v4(), UserRole::User);
        let mess = fixtures::mess(owner.user_id);
        let plan = fixtures::plan(mess.id, 300_000);
        let mut membership = fixtures::paid_membership(member.user_id, mess.id, plan.id);
        membership.leave_days_used = leave_days_used;

        let mut messes = MockMessRepository::new();
        let found_mess = mess.clone();
        messes
            .expect_find_by_id()
            .with(eq(mess.id))
            .returning(move |_| Ok(Some(found_mess.clone())));
        let mut plans = MockMealPlanRepository::new();
        plans
            .expect_find_by_id()
            .with(eq(plan.id))
            .returning(move |_| Ok(Some(plan.clone())));
        let mut memberships = MockMembershipRepository::new();
        let found_membership = membership.clone();
        memberships
            .expect_find_by_id()
            .with(eq(membership.id))
            .returning(move |_| Ok(Some(found_membership.clone())));

        Setup {
            member,
            owner,
            membership,
            messes,
            plans,
            memberships,
            leaves: MockLeaveRequestRepository::new(),
        }
    }

    impl Setup {
        fn build(
            self,
        ) -> LeaveRequestUseCase<
            MockMessRepository,
            MockMealPlanRepository,
            MockMembershipRepository,
            MockLeaveRequestRepository,
        > {
            LeaveRequestUseCase::new(
                Arc::new(self.messes),
                Arc::new(self.plans),
                Arc::new(self.memberships),
                Arc::new(self.leaves),
            )
        }
    }

    fn future_day(offset: i64) -> NaiveDate {
        Utc::now().date_naive() + Duration::days(offset)
    }

    fn pending_leave(membership: &MembershipEntity, days: i32) -> LeaveRequestEntity {
        LeaveRequestEntity {
            id: Uuid::new_v4(),
            membership_id: membership.id,
            user_id: membership.user_id,
            mess_id: membership.mess_id,
            start_date: future_day(2),
            end_date: future_day(1 + i64::from(days)),
            days,
            reason: None,
            status: LeaveStatus::Pending.to_string(),
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn submit_counts_days_inclusively_and_notifies_owner() {
        let mut setup = setup(0);
        let membership_id = setup.membership.id;
        let owner_id = setup.owner.user_id;
        setup
            .leaves
            .expect_has_overlapping()
            .returning(|_, _, _| Ok(false));
        setup
            .leaves
            .expect_submit()
            .withf(move |command| {
                command.leave.days == 3
                    && command.leave.membership_id == membership_id
                    && command.owner_notice.user_id == owner_id
                    && command.owner_notice.notification_type == "leave_request"
            })
            .times(1)
            .returning(|command| {
                Ok(LeaveRequestEntity {
                    id: Uuid::new_v4(),
                    membership_id: command.leave.membership_id,
                    user_id: command.leave.user_id,
                    mess_id: command.leave.mess_id,
                    start_date: command.leave.start_date,
                    end_date: command.leave.end_date,
                    days: command.leave.days,
                    reason: command.leave.reason,
                    status: command.leave.status,
                    reviewed_by: None,
                    reviewed_at: None,
                    rejection_reason: None,
                    created_at: Utc::now(),
                })
            });

        let member = setup.member;
        let usecase = setup.build();
        let leave = usecase
            .submit_leave_request(
                member,
                membership_id,
                SubmitLeaveRequestModel {
                    start_date: future_day(1),
                    end_date: future_day(3),
                    reason: Some("travel".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(leave.days, 3);
        assert_eq!(leave.status, Some(LeaveStatus::Pending));
    }

    #[tokio::test]
    async fn submit_over_allowance_is_refused() {
        let mut setup = setup(3);
        setup.leaves.expect_submit().never();
        let membership_id = setup.membership.id;
        let member = setup.member;
        let usecase = setup.build();

        let err = usecase
            .submit_leave_request(
                member,
                membership_id,
                SubmitLeaveRequestModel {
                    start_date: future_day(1),
                    end_date: future_day(2),
                    reason: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, LeaveError::AllowanceExceeded { remaining: 1 }));
    }

    #[tokio::test]
    async fn submit_with_inverted_range_is_bad_request() {
        let setup = setup(0);
        let membership_id = setup.membership.id;
        let member = setup.member;
        let usecase = setup.build();

        let err = usecase
            .submit_leave_request(
                member,
                membership_id,
                SubmitLeaveRequestModel {
                    start_date: future_day(3),
                    end_date: future_day(1),
                    reason: None,
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn submit_overlapping_leave_is_conflict() {
        let mut setup = setup(0);
        let membership_id = setup.membership.id;
        let (start, end) = (future_day(1), future_day(2));
        setup
            .leaves
            .expect_has_overlapping()
            .with(eq(membership_id), eq(start), eq(end))
            .times(1)
            .returning(|_, _, _| Ok(true));
        setup.leaves.expect_submit().never();

        let member = setup.member;
        let usecase = setup.build();
        let err = usecase
            .submit_leave_request(
                member,
                membership_id,
                SubmitLeaveRequestModel {
                    start_date: start,
                    end_date: end,
                    reason: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, LeaveError::Overlapping));
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn submit_starting_in_the_past_is_bad_request() {
        let mut setup = setup(0);
        setup.leaves.expect_has_overlapping().never();
        setup.leaves.expect_submit().never();
        let membership_id = setup.membership.id;
        let member = setup.member;
        let usecase = setup.build();

        let err = usecase
            .submit_leave_request(
                member,
                membership_id,
                SubmitLeaveRequestModel {
                    start_date: future_day(-1),
                    end_date: future_day(1),
                    reason: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, LeaveError::Invalid(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn approval_extends_subscription_and_consumes_allowance() {
        let mut setup = setup(1);
        let leave = pending_leave(&setup.membership, 2);
        let leave_id = leave.id;
        let expected_end = setup.membership.subscription_end.map(|end| end + Duration::days(2));
        let expected_version = setup.membership.version;
        let found = leave.clone();
        setup
            .leaves
            .expect_find_by_id()
            .with(eq(leave_id))
            .returning(move |_| Ok(Some(found.clone())));
        let mut approved = leave.clone();
        approved.status = LeaveStatus::Approved.to_string();
        setup
            .leaves
            .expect_approve()
            .withf(move |command| {
                command.leave_id == leave_id
                    && command.expected_version == expected_version
                    && command.changes.leave_days_used == Some(3)
                    && command.changes.subscription_end == expected_end
            })
            .times(1)
            .returning(move |_| Ok(ApprovalOutcome::Applied(approved.clone())));

        let owner = setup.owner;
        let usecase = setup.build();
        let result = usecase.approve_leave_request(owner, leave_id).await.unwrap();

        assert_eq!(result.status, Some(LeaveStatus::Approved));
    }

    #[tokio::test]
    async fn approving_settled_leave_is_conflict() {
        let mut setup = setup(0);
        let mut leave = pending_leave(&setup.membership, 1);
        leave.status = LeaveStatus::Rejected.to_string();
        let leave_id = leave.id;
        setup
            .leaves
            .expect_find_by_id()
            .returning(move |_| Ok(Some(leave.clone())));
        setup.leaves.expect_approve().never();

        let owner = setup.owner;
        let usecase = setup.build();
        let err = usecase.approve_leave_request(owner, leave_id).await.unwrap_err();

        assert!(matches!(err, LeaveError::AlreadyProcessed));
    }

    #[tokio::test]
    async fn member_cannot_approve_own_leave() {
        let mut setup = setup(0);
        let leave = pending_leave(&setup.membership, 1);
        let leave_id = leave.id;
        setup
            .leaves
            .expect_find_by_id()
            .returning(move |_| Ok(Some(leave.clone())));

        let member = setup.member;
        let usecase = setup.build();
        let err = usecase.approve_leave_request(member, leave_id).await.unwrap_err();

        assert!(matches!(err, LeaveError::Forbidden));
    }
}
