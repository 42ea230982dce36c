//! Guards shared by the join and payment request workflows.

use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{
    application::usecases::mess_access::{self, MessAccessError},
    domain::{
        entities::{
            meal_plans::MealPlanEntity, messes::MessEntity, notifications::NotificationEntity,
        },
        repositories::{
            meal_plans::MealPlanRepository, mess_credits::MessCreditsRepository,
            messes::MessRepository, notifications::NotificationRepository,
        },
        value_objects::{
            actors::Actor,
            approvals::ApprovalOutcome,
            credits::{CreditCharge, has_sufficient_credits},
            enums::{
                notification_statuses::NotificationStatus, notification_types::NotificationType,
            },
        },
    },
};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("request not found")]
    RequestNotFound,
    #[error("notification is not a {0} request")]
    WrongRequestType(NotificationType),
    #[error("request already processed")]
    AlreadyProcessed,
    #[error("only the mess owner or an admin can review this request")]
    Forbidden,
    #[error("mess not found")]
    MessNotFound,
    #[error("request payload is malformed")]
    MalformedRequest,
    #[error("meal plan is not available")]
    PlanUnavailable,
    #[error("insufficient credits")]
    InsufficientCredits,
    #[error("user is already an active member of this mess")]
    AlreadyMember,
    #[error("a request for this mess is already pending")]
    DuplicateRequest,
    #[error("amount {got} does not match the plan price {expected}")]
    AmountMismatch { expected: i32, got: i32 },
    #[error("membership not found")]
    MembershipNotFound,
    #[error("membership has no pending payment request")]
    NoPendingPayment,
    #[error("membership or credits changed concurrently, retry")]
    ConcurrentUpdate,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ReviewError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ReviewError::RequestNotFound
            | ReviewError::MessNotFound
            | ReviewError::MembershipNotFound => StatusCode::NOT_FOUND,
            ReviewError::WrongRequestType(_)
            | ReviewError::MalformedRequest
            | ReviewError::PlanUnavailable
            | ReviewError::AmountMismatch { .. } => StatusCode::BAD_REQUEST,
            ReviewError::AlreadyProcessed
            | ReviewError::AlreadyMember
            | ReviewError::DuplicateRequest
            | ReviewError::NoPendingPayment
            | ReviewError::ConcurrentUpdate => StatusCode::CONFLICT,
            ReviewError::Forbidden => StatusCode::FORBIDDEN,
            ReviewError::InsufficientCredits => StatusCode::PAYMENT_REQUIRED,
            ReviewError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MessAccessError> for ReviewError {
    fn from(err: MessAccessError) -> Self {
        match err {
            MessAccessError::NotFound => ReviewError::MessNotFound,
            MessAccessError::Forbidden => ReviewError::Forbidden,
            MessAccessError::Internal(err) => ReviewError::Internal(err),
        }
    }
}

/// A request notification that is still pending, with the mess it targets.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub notification: NotificationEntity,
    pub mess: MessEntity,
}

/// Checks run in order: existence, type, status, then the actor's rights.
pub async fn load_pending_request<N, M>(
    notification_repository: &N,
    mess_repository: &M,
    actor: &Actor,
    notification_id: Uuid,
    expected: NotificationType,
) -> Result<PendingRequest, ReviewError>
where
    N: NotificationRepository + Send + Sync,
    M: MessRepository + Send + Sync,
{
    let notification = notification_repository
        .find_by_id(notification_id)
        .await
        .map_err(|err| {
            error!(%notification_id, db_error = ?err, "requests: failed to load notification");
            ReviewError::Internal(err)
        })?
        .ok_or(ReviewError::RequestNotFound)?;

    if NotificationType::from_str(&notification.notification_type) != Some(expected) {
        let err = ReviewError::WrongRequestType(expected);
        warn!(
            %notification_id,
            notification_type = %notification.notification_type,
            status = err.status_code().as_u16(),
            "requests: unexpected notification type"
        );
        return Err(err);
    }

    if NotificationStatus::from_str(&notification.status) != Some(NotificationStatus::Pending) {
        let err = ReviewError::AlreadyProcessed;
        warn!(
            %notification_id,
            request_status = %notification.status,
            status = err.status_code().as_u16(),
            "requests: request already processed"
        );
        return Err(err);
    }

    let mess_id = notification.mess_id.ok_or(ReviewError::MalformedRequest)?;
    let mess = mess_access::load_managed_mess(mess_repository, actor, mess_id).await?;

    Ok(PendingRequest { notification, mess })
}

/// The plan must exist, belong to the mess and still be on offer.
pub async fn load_offered_plan<P>(
    meal_plan_repository: &P,
    plan_id: Uuid,
    mess_id: Uuid,
) -> Result<MealPlanEntity, ReviewError>
where
    P: MealPlanRepository + Send + Sync,
{
    let plan = meal_plan_repository
        .find_by_id(plan_id)
        .await
        .map_err(|err| {
            error!(%plan_id, db_error = ?err, "requests: failed to load meal plan");
            ReviewError::Internal(err)
        })?;

    match plan {
        Some(plan) if plan.mess_id == mess_id && plan.is_active => Ok(plan),
        _ => {
            let err = ReviewError::PlanUnavailable;
            warn!(%plan_id, %mess_id, status = err.status_code().as_u16(), "requests: plan unavailable");
            Err(err)
        }
    }
}

/// Reads the balance and prepares the admission charge. `None` when the mess
/// admits members for free.
pub async fn prepare_admission_charge<C>(
    credits_repository: &C,
    mess_id: Uuid,
    charged_by: Uuid,
) -> Result<Option<CreditCharge>, ReviewError>
where
    C: MessCreditsRepository + Send + Sync,
{
    let credits = credits_repository
        .find_by_mess_id(mess_id)
        .await
        .map_err(|err| {
            error!(%mess_id, db_error = ?err, "requests: failed to load credits");
            ReviewError::Internal(err)
        })?;

    let Some(credits) = credits else {
        let err = ReviewError::InsufficientCredits;
        warn!(%mess_id, status = err.status_code().as_u16(), "requests: mess has no credit account");
        return Err(err);
    };

    if !has_sufficient_credits(credits.balance, credits.member_cost) {
        let err = ReviewError::InsufficientCredits;
        warn!(
            %mess_id,
            balance = credits.balance,
            member_cost = credits.member_cost,
            status = err.status_code().as_u16(),
            "requests: insufficient credits"
        );
        return Err(err);
    }

    if credits.member_cost <= 0 {
        return Ok(None);
    }
    Ok(Some(CreditCharge::for_admission(&credits, charged_by)))
}

pub fn settle<T>(outcome: ApprovalOutcome<T>, notification_id: Uuid) -> Result<T, ReviewError> {
    let err = match outcome {
        ApprovalOutcome::Applied(value) => return Ok(value),
        ApprovalOutcome::AlreadyProcessed => ReviewError::AlreadyProcessed,
        ApprovalOutcome::StaleMembership | ApprovalOutcome::CreditsChanged => {
            ReviewError::ConcurrentUpdate
        }
    };

    warn!(
        %notification_id,
        status = err.status_code().as_u16(),
        error = %err,
        "requests: review lost a concurrent update"
    );
    Err(err)
}
