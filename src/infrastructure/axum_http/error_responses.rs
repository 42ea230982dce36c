use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::application::usecases::{
    credits::CreditError, leave_requests::LeaveError,
    meal_activations::ActivationError, meal_plans::MealPlanError, meals::MealError,
    memberships::MembershipError, messes::MessError, notifications::NotificationError,
    request_reviews::ReviewError, transactions::TransactionError,
};

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PaymentRequired(String),

    #[error("{0}")]
    Gone(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PaymentRequired(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::Gone(_) => StatusCode::GONE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn from_status<E>(status: StatusCode, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let message = err.to_string();
        match status {
            StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
            StatusCode::FORBIDDEN => AppError::Forbidden(message),
            StatusCode::BAD_REQUEST => AppError::BadRequest(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::CONFLICT => AppError::Conflict(message),
            StatusCode::PAYMENT_REQUIRED => AppError::PaymentRequired(message),
            StatusCode::GONE => AppError::Gone(message),
            _ => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Internal(err) => {
                error!(error = ?err, "http: internal error");
                // Don't leak internal error detail to client
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
        });

        (status, body).into_response()
    }
}

macro_rules! from_usecase_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<$error> for AppError {
                fn from(err: $error) -> Self {
                    AppError::from_status(err.status_code(), err)
                }
            }
        )*
    };
}

from_usecase_error!(
    MessError,
    CreditError,
    MealPlanError,
    MealError,
    ReviewError,
    MembershipError,
    LeaveError,
    ActivationError,
    NotificationError,
    TransactionError,
);

macro_rules! from_extractor_rejection {
    ($($rejection:ty => $source:literal),* $(,)?) => {
        $(
            impl From<$rejection> for AppError {
                fn from(rejection: $rejection) -> Self {
                    let message = rejection.body_text();
                    warn!(source = $source, status = rejection.status().as_u16(), %message, "http: request rejected");
                    AppError::BadRequest(message)
                }
            }
        )*
    };
}

from_extractor_rejection!(
    JsonRejection => "body",
    PathRejection => "path",
    QueryRejection => "query",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usecase_errors_keep_their_status() {
        let conflict = AppError::from(ReviewError::AlreadyProcessed);
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let gone = AppError::from(ActivationError::Expired);
        assert_eq!(gone.status_code(), StatusCode::GONE);

        let payment = AppError::from(ReviewError::InsufficientCredits);
        assert_eq!(payment.status_code(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn internal_errors_are_masked() {
        let err = AppError::from(MealError::Internal(anyhow::anyhow!("pool timed out")));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }
}
