use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::mess_access::{self, MessAccessError},
    domain::{
        entities::transactions::InsertTransactionEntity,
        repositories::{mess_credits::MessCreditsRepository, messes::MessRepository},
        value_objects::{
            actors::Actor,
            credits::{
                CreditBalanceDto, CreditLedgerDto, GrantCreditsCommand, GrantCreditsModel,
                REASON_GRANT,
            },
            enums::{
                transaction_statuses::TransactionStatus, transaction_types::TransactionType,
            },
            transactions::generate_transaction_id,
        },
    },
};

const GRANT_GATEWAY: &str = "manual";

#[derive(Debug, Error)]
pub enum CreditError {
    #[error("mess not found")]
    MessNotFound,
    #[error("credit account not found")]
    AccountNotFound,
    #[error("not allowed to manage credits of this mess")]
    Forbidden,
    #[error("only admins can grant credits")]
    AdminOnly,
    #[error("invalid credit amount: {0}")]
    InvalidAmount(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CreditError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CreditError::MessNotFound | CreditError::AccountNotFound => StatusCode::NOT_FOUND,
            CreditError::Forbidden | CreditError::AdminOnly => StatusCode::FORBIDDEN,
            CreditError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            CreditError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MessAccessError> for CreditError {
    fn from(err: MessAccessError) -> Self {
        match err {
            MessAccessError::NotFound => CreditError::MessNotFound,
            MessAccessError::Forbidden => CreditError::Forbidden,
            MessAccessError::Internal(err) => CreditError::Internal(err),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, CreditError>;

pub struct CreditUseCase<M, C>
where
    M: MessRepository + Send + Sync + 'static,
    C: MessCreditsRepository + Send + Sync + 'static,
{
    mess_repository: Arc<M>,
    credits_repository: Arc<C>,
}

impl<M, C> CreditUseCase<M, C>
where
    M: MessRepository + Send + Sync + 'static,
    C: MessCreditsRepository + Send + Sync + 'static,
{
    pub fn new(mess_repository: Arc<M>, credits_repository: Arc<C>) -> Self {
        Self {
            mess_repository,
            credits_repository,
        }
    }

    pub async fn get_balance(&self, actor: Actor, mess_id: Uuid) -> UseCaseResult<CreditBalanceDto> {
        mess_access::load_managed_mess(self.mess_repository.as_ref(), &actor, mess_id).await?;

        let credits = self
            .credits_repository
            .find_by_mess_id(mess_id)
            .await
            .map_err(|err| {
                error!(%mess_id, db_error = ?err, "credits: failed to load balance");
                CreditError::Internal(err)
            })?
            .ok_or(CreditError::AccountNotFound)?;

        Ok(CreditBalanceDto::from(credits))
    }

    pub async fn grant_credits(
        &self,
        actor: Actor,
        mess_id: Uuid,
        model: GrantCreditsModel,
    ) -> UseCaseResult<CreditBalanceDto> {
        let user_id = actor.user_id;
        info!(%user_id, %mess_id, amount = model.amount, "credits: grant requested");

        if !actor.is_admin() {
            let err = CreditError::AdminOnly;
            warn!(%user_id, status = err.status_code().as_u16(), "credits: grant refused");
            return Err(err);
        }
        if model.amount <= 0 {
            let err = CreditError::InvalidAmount("amount must be positive".to_string());
            warn!(%user_id, status = err.status_code().as_u16(), "credits: non-positive grant");
            return Err(err);
        }
        if model.price_minor < 0 {
            let err = CreditError::InvalidAmount("price must not be negative".to_string());
            warn!(%user_id, status = err.status_code().as_u16(), "credits: negative price");
            return Err(err);
        }

        let mess = mess_access::load_mess(self.mess_repository.as_ref(), mess_id).await?;
        let current = self
            .credits_repository
            .find_by_mess_id(mess_id)
            .await
            .map_err(|err| {
                error!(%mess_id, db_error = ?err, "credits: failed to load balance");
                CreditError::Internal(err)
            })?
            .ok_or(CreditError::AccountNotFound)?;
        if current.balance.checked_add(model.amount).is_none() {
            let err = CreditError::InvalidAmount("balance would exceed its limit".to_string());
            warn!(%user_id, %mess_id, balance = current.balance, status = err.status_code().as_u16(), "credits: grant too large");
            return Err(err);
        }

        let reason = model
            .reason
            .filter(|reason| !reason.trim().is_empty())
            .unwrap_or_else(|| REASON_GRANT.to_string());

        let command = GrantCreditsCommand {
            mess_id,
            amount: model.amount,
            reason,
            granted_by: user_id,
            transaction: InsertTransactionEntity {
                transaction_id: generate_transaction_id(Utc::now()),
                user_id: mess.owner_id,
                mess_id,
                membership_id: None,
                transaction_type: TransactionType::CreditGrant.to_string(),
                amount_minor: model.price_minor,
                status: TransactionStatus::Success.to_string(),
                gateway: GRANT_GATEWAY.to_string(),
                gateway_ref: None,
                description: Some(format!("{} credits granted", model.amount)),
            },
        };

        let credits = self
            .credits_repository
            .grant(command)
            .await
            .map_err(|err| {
                error!(%user_id, %mess_id, db_error = ?err, "credits: failed to grant credits");
                CreditError::Internal(err)
            })?;

        info!(
            %user_id,
            %mess_id,
            balance = credits.balance,
            "credits: credits granted"
        );
        Ok(CreditBalanceDto::from(credits))
    }

    pub async fn list_ledger(
        &self,
        actor: Actor,
        mess_id: Uuid,
    ) -> UseCaseResult<Vec<CreditLedgerDto>> {
        mess_access::load_managed_mess(self.mess_repository.as_ref(), &actor, mess_id).await?;

        let ledger = self
            .credits_repository
            .list_ledger(mess_id)
            .await
            .map_err(|err| {
                error!(%mess_id, db_error = ?err, "credits: failed to list ledger");
                CreditError::Internal(err)
            })?;

        Ok(ledger.into_iter().map(CreditLedgerDto::from).collect())
    }
}
