use std::sync::Arc;

use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::{
    application::usecases::mess_access::{self, MessAccessError},
    domain::{
        repositories::{messes::MessRepository, transactions::TransactionRepository},
        value_objects::{actors::Actor, transactions::TransactionDto},
    },
};

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("mess not found")]
    MessNotFound,
    #[error("not allowed to view transactions of this mess")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl TransactionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            TransactionError::MessNotFound => StatusCode::NOT_FOUND,
            TransactionError::Forbidden => StatusCode::FORBIDDEN,
            TransactionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MessAccessError> for TransactionError {
    fn from(err: MessAccessError) -> Self {
        match err {
            MessAccessError::NotFound => TransactionError::MessNotFound,
            MessAccessError::Forbidden => TransactionError::Forbidden,
            MessAccessError::Internal(err) => TransactionError::Internal(err),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, TransactionError>;

pub struct TransactionUseCase<M, T>
where
    M: MessRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    mess_repository: Arc<M>,
    transaction_repository: Arc<T>,
}

impl<M, T> TransactionUseCase<M, T>
where
    M: MessRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    pub fn new(mess_repository: Arc<M>, transaction_repository: Arc<T>) -> Self {
        Self {
            mess_repository,
            transaction_repository,
        }
    }

    pub async fn list_my_transactions(&self, actor: Actor) -> UseCaseResult<Vec<TransactionDto>> {
        let user_id = actor.user_id;
        let transactions = self
            .transaction_repository
            .list_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "transactions: failed to list user transactions");
                TransactionError::Internal(err)
            })?;

        Ok(transactions.into_iter().map(TransactionDto::from).collect())
    }

    pub async fn list_mess_transactions(
        &self,
        actor: Actor,
        mess_id: Uuid,
    ) -> UseCaseResult<Vec<TransactionDto>> {
        mess_access::load_managed_mess(self.mess_repository.as_ref(), &actor, mess_id).await?;

        let transactions = self
            .transaction_repository
            .list_by_mess(mess_id)
            .await
            .map_err(|err| {
                error!(%mess_id, db_error = ?err, "transactions: failed to list mess transactions");
                TransactionError::Internal(err)
            })?;

        Ok(transactions.into_iter().map(TransactionDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usecases::fixtures,
        domain::{
            repositories::{
                messes::MockMessRepository, transactions::MockTransactionRepository,
            },
            value_objects::enums::user_roles::UserRole,
        },
    };

    #[tokio::test]
    async fn member_cannot_list_mess_transactions() {
        let mess = fixtures::mess(Uuid::new_v4());
        let mess_id = mess.id;
        let mut messes = MockMessRepository::new();
        messes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mess.clone())));
        let mut transactions = MockTransactionRepository::new();
        transactions.expect_list_by_mess().never();

        let usecase = TransactionUseCase::new(Arc::new(messes), Arc::new(transactions));
        let err = usecase
            .list_mess_transactions(Actor::new(Uuid::new_v4(), UserRole::User), mess_id)
            .await
            .unwrap_err();

        assert!(matches!(err, TransactionError::Forbidden));
    }
}
