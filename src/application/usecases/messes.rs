use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    config::config_model::Credits,
    domain::{
        entities::messes::InsertMessEntity,
        repositories::messes::MessRepository,
        value_objects::{
            actors::Actor,
            messes::{MessDto, RegisterMessModel},
        },
    },
};

#[derive(Debug, Error)]
pub enum MessError {
    #[error("only mess owners can register a mess")]
    Forbidden,
    #[error("mess not found")]
    NotFound,
    #[error("invalid mess: {0}")]
    Invalid(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MessError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            MessError::Forbidden => StatusCode::FORBIDDEN,
            MessError::NotFound => StatusCode::NOT_FOUND,
            MessError::Invalid(_) => StatusCode::BAD_REQUEST,
            MessError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, MessError>;

pub struct MessUseCase<M>
where
    M: MessRepository + Send + Sync + 'static,
{
    mess_repository: Arc<M>,
    credits: Credits,
}

impl<M> MessUseCase<M>
where
    M: MessRepository + Send + Sync + 'static,
{
    pub fn new(mess_repository: Arc<M>, credits: Credits) -> Self {
        Self {
            mess_repository,
            credits,
        }
    }

    pub async fn register_mess(
        &self,
        actor: Actor,
        model: RegisterMessModel,
    ) -> UseCaseResult<MessDto> {
        let user_id = actor.user_id;
        info!(%user_id, role = %actor.role, "messes: register requested");

        if !actor.role.can_own_mess() {
            let err = MessError::Forbidden;
            warn!(
                %user_id,
                status = err.status_code().as_u16(),
                "messes: register refused for role"
            );
            return Err(err);
        }

        let name = model.name.trim().to_string();
        if name.is_empty() {
            let err = MessError::Invalid("name is required".to_string());
            warn!(%user_id, status = err.status_code().as_u16(), "messes: empty name");
            return Err(err);
        }

        let mess = self
            .mess_repository
            .register(
                InsertMessEntity {
                    owner_id: user_id,
                    name,
                    address: model.address.filter(|address| !address.trim().is_empty()),
                    is_active: true,
                },
                self.credits.initial_balance,
                self.credits.member_cost,
            )
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "messes: failed to register mess");
                MessError::Internal(err)
            })?;

        info!(
            %user_id,
            mess_id = %mess.id,
            initial_balance = self.credits.initial_balance,
            "messes: mess registered"
        );
        Ok(MessDto::from(mess))
    }

    pub async fn get_mess(&self, mess_id: Uuid) -> UseCaseResult<MessDto> {
        let mess = self
            .mess_repository
            .find_by_id(mess_id)
            .await
            .map_err(|err| {
                error!(%mess_id, db_error = ?err, "messes: failed to load mess");
                MessError::Internal(err)
            })?
            .ok_or(MessError::NotFound)?;

        Ok(MessDto::from(mess))
    }

    pub async fn list_messes(&self) -> UseCaseResult<Vec<MessDto>> {
        let messes = self.mess_repository.list_active().await.map_err(|err| {
            error!(db_error = ?err, "messes: failed to list messes");
            MessError::Internal(err)
        })?;

        Ok(messes.into_iter().map(MessDto::from).collect())
    }
}
