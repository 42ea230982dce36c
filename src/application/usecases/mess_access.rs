use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::{
    entities::messes::MessEntity, repositories::messes::MessRepository,
    value_objects::actors::Actor,
};

/// Why a caller could not act on a mess.
#[derive(Debug)]
pub enum MessAccessError {
    NotFound,
    Forbidden,
    Internal(anyhow::Error),
}

pub async fn load_mess<M>(mess_repository: &M, mess_id: Uuid) -> Result<MessEntity, MessAccessError>
where
    M: MessRepository + Send + Sync,
{
    mess_repository
        .find_by_id(mess_id)
        .await
        .map_err(|err| {
            error!(%mess_id, db_error = ?err, "mess_access: failed to load mess");
            MessAccessError::Internal(err)
        })?
        .ok_or(MessAccessError::NotFound)
}

/// Loads the mess and requires the actor to be its owner or an admin.
pub async fn load_managed_mess<M>(
    mess_repository: &M,
    actor: &Actor,
    mess_id: Uuid,
) -> Result<MessEntity, MessAccessError>
where
    M: MessRepository + Send + Sync,
{
    let mess = load_mess(mess_repository, mess_id).await?;

    if !actor.can_manage(&mess) {
        warn!(
            user_id = %actor.user_id,
            %mess_id,
            status = axum::http::StatusCode::FORBIDDEN.as_u16(),
            "mess_access: actor does not manage mess"
        );
        return Err(MessAccessError::Forbidden);
    }

    Ok(mess)
}
