use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::mess_access::{self, MessAccessError},
    domain::{
        entities::{memberships::MembershipEntity, messes::MessEntity},
        repositories::{memberships::MembershipRepository, messes::MessRepository},
        value_objects::{
            actors::Actor,
            enums::membership_statuses::MembershipStatus,
            memberships::{MembershipDto, MembershipPaymentDto},
        },
    },
};

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("membership not found")]
    NotFound,
    #[error("mess not found")]
    MessNotFound,
    #[error("not allowed to access this membership")]
    Forbidden,
    #[error("membership is already inactive")]
    AlreadyInactive,
    #[error("membership changed concurrently, retry")]
    ConcurrentUpdate,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MembershipError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            MembershipError::NotFound | MembershipError::MessNotFound => StatusCode::NOT_FOUND,
            MembershipError::Forbidden => StatusCode::FORBIDDEN,
            MembershipError::AlreadyInactive | MembershipError::ConcurrentUpdate => {
                StatusCode::CONFLICT
            }
            MembershipError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MessAccessError> for MembershipError {
    fn from(err: MessAccessError) -> Self {
        match err {
            MessAccessError::NotFound => MembershipError::MessNotFound,
            MessAccessError::Forbidden => MembershipError::Forbidden,
            MessAccessError::Internal(err) => MembershipError::Internal(err),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, MembershipError>;

pub struct MembershipUseCase<M, Ms>
where
    M: MessRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
{
    mess_repository: Arc<M>,
    membership_repository: Arc<Ms>,
}

impl<M, Ms> MembershipUseCase<M, Ms>
where
    M: MessRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
{
    pub fn new(mess_repository: Arc<M>, membership_repository: Arc<Ms>) -> Self {
        Self {
            mess_repository,
            membership_repository,
        }
    }

    pub async fn list_my_memberships(&self, actor: Actor) -> UseCaseResult<Vec<MembershipDto>> {
        let user_id = actor.user_id;
        let memberships = self
            .membership_repository
            .list_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "memberships: failed to list user memberships");
                MembershipError::Internal(err)
            })?;

        Ok(memberships.into_iter().map(MembershipDto::from).collect())
    }

    pub async fn list_mess_members(
        &self,
        actor: Actor,
        mess_id: Uuid,
    ) -> UseCaseResult<Vec<MembershipDto>> {
        mess_access::load_managed_mess(self.mess_repository.as_ref(), &actor, mess_id).await?;

        let memberships = self
            .membership_repository
            .list_by_mess(mess_id)
            .await
            .map_err(|err| {
                error!(%mess_id, db_error = ?err, "memberships: failed to list mess members");
                MembershipError::Internal(err)
            })?;

        info!(%mess_id, count = memberships.len(), "memberships: listed mess members");
        Ok(memberships.into_iter().map(MembershipDto::from).collect())
    }

    pub async fn get_membership(&self, actor: Actor, membership_id: Uuid) -> UseCaseResult<MembershipDto> {
        let (membership, _) = self.load_visible(&actor, membership_id).await?;
        Ok(MembershipDto::from(membership))
    }

    /// Soft transition to `inactive`; rows are never deleted.
    pub async fn cancel_membership(
        &self,
        actor: Actor,
        membership_id: Uuid,
    ) -> UseCaseResult<MembershipDto> {
        let user_id = actor.user_id;
        info!(%user_id, %membership_id, "memberships: cancel requested");

        let (membership, _) = self.load_visible(&actor, membership_id).await?;
        if MembershipStatus::from_str(&membership.status) == Some(MembershipStatus::Inactive) {
            let err = MembershipError::AlreadyInactive;
            warn!(%membership_id, status = err.status_code().as_u16(), "memberships: already inactive");
            return Err(err);
        }

        let cancelled = self
            .membership_repository
            .cancel(membership_id, membership.version)
            .await
            .map_err(|err| {
                error!(%membership_id, db_error = ?err, "memberships: failed to cancel membership");
                MembershipError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%membership_id, "memberships: version moved during cancel");
                MembershipError::ConcurrentUpdate
            })?;

        info!(%user_id, %membership_id, "memberships: membership cancelled");
        Ok(MembershipDto::from(cancelled))
    }

    pub async fn list_payment_history(
        &self,
        actor: Actor,
        membership_id: Uuid,
    ) -> UseCaseResult<Vec<MembershipPaymentDto>> {
        self.load_visible(&actor, membership_id).await?;

        let payments = self
            .membership_repository
            .list_payments(membership_id)
            .await
            .map_err(|err| {
                error!(%membership_id, db_error = ?err, "memberships: failed to list payments");
                MembershipError::Internal(err)
            })?;

        Ok(payments.into_iter().map(MembershipPaymentDto::from).collect())
    }

    async fn load_visible(
        &self,
        actor: &Actor,
        membership_id: Uuid,
    ) -> UseCaseResult<(MembershipEntity, MessEntity)> {
        let membership = self
            .membership_repository
            .find_by_id(membership_id)
            .await
            .map_err(|err| {
                error!(%membership_id, db_error = ?err, "memberships: failed to load membership");
                MembershipError::Internal(err)
            })?
            .ok_or(MembershipError::NotFound)?;

        let mess = mess_access::load_mess(self.mess_repository.as_ref(), membership.mess_id).await?;
        if !actor.can_view_membership(&membership, &mess) {
            let err = MembershipError::Forbidden;
            warn!(
                user_id = %actor.user_id,
                %membership_id,
                status = err.status_code().as_u16(),
                "memberships: access denied"
            );
            return Err(err);
        }

        Ok((membership, mess))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usecases::fixtures,
        domain::{
            repositories::{memberships::MockMembershipRepository, messes::MockMessRepository},
            value_objects::enums::user_roles::UserRole,
        },
    };
    use mockall::predicate::eq;

    fn setup() -> (Actor, MessEntity, MembershipEntity) {
        let member = Actor::new(Uuid::new_v4(), UserRole::User);
        let mess = fixtures::mess(Uuid::new_v4());
        let membership = fixtures::paid_membership(member.user_id, mess.id, Uuid::new_v4());
        (member, mess, membership)
    }

    fn repositories(
        mess: &MessEntity,
        membership: &MembershipEntity,
    ) -> (MockMessRepository, MockMembershipRepository) {
        let mut messes = MockMessRepository::new();
        let mess = mess.clone();
        messes
            .expect_find_by_id()
            .with(eq(mess.id))
            .returning(move |_| Ok(Some(mess.clone())));

        let mut memberships = MockMembershipRepository::new();
        let membership = membership.clone();
        memberships
            .expect_find_by_id()
            .with(eq(membership.id))
            .returning(move |_| Ok(Some(membership.clone())));

        (messes, memberships)
    }

    #[tokio::test]
    async fn member_cancels_own_membership() {
        let (member, mess, membership) = setup();
        let (messes, mut memberships) = repositories(&mess, &membership);
        let mut cancelled = membership.clone();
        cancelled.status = MembershipStatus::Inactive.to_string();
        memberships
            .expect_cancel()
            .with(eq(membership.id), eq(membership.version))
            .times(1)
            .returning(move |_, _| Ok(Some(cancelled.clone())));

        let usecase = MembershipUseCase::new(Arc::new(messes), Arc::new(memberships));
        let result = usecase.cancel_membership(member, membership.id).await.unwrap();

        assert_eq!(result.status, Some(MembershipStatus::Inactive));
    }

    #[tokio::test]
    async fn cancelling_inactive_membership_is_conflict() {
        let (member, mess, mut membership) = setup();
        membership.status = MembershipStatus::Inactive.to_string();
        let (messes, mut memberships) = repositories(&mess, &membership);
        memberships.expect_cancel().never();

        let usecase = MembershipUseCase::new(Arc::new(messes), Arc::new(memberships));
        let err = usecase.cancel_membership(member, membership.id).await.unwrap_err();

        assert!(matches!(err, MembershipError::AlreadyInactive));
    }

    #[tokio::test]
    async fn stranger_cannot_read_membership() {
        let (_, mess, membership) = setup();
        let (messes, memberships) = repositories(&mess, &membership);

        let usecase = MembershipUseCase::new(Arc::new(messes), Arc::new(memberships));
        let err = usecase
            .get_membership(Actor::new(Uuid::new_v4(), UserRole::User), membership.id)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn owner_reads_member_payment_history() {
        let (_, mess, membership) = setup();
        let owner = Actor::new(mess.owner_id, UserRole::MessOwner);
        let (messes, mut memberships) = repositories(&mess, &membership);
        memberships
            .expect_list_payments()
            .with(eq(membership.id))
            .returning(|_| Ok(vec![]));

        let usecase = MembershipUseCase::new(Arc::new(messes), Arc::new(memberships));
        let payments = usecase.list_payment_history(owner, membership.id).await.unwrap();

        assert!(payments.is_empty());
    }
}
