use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::mess_access::{self, MessAccessError},
    domain::{
        entities::meal_activations::{InsertMealActivationEntity, MealActivationEntity},
        repositories::{
            leave_requests::LeaveRequestRepository, meal_activations::MealActivationRepository,
            meals::MealRepository, memberships::MembershipRepository, messes::MessRepository,
        },
        value_objects::{
            actors::Actor,
            enums::{activation_methods::ActivationMethod, activation_statuses::ActivationStatus},
            meal_activations::{
                ActivationCheck, ActivationStamp, ListActivationsFilter, MealActivationDto,
                MessActivationsFilter, evaluate_activation, expiry_for, generate_activation_code,
                is_well_formed_code,
            },
            memberships::covers_date,
        },
    },
};

const CODE_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("meal not found")]
    MealNotFound,
    #[error("activation code not found")]
    CodeNotFound,
    #[error("mess not found")]
    MessNotFound,
    #[error("no paid subscription covers this meal")]
    NotSubscribed,
    #[error("not allowed to activate this code")]
    Forbidden,
    #[error("member is on approved leave that day")]
    OnLeave,
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("code already activated")]
    AlreadyActivated,
    #[error("code expired")]
    Expired,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ActivationError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ActivationError::MealNotFound
            | ActivationError::CodeNotFound
            | ActivationError::MessNotFound => StatusCode::NOT_FOUND,
            ActivationError::NotSubscribed | ActivationError::Forbidden => StatusCode::FORBIDDEN,
            ActivationError::OnLeave | ActivationError::Invalid(_) => StatusCode::BAD_REQUEST,
            ActivationError::AlreadyActivated => StatusCode::CONFLICT,
            ActivationError::Expired => StatusCode::GONE,
            ActivationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MessAccessError> for ActivationError {
    fn from(err: MessAccessError) -> Self {
        match err {
            MessAccessError::NotFound => ActivationError::MessNotFound,
            MessAccessError::Forbidden => ActivationError::Forbidden,
            MessAccessError::Internal(err) => ActivationError::Internal(err),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ActivationError>;

pub struct MealActivationUseCase<M, Ml, Ms, L, A>
where
    M: MessRepository + Send + Sync + 'static,
    Ml: MealRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
    L: LeaveRequestRepository + Send + Sync + 'static,
    A: MealActivationRepository + Send + Sync + 'static,
{
    mess_repository: Arc<M>,
    meal_repository: Arc<Ml>,
    membership_repository: Arc<Ms>,
    leave_repository: Arc<L>,
    activation_repository: Arc<A>,
}

impl<M, Ml, Ms, L, A> MealActivationUseCase<M, Ml, Ms, L, A>
where
    M: MessRepository + Send + Sync + 'static,
    Ml: MealRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
    L: LeaveRequestRepository + Send + Sync + 'static,
    A: MealActivationRepository + Send + Sync + 'static,
{
    pub fn new(
        mess_repository: Arc<M>,
        meal_repository: Arc<Ml>,
        membership_repository: Arc<Ms>,
        leave_repository: Arc<L>,
        activation_repository: Arc<A>,
    ) -> Self {
        Self {
            mess_repository,
            meal_repository,
            membership_repository,
            leave_repository,
            activation_repository,
        }
    }

    /// Returns the member's code for the meal, creating it on first call.
    pub async fn generate_code(&self, actor: Actor, meal_id: Uuid) -> UseCaseResult<MealActivationDto> {
        let user_id = actor.user_id;
        info!(%user_id, %meal_id, "meal_activations: code requested");

        let meal = self
            .meal_repository
            .find_by_id(meal_id)
            .await
            .map_err(|err| {
                error!(%meal_id, db_error = ?err, "meal_activations: failed to load meal");
                ActivationError::Internal(err)
            })?
            .ok_or(ActivationError::MealNotFound)?;
        let date = meal.served_on;

        let membership = self
            .membership_repository
            .find_by_user_and_mess(user_id, meal.mess_id)
            .await
            .map_err(|err| {
                error!(%user_id, mess_id = %meal.mess_id, db_error = ?err, "meal_activations: failed to load membership");
                ActivationError::Internal(err)
            })?
            .filter(|membership| covers_date(membership, date))
            .ok_or_else(|| {
                let err = ActivationError::NotSubscribed;
                warn!(%user_id, %meal_id, %date, status = err.status_code().as_u16(), "meal_activations: no covering subscription");
                err
            })?;

        let on_leave = self
            .leave_repository
            .has_approved_leave_on(membership.id, date)
            .await
            .map_err(|err| {
                error!(membership_id = %membership.id, db_error = ?err, "meal_activations: failed to check leave");
                ActivationError::Internal(err)
            })?;
        if on_leave {
            let err = ActivationError::OnLeave;
            warn!(%user_id, %meal_id, %date, status = err.status_code().as_u16(), "meal_activations: member on leave");
            return Err(err);
        }

        if let Some(existing) = self.find_existing(user_id, meal_id, date).await? {
            return self.reuse(existing).await;
        }

        let expires_at = expiry_for(date);
        if Utc::now() > expires_at {
            return Err(ActivationError::Expired);
        }

        for _ in 0..CODE_ATTEMPTS {
            let created = self
                .activation_repository
                .create(InsertMealActivationEntity {
                    code: generate_activation_code(),
                    user_id,
                    mess_id: meal.mess_id,
                    meal_id,
                    membership_id: membership.id,
                    activation_date: date,
                    status: ActivationStatus::Generated.to_string(),
                    expires_at,
                })
                .await
                .map_err(|err| {
                    error!(%user_id, %meal_id, db_error = ?err, "meal_activations: failed to store code");
                    ActivationError::Internal(err)
                })?;

            if let Some(activation) = created {
                info!(%user_id, %meal_id, activation_id = %activation.id, "meal_activations: code generated");
                return Ok(MealActivationDto::from(activation));
            }

            // Either a concurrent call created the row or the code collided.
            if let Some(existing) = self.find_existing(user_id, meal_id, date).await? {
                return self.reuse(existing).await;
            }
        }

        Err(ActivationError::Internal(anyhow::anyhow!(
            "could not allocate a unique activation code"
        )))
    }

    pub async fn activate_code(&self, actor: Actor, code: &str) -> UseCaseResult<MealActivationDto> {
        let code = code.trim().to_ascii_uppercase();
        if !is_well_formed_code(&code) {
            return Err(ActivationError::Invalid("malformed activation code".to_string()));
        }

        let activation = self.find_by_code(&code).await?;
        let activation_id = activation.id;

        let method = if activation.user_id == actor.user_id {
            ActivationMethod::Subscriber
        } else {
            mess_access::load_managed_mess(self.mess_repository.as_ref(), &actor, activation.mess_id)
                .await?;
            ActivationMethod::Owner
        };

        let now = Utc::now();
        self.ensure_ready(&activation, now).await?;

        let stamp = ActivationStamp {
            activated_at: now,
            activated_by: actor.user_id,
            method,
        };
        let activated = self
            .activation_repository
            .activate(activation_id, stamp)
            .await
            .map_err(|err| {
                error!(%activation_id, db_error = ?err, "meal_activations: failed to activate");
                ActivationError::Internal(err)
            })?;

        match activated {
            Some(activation) => {
                info!(
                    %activation_id,
                    activated_by = %actor.user_id,
                    %method,
                    "meal_activations: code activated"
                );
                Ok(MealActivationDto::from(activation))
            }
            None => {
                // Lost the guarded update; report what the row became.
                let current = self.find_by_code(&code).await?;
                match evaluate_activation(&current, Utc::now()) {
                    ActivationCheck::AlreadyActivated => Err(ActivationError::AlreadyActivated),
                    _ => Err(ActivationError::Expired),
                }
            }
        }
    }

    pub async fn list_my_activations(
        &self,
        actor: Actor,
        filter: ListActivationsFilter,
    ) -> UseCaseResult<Vec<MealActivationDto>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(ActivationError::Invalid("from must not be after to".to_string()));
            }
        }

        let user_id = actor.user_id;
        let activations = self
            .activation_repository
            .list_by_user(user_id, filter)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "meal_activations: failed to list user activations");
                ActivationError::Internal(err)
            })?;

        Ok(activations.into_iter().map(MealActivationDto::from).collect())
    }

    pub async fn list_mess_activations(
        &self,
        actor: Actor,
        mess_id: Uuid,
        filter: MessActivationsFilter,
    ) -> UseCaseResult<Vec<MealActivationDto>> {
        mess_access::load_managed_mess(self.mess_repository.as_ref(), &actor, mess_id).await?;

        let activations = self
            .activation_repository
            .list_by_mess(mess_id, filter.date)
            .await
            .map_err(|err| {
                error!(%mess_id, db_error = ?err, "meal_activations: failed to list mess activations");
                ActivationError::Internal(err)
            })?;

        Ok(activations.into_iter().map(MealActivationDto::from).collect())
    }

    async fn find_existing(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        date: chrono::NaiveDate,
    ) -> UseCaseResult<Option<MealActivationEntity>> {
        self.activation_repository
            .find_for_user_meal(user_id, meal_id, date)
            .await
            .map_err(|err| {
                error!(%user_id, %meal_id, db_error = ?err, "meal_activations: failed to load existing code");
                ActivationError::Internal(err)
            })
    }

    async fn find_by_code(&self, code: &str) -> UseCaseResult<MealActivationEntity> {
        self.activation_repository
            .find_by_code(code.to_string())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "meal_activations: failed to load code");
                ActivationError::Internal(err)
            })?
            .ok_or(ActivationError::CodeNotFound)
    }

    async fn reuse(&self, existing: MealActivationEntity) -> UseCaseResult<MealActivationDto> {
        self.ensure_ready(&existing, Utc::now()).await?;
        info!(activation_id = %existing.id, "meal_activations: returning existing code");
        Ok(MealActivationDto::from(existing))
    }

    /// Maps the row's state to an error unless it can still be activated.
    /// A `generated` row past its expiry is persisted as `expired`.
    async fn ensure_ready(
        &self,
        activation: &MealActivationEntity,
        now: chrono::DateTime<Utc>,
    ) -> UseCaseResult<()> {
        let activation_id = activation.id;
        match evaluate_activation(activation, now) {
            ActivationCheck::Ready => Ok(()),
            ActivationCheck::AlreadyActivated => {
                let err = ActivationError::AlreadyActivated;
                warn!(%activation_id, status = err.status_code().as_u16(), "meal_activations: code already activated");
                Err(err)
            }
            ActivationCheck::Expired { persist } => {
                if persist {
                    if let Err(err) = self.activation_repository.expire(activation_id).await {
                        error!(%activation_id, db_error = ?err, "meal_activations: failed to persist expiry");
                    }
                }
                let err = ActivationError::Expired;
                warn!(%activation_id, status = err.status_code().as_u16(), "meal_activations: code expired");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usecases::fixtures,
        domain::{
            entities::{meals::MealEntity, memberships::MembershipEntity, messes::MessEntity},
            repositories::{
                leave_requests::MockLeaveRequestRepository,
                meal_activations::MockMealActivationRepository, meals::MockMealRepository,
                memberships::MockMembershipRepository, messes::MockMessRepository,
            },
            value_objects::enums::user_roles::UserRole,
        },
    };
    use chrono::Duration;
    use mockall::predicate::eq;

    const CODE: &str = "SM-7KQ2M9XAB3CD";

    #[derive(Default)]
    struct Mocks {
        messes: MockMessRepository,
        meals: MockMealRepository,
        memberships: MockMembershipRepository,
        leaves: MockLeaveRequestRepository,
        activations: MockMealActivationRepository,
    }

    impl Mocks {
        fn build(
            self,
        ) -> MealActivationUseCase<
            MockMessRepository,
            MockMealRepository,
            MockMembershipRepository,
            MockLeaveRequestRepository,
            MockMealActivationRepository,
        > {
            MealActivationUseCase::new(
                Arc::new(self.messes),
                Arc::new(self.meals),
                Arc::new(self.memberships),
                Arc::new(self.leaves),
                Arc::new(self.activations),
            )
        }
    }

    struct World {
        member: Actor,
        mess: MessEntity,
        meal: MealEntity,
        membership: MembershipEntity,
    }

    fn world() -> World {
        let member = Actor::new(Uuid::new_v4(), UserRole::User);
        let mess = fixtures::mess(Uuid::new_v4());
        let meal = fixtures::meal(mess.id, Utc::now().date_naive());
        let membership = fixtures::paid_membership(member.user_id, mess.id, Uuid::new_v4());
        World {
            member,
            mess,
            meal,
            membership,
        }
    }

    fn subscribed_mocks(world: &World) -> Mocks {
        let mut mocks = Mocks::default();
        let meal = world.meal.clone();
        mocks
            .meals
            .expect_find_by_id()
            .with(eq(meal.id))
            .returning(move |_| Ok(Some(meal.clone())));
        let membership = world.membership.clone();
        mocks
            .memberships
            .expect_find_by_user_and_mess()
            .with(eq(world.member.user_id), eq(world.mess.id))
            .returning(move |_, _| Ok(Some(membership.clone())));
        mocks
            .leaves
            .expect_has_approved_leave_on()
            .returning(|_, _| Ok(false));
        mocks
    }

    #[tokio::test]
    async fn generate_creates_code_for_covered_meal() {
        let world = world();
        let mut mocks = subscribed_mocks(&world);
        mocks
            .activations
            .expect_find_for_user_meal()
            .returning(|_, _, _| Ok(None));
        let membership = world.membership.clone();
        let meal = world.meal.clone();
        mocks
            .activations
            .expect_create()
            .withf(|insert| {
                is_well_formed_code(&insert.code)
                    && insert.status == "generated"
                    && insert.expires_at == expiry_for(insert.activation_date)
            })
            .times(1)
            .returning(move |insert| {
                Ok(Some(fixtures::activation(
                    &membership,
                    &meal,
                    &insert.code,
                    ActivationStatus::Generated,
                )))
            });

        let usecase = mocks.build();
        let activation = usecase
            .generate_code(world.member, world.meal.id)
            .await
            .unwrap();

        assert!(activation.code.starts_with("SM-"));
        assert_eq!(activation.status, Some(ActivationStatus::Generated));
    }

    #[tokio::test]
    async fn generate_returns_existing_code() {
        let world = world();
        let mut mocks = subscribed_mocks(&world);
        let existing =
            fixtures::activation(&world.membership, &world.meal, CODE, ActivationStatus::Generated);
        mocks
            .activations
            .expect_find_for_user_meal()
            .returning(move |_, _, _| Ok(Some(existing.clone())));
        mocks.activations.expect_create().never();

        let usecase = mocks.build();
        let activation = usecase
            .generate_code(world.member, world.meal.id)
            .await
            .unwrap();

        assert_eq!(activation.code, CODE);
    }

    #[tokio::test]
    async fn generate_after_activation_is_conflict() {
        let world = world();
        let mut mocks = subscribed_mocks(&world);
        let existing =
            fixtures::activation(&world.membership, &world.meal, CODE, ActivationStatus::Activated);
        mocks
            .activations
            .expect_find_for_user_meal()
            .returning(move |_, _, _| Ok(Some(existing.clone())));

        let usecase = mocks.build();
        let err = usecase
            .generate_code(world.member, world.meal.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ActivationError::AlreadyActivated));
    }

    #[tokio::test]
    async fn unpaid_member_cannot_generate() {
        let mut world = world();
        world.membership.payment_status = "pending".to_string();
        let mocks = subscribed_mocks(&world);

        let usecase = mocks.build();
        let err = usecase
            .generate_code(world.member, world.meal.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ActivationError::NotSubscribed));
    }

    #[tokio::test]
    async fn leave_day_blocks_generation() {
        let world = world();
        let mut mocks = Mocks::default();
        let meal = world.meal.clone();
        mocks
            .meals
            .expect_find_by_id()
            .returning(move |_| Ok(Some(meal.clone())));
        let membership = world.membership.clone();
        mocks
            .memberships
            .expect_find_by_user_and_mess()
            .returning(move |_, _| Ok(Some(membership.clone())));
        mocks
            .leaves
            .expect_has_approved_leave_on()
            .with(eq(world.membership.id), eq(world.meal.served_on))
            .returning(|_, _| Ok(true));

        let usecase = mocks.build();
        let err = usecase
            .generate_code(world.member, world.meal.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ActivationError::OnLeave));
    }

    #[tokio::test]
    async fn subscriber_activates_own_code() {
        let world = world();
        let mut mocks = Mocks::default();
        let activation =
            fixtures::activation(&world.membership, &world.meal, CODE, ActivationStatus::Generated);
        let activation_id = activation.id;
        let found = activation.clone();
        mocks
            .activations
            .expect_find_by_code()
            .with(eq(CODE.to_string()))
            .returning(move |_| Ok(Some(found.clone())));
        let member_id = world.member.user_id;
        mocks
            .activations
            .expect_activate()
            .withf(move |id, stamp| {
                *id == activation_id
                    && stamp.activated_by == member_id
                    && stamp.method == ActivationMethod::Subscriber
            })
            .times(1)
            .returning(move |_, stamp| {
                let mut activated = activation.clone();
                activated.status = ActivationStatus::Activated.to_string();
                activated.activated_at = Some(stamp.activated_at);
                activated.activated_by = Some(stamp.activated_by);
                activated.activation_method = Some(stamp.method.to_string());
                Ok(Some(activated))
            });

        let usecase = mocks.build();
        let result = usecase
            .activate_code(world.member, " sm-7kq2m9xab3cd ")
            .await
            .unwrap();

        assert_eq!(result.status, Some(ActivationStatus::Activated));
        assert_eq!(result.activation_method, Some(ActivationMethod::Subscriber));
    }

    #[tokio::test]
    async fn owner_activation_is_recorded_as_owner() {
        let world = world();
        let owner = Actor::new(world.mess.owner_id, UserRole::MessOwner);
        let mut mocks = Mocks::default();
        let activation =
            fixtures::activation(&world.membership, &world.meal, CODE, ActivationStatus::Generated);
        let found = activation.clone();
        mocks
            .activations
            .expect_find_by_code()
            .returning(move |_| Ok(Some(found.clone())));
        let mess = world.mess.clone();
        mocks
            .messes
            .expect_find_by_id()
            .with(eq(mess.id))
            .returning(move |_| Ok(Some(mess.clone())));
        mocks
            .activations
            .expect_activate()
            .withf(|_, stamp| stamp.method == ActivationMethod::Owner)
            .times(1)
            .returning(move |_, _| Ok(Some(activation.clone())));

        let usecase = mocks.build();
        usecase.activate_code(owner, CODE).await.unwrap();
    }

    #[tokio::test]
    async fn stranger_cannot_activate() {
        let world = world();
        let mut mocks = Mocks::default();
        let activation =
            fixtures::activation(&world.membership, &world.meal, CODE, ActivationStatus::Generated);
        mocks
            .activations
            .expect_find_by_code()
            .returning(move |_| Ok(Some(activation.clone())));
        let mess = world.mess.clone();
        mocks
            .messes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mess.clone())));
        mocks.activations.expect_activate().never();

        let usecase = mocks.build();
        let err = usecase
            .activate_code(Actor::new(Uuid::new_v4(), UserRole::MessOwner), CODE)
            .await
            .unwrap_err();

        assert!(matches!(err, ActivationError::Forbidden));
    }

    #[tokio::test]
    async fn overdue_code_is_expired_and_persisted() {
        let world = world();
        let mut mocks = Mocks::default();
        let mut activation =
            fixtures::activation(&world.membership, &world.meal, CODE, ActivationStatus::Generated);
        activation.expires_at = Utc::now() - Duration::minutes(5);
        let activation_id = activation.id;
        mocks
            .activations
            .expect_find_by_code()
            .returning(move |_| Ok(Some(activation.clone())));
        mocks
            .activations
            .expect_expire()
            .with(eq(activation_id))
            .times(1)
            .returning(|_| Ok(true));
        mocks.activations.expect_activate().never();

        let usecase = mocks.build();
        let err = usecase.activate_code(world.member, CODE).await.unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::GONE);
    }

    #[tokio::test]
    async fn second_activation_is_conflict() {
        let world = world();
        let mut mocks = Mocks::default();
        let activation =
            fixtures::activation(&world.membership, &world.meal, CODE, ActivationStatus::Activated);
        mocks
            .activations
            .expect_find_by_code()
            .returning(move |_| Ok(Some(activation.clone())));
        mocks.activations.expect_activate().never();

        let usecase = mocks.build();
        let err = usecase.activate_code(world.member, CODE).await.unwrap_err();

        assert!(matches!(err, ActivationError::AlreadyActivated));
    }

    #[tokio::test]
    async fn lost_race_reports_activated() {
        let world = world();
        let mut mocks = Mocks::default();
        let generated =
            fixtures::activation(&world.membership, &world.meal, CODE, ActivationStatus::Generated);
        let mut activated = generated.clone();
        activated.status = ActivationStatus::Activated.to_string();
        let mut lookups = mockall::Sequence::new();
        mocks
            .activations
            .expect_find_by_code()
            .times(1)
            .in_sequence(&mut lookups)
            .returning(move |_| Ok(Some(generated.clone())));
        mocks
            .activations
            .expect_find_by_code()
            .times(1)
            .in_sequence(&mut lookups)
            .returning(move |_| Ok(Some(activated.clone())));
        mocks
            .activations
            .expect_activate()
            .returning(|_, _| Ok(None));

        let usecase = mocks.build();
        let err = usecase.activate_code(world.member, CODE).await.unwrap_err();

        assert!(matches!(err, ActivationError::AlreadyActivated));
    }
}
