use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::mess_access::{self, MessAccessError},
    domain::{
        entities::meal_plans::{InsertMealPlanEntity, MealPlanEntity, UpdateMealPlanEntity},
        repositories::{meal_plans::MealPlanRepository, messes::MessRepository},
        value_objects::{
            actors::Actor,
            meal_plans::{CreateMealPlanModel, MealPlanDto, PlanTerms, UpdateMealPlanModel},
        },
    },
};

#[derive(Debug, Error)]
pub enum MealPlanError {
    #[error("mess not found")]
    MessNotFound,
    #[error("meal plan not found")]
    PlanNotFound,
    #[error("not allowed to manage meal plans of this mess")]
    Forbidden,
    #[error("invalid meal plan: {0}")]
    Invalid(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MealPlanError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            MealPlanError::MessNotFound | MealPlanError::PlanNotFound => StatusCode::NOT_FOUND,
            MealPlanError::Forbidden => StatusCode::FORBIDDEN,
            MealPlanError::Invalid(_) => StatusCode::BAD_REQUEST,
            MealPlanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MessAccessError> for MealPlanError {
    fn from(err: MessAccessError) -> Self {
        match err {
            MessAccessError::NotFound => MealPlanError::MessNotFound,
            MessAccessError::Forbidden => MealPlanError::Forbidden,
            MessAccessError::Internal(err) => MealPlanError::Internal(err),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, MealPlanError>;

pub struct MealPlanUseCase<M, P>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
{
    mess_repository: Arc<M>,
    meal_plan_repository: Arc<P>,
}

impl<M, P> MealPlanUseCase<M, P>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
{
    pub fn new(mess_repository: Arc<M>, meal_plan_repository: Arc<P>) -> Self {
        Self {
            mess_repository,
            meal_plan_repository,
        }
    }

    pub async fn create_meal_plan(
        &self,
        actor: Actor,
        mess_id: Uuid,
        model: CreateMealPlanModel,
    ) -> UseCaseResult<MealPlanDto> {
        let user_id = actor.user_id;
        info!(%user_id, %mess_id, "meal_plans: create requested");

        mess_access::load_managed_mess(self.mess_repository.as_ref(), &actor, mess_id).await?;

        let name = model.name.trim().to_string();
        if name.is_empty() {
            return Err(MealPlanError::Invalid("name is required".to_string()));
        }

        let terms = PlanTerms {
            price_minor: model.price_minor,
            duration_days: model.duration_days,
            meals_per_day: model.meals_per_day,
            leave_days_allowed: model.leave_days_allowed,
        };
        terms.validate().map_err(|reason| {
            let err = MealPlanError::Invalid(reason);
            warn!(%user_id, %mess_id, status = err.status_code().as_u16(), error = %err, "meal_plans: rejected terms");
            err
        })?;

        let plan = self
            .meal_plan_repository
            .create(InsertMealPlanEntity {
                mess_id,
                name,
                description: model.description,
                price_minor: terms.price_minor,
                duration_days: terms.duration_days,
                meals_per_day: terms.meals_per_day,
                leave_days_allowed: terms.leave_days_allowed,
                is_active: true,
            })
            .await
            .map_err(|err| {
                error!(%user_id, %mess_id, db_error = ?err, "meal_plans: failed to create plan");
                MealPlanError::Internal(err)
            })?;

        info!(%user_id, %mess_id, plan_id = %plan.id, "meal_plans: plan created");
        Ok(MealPlanDto::from(plan))
    }

    pub async fn update_meal_plan(
        &self,
        actor: Actor,
        plan_id: Uuid,
        model: UpdateMealPlanModel,
    ) -> UseCaseResult<MealPlanDto> {
        let plan = self.load_managed_plan(&actor, plan_id).await?;

        let terms = PlanTerms::from_entity(&plan).apply(&model);
        terms.validate().map_err(MealPlanError::Invalid)?;

        let name = match model.name {
            Some(name) if name.trim().is_empty() => {
                return Err(MealPlanError::Invalid("name is required".to_string()));
            }
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };

        let updated = self
            .meal_plan_repository
            .update(
                plan_id,
                UpdateMealPlanEntity {
                    name,
                    description: model.description,
                    price_minor: model.price_minor,
                    duration_days: model.duration_days,
                    meals_per_day: model.meals_per_day,
                    leave_days_allowed: model.leave_days_allowed,
                },
            )
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "meal_plans: failed to update plan");
                MealPlanError::Internal(err)
            })?;

        info!(user_id = %actor.user_id, %plan_id, "meal_plans: plan updated");
        Ok(MealPlanDto::from(updated))
    }

    /// Plans are never deleted; existing memberships keep pointing at them.
    pub async fn deactivate_meal_plan(&self, actor: Actor, plan_id: Uuid) -> UseCaseResult<()> {
        self.load_managed_plan(&actor, plan_id).await?;

        self.meal_plan_repository
            .deactivate(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "meal_plans: failed to deactivate plan");
                MealPlanError::Internal(err)
            })?;

        info!(user_id = %actor.user_id, %plan_id, "meal_plans: plan deactivated");
        Ok(())
    }

    pub async fn list_meal_plans(&self, mess_id: Uuid) -> UseCaseResult<Vec<MealPlanDto>> {
        mess_access::load_mess(self.mess_repository.as_ref(), mess_id).await?;

        let plans = self
            .meal_plan_repository
            .list_active_by_mess(mess_id)
            .await
            .map_err(|err| {
                error!(%mess_id, db_error = ?err, "meal_plans: failed to list plans");
                MealPlanError::Internal(err)
            })?;

        Ok(plans.into_iter().map(MealPlanDto::from).collect())
    }

    pub async fn get_meal_plan(&self, plan_id: Uuid) -> UseCaseResult<MealPlanDto> {
        let plan = self.find_plan(plan_id).await?;
        Ok(MealPlanDto::from(plan))
    }

    async fn find_plan(&self, plan_id: Uuid) -> UseCaseResult<MealPlanEntity> {
        self.meal_plan_repository
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "meal_plans: failed to load plan");
                MealPlanError::Internal(err)
            })?
            .ok_or(MealPlanError::PlanNotFound)
    }

    async fn load_managed_plan(&self, actor: &Actor, plan_id: Uuid) -> UseCaseResult<MealPlanEntity> {
        let plan = self.find_plan(plan_id).await?;
        mess_access::load_managed_mess(self.mess_repository.as_ref(), actor, plan.mess_id).await?;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::messes::MessEntity,
        repositories::{meal_plans::MockMealPlanRepository, messes::MockMessRepository},
        value_objects::enums::user_roles::UserRole,
    };
    use chrono::Utc;

    fn mess(owner_id: Uuid) -> MessEntity {
        MessEntity {
            id: Uuid::new_v4(),
            owner_id,
            name: "Annapurna".to_string(),
            address: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn plan(mess_id: Uuid) -> MealPlanEntity {
        MealPlanEntity {
            id: Uuid::new_v4(),
            mess_id,
            name: "Monthly veg".to_string(),
            description: None,
            price_minor: 300_000,
            duration_days: 30,
            meals_per_day: 2,
            leave_days_allowed: 4,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn create_model(meals_per_day: i32) -> CreateMealPlanModel {
        CreateMealPlanModel {
            name: "Monthly veg".to_string(),
            description: None,
            price_minor: 300_000,
            duration_days: 30,
            meals_per_day,
            leave_days_allowed: 4,
        }
    }

    #[tokio::test]
    async fn owner_creates_plan() {
        let owner = Actor::new(Uuid::new_v4(), UserRole::MessOwner);
        let mess = mess(owner.user_id);
        let mess_id = mess.id;

        let mut mess_repo = MockMessRepository::new();
        mess_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mess.clone())));
        let mut plan_repo = MockMealPlanRepository::new();
        plan_repo
            .expect_create()
            .times(1)
            .returning(move |insert| {
                let mut created = plan(insert.mess_id);
                created.name = insert.name;
                Ok(created)
            });

        let usecase = MealPlanUseCase::new(Arc::new(mess_repo), Arc::new(plan_repo));
        let created = usecase
            .create_meal_plan(owner, mess_id, create_model(2))
            .await
            .unwrap();

        assert_eq!(created.mess_id, mess_id);
    }

    #[tokio::test]
    async fn rejects_four_meals_a_day() {
        let owner = Actor::new(Uuid::new_v4(), UserRole::MessOwner);
        let mess = mess(owner.user_id);
        let mess_id = mess.id;

        let mut mess_repo = MockMessRepository::new();
        mess_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mess.clone())));
        let mut plan_repo = MockMealPlanRepository::new();
        plan_repo.expect_create().never();

        let usecase = MealPlanUseCase::new(Arc::new(mess_repo), Arc::new(plan_repo));
        let err = usecase
            .create_meal_plan(owner, mess_id, create_model(4))
            .await
            .unwrap_err();

        assert!(matches!(err, MealPlanError::Invalid(_)));
    }

    #[tokio::test]
    async fn update_validates_against_stored_terms() {
        let owner = Actor::new(Uuid::new_v4(), UserRole::MessOwner);
        let mess = mess(owner.user_id);
        let stored = plan(mess.id);
        let plan_id = stored.id;

        let mut mess_repo = MockMessRepository::new();
        mess_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mess.clone())));
        let mut plan_repo = MockMealPlanRepository::new();
        plan_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        plan_repo.expect_update().never();

        let usecase = MealPlanUseCase::new(Arc::new(mess_repo), Arc::new(plan_repo));
        // Shrinking the duration below the stored leave allowance is invalid.
        let err = usecase
            .update_meal_plan(
                owner,
                plan_id,
                UpdateMealPlanModel {
                    duration_days: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, MealPlanError::Invalid(_)));
    }
}
