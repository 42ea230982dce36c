use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::mess_access::{self, MessAccessError},
    domain::{
        entities::meals::InsertMealEntity,
        repositories::{meals::MealRepository, messes::MessRepository},
        value_objects::{
            actors::Actor,
            meals::{CreateMealModel, ListMealsFilter, MealDto},
        },
    },
};

#[derive(Debug, Error)]
pub enum MealError {
    #[error("mess not found")]
    MessNotFound,
    #[error("not allowed to manage meals of this mess")]
    Forbidden,
    #[error("invalid meal: {0}")]
    Invalid(String),
    #[error("this meal is already scheduled for that date")]
    Duplicate,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MealError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            MealError::MessNotFound => StatusCode::NOT_FOUND,
            MealError::Forbidden => StatusCode::FORBIDDEN,
            MealError::Invalid(_) => StatusCode::BAD_REQUEST,
            MealError::Duplicate => StatusCode::CONFLICT,
            MealError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MessAccessError> for MealError {
    fn from(err: MessAccessError) -> Self {
        match err {
            MessAccessError::NotFound => MealError::MessNotFound,
            MessAccessError::Forbidden => MealError::Forbidden,
            MessAccessError::Internal(err) => MealError::Internal(err),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, MealError>;

pub struct MealUseCase<M, Ml>
where
    M: MessRepository + Send + Sync + 'static,
    Ml: MealRepository + Send + Sync + 'static,
{
    mess_repository: Arc<M>,
    meal_repository: Arc<Ml>,
}

impl<M, Ml> MealUseCase<M, Ml>
where
    M: MessRepository + Send + Sync + 'static,
    Ml: MealRepository + Send + Sync + 'static,
{
    pub fn new(mess_repository: Arc<M>, meal_repository: Arc<Ml>) -> Self {
        Self {
            mess_repository,
            meal_repository,
        }
    }

    pub async fn create_meal(
        &self,
        actor: Actor,
        mess_id: Uuid,
        model: CreateMealModel,
    ) -> UseCaseResult<MealDto> {
        let user_id = actor.user_id;
        mess_access::load_managed_mess(self.mess_repository.as_ref(), &actor, mess_id).await?;

        let name = model.name.trim().to_string();
        if name.is_empty() {
            return Err(MealError::Invalid("name is required".to_string()));
        }

        let created = self
            .meal_repository
            .create(InsertMealEntity {
                mess_id,
                meal_type: model.meal_type.to_string(),
                name,
                served_on: model.served_on,
            })
            .await
            .map_err(|err| {
                error!(%user_id, %mess_id, db_error = ?err, "meals: failed to create meal");
                MealError::Internal(err)
            })?;

        match created {
            Some(meal) => {
                info!(
                    %user_id,
                    %mess_id,
                    meal_id = %meal.id,
                    served_on = %meal.served_on,
                    "meals: meal created"
                );
                Ok(MealDto::from(meal))
            }
            None => {
                let err = MealError::Duplicate;
                warn!(
                    %user_id,
                    %mess_id,
                    meal_type = %model.meal_type,
                    served_on = %model.served_on,
                    status = err.status_code().as_u16(),
                    "meals: duplicate meal slot"
                );
                Err(err)
            }
        }
    }

    pub async fn list_meals(
        &self,
        mess_id: Uuid,
        filter: ListMealsFilter,
    ) -> UseCaseResult<Vec<MealDto>> {
        mess_access::load_mess(self.mess_repository.as_ref(), mess_id).await?;

        let meals = self
            .meal_repository
            .list_by_mess(mess_id, filter.date)
            .await
            .map_err(|err| {
                error!(%mess_id, db_error = ?err, "meals: failed to list meals");
                MealError::Internal(err)
            })?;

        Ok(meals.into_iter().map(MealDto::from).collect())
    }
}
