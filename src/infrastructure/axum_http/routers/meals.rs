use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    application::usecases::meals::MealUseCase,
    domain::{
        repositories::{meals::MealRepository, messes::MessRepository},
        value_objects::meals::{CreateMealModel, ListMealsFilter},
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{ApiResponse, AppError},
            extractors::{Json, Path, Query},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{meals::MealPostgres, messes::MessPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let mess_repository = MessPostgres::new(Arc::clone(&db_pool));
    let meal_repository = MealPostgres::new(Arc::clone(&db_pool));
    let meal_usecase = MealUseCase::new(Arc::new(mess_repository), Arc::new(meal_repository));

    Router::new()
        .route("/messes/:id/meals", get(list_meals).post(create_meal))
        .with_state(Arc::new(meal_usecase))
}

pub async fn create_meal<M, Ml>(
    State(meal_usecase): State<Arc<MealUseCase<M, Ml>>>,
    auth: AuthUser,
    Path(mess_id): Path<Uuid>,
    Json(model): Json<CreateMealModel>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    Ml: MealRepository + Send + Sync + 'static,
{
    let meal = meal_usecase.create_meal(auth.actor(), mess_id, model).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok("Meal created", meal)))
}

pub async fn list_meals<M, Ml>(
    State(meal_usecase): State<Arc<MealUseCase<M, Ml>>>,
    _auth: AuthUser,
    Path(mess_id): Path<Uuid>,
    Query(filter): Query<ListMealsFilter>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    Ml: MealRepository + Send + Sync + 'static,
{
    let meals = meal_usecase.list_meals(mess_id, filter).await?;
    Ok(ApiResponse::ok("Meals fetched", meals))
}
