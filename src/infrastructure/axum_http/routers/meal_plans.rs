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
    application::usecases::meal_plans::MealPlanUseCase,
    domain::{
        repositories::{meal_plans::MealPlanRepository, messes::MessRepository},
        value_objects::meal_plans::{CreateMealPlanModel, UpdateMealPlanModel},
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{ApiResponse, AppError},
            extractors::{Json, Path},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{meal_plans::MealPlanPostgres, messes::MessPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let mess_repository = MessPostgres::new(Arc::clone(&db_pool));
    let meal_plan_repository = MealPlanPostgres::new(Arc::clone(&db_pool));
    let meal_plan_usecase =
        MealPlanUseCase::new(Arc::new(mess_repository), Arc::new(meal_plan_repository));

    Router::new()
        .route(
            "/messes/:id/meal-plans",
            get(list_meal_plans).post(create_meal_plan),
        )
        .route(
            "/meal-plans/:id",
            get(get_meal_plan)
                .patch(update_meal_plan)
                .delete(deactivate_meal_plan),
        )
        .with_state(Arc::new(meal_plan_usecase))
}

pub async fn create_meal_plan<M, P>(
    State(meal_plan_usecase): State<Arc<MealPlanUseCase<M, P>>>,
    auth: AuthUser,
    Path(mess_id): Path<Uuid>,
    Json(model): Json<CreateMealPlanModel>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
{
    let plan = meal_plan_usecase
        .create_meal_plan(auth.actor(), mess_id, model)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok("Meal plan created", plan)))
}

pub async fn list_meal_plans<M, P>(
    State(meal_plan_usecase): State<Arc<MealPlanUseCase<M, P>>>,
    _auth: AuthUser,
    Path(mess_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
{
    let plans = meal_plan_usecase.list_meal_plans(mess_id).await?;
    Ok(ApiResponse::ok("Meal plans fetched", plans))
}

pub async fn get_meal_plan<M, P>(
    State(meal_plan_usecase): State<Arc<MealPlanUseCase<M, P>>>,
    _auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
{
    let plan = meal_plan_usecase.get_meal_plan(plan_id).await?;
    Ok(ApiResponse::ok("Meal plan fetched", plan))
}

pub async fn update_meal_plan<M, P>(
    State(meal_plan_usecase): State<Arc<MealPlanUseCase<M, P>>>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
    Json(model): Json<UpdateMealPlanModel>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
{
    let plan = meal_plan_usecase
        .update_meal_plan(auth.actor(), plan_id, model)
        .await?;
    Ok(ApiResponse::ok("Meal plan updated", plan))
}

pub async fn deactivate_meal_plan<M, P>(
    State(meal_plan_usecase): State<Arc<MealPlanUseCase<M, P>>>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    P: MealPlanRepository + Send + Sync + 'static,
{
    meal_plan_usecase
        .deactivate_meal_plan(auth.actor(), plan_id)
        .await?;
    Ok(ApiResponse::ok("Meal plan deactivated", ()))
}
