use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    application::usecases::meal_activations::MealActivationUseCase,
    domain::value_objects::meal_activations::{
        ActivateCodeModel, GenerateActivationModel, ListActivationsFilter, MessActivationsFilter,
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{ApiResponse, AppError},
            extractors::{Json, Path, Query},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                leave_requests::LeaveRequestPostgres, meal_activations::MealActivationPostgres,
                meals::MealPostgres, memberships::MembershipPostgres, messes::MessPostgres,
            },
        },
    },
};

type MealActivations = MealActivationUseCase<
    MessPostgres,
    MealPostgres,
    MembershipPostgres,
    LeaveRequestPostgres,
    MealActivationPostgres,
>;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let activation_usecase = MealActivationUseCase::new(
        Arc::new(MessPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MealPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MembershipPostgres::new(Arc::clone(&db_pool))),
        Arc::new(LeaveRequestPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MealActivationPostgres::new(Arc::clone(&db_pool))),
    );

    Router::new()
        .route("/meal-activations", post(generate_code))
        .route("/meal-activations/activate", post(activate_code))
        .route("/meal-activations/me", get(list_my_activations))
        .route("/messes/:id/meal-activations", get(list_mess_activations))
        .with_state(Arc::new(activation_usecase))
}

pub async fn generate_code(
    State(usecase): State<Arc<MealActivations>>,
    auth: AuthUser,
    Json(model): Json<GenerateActivationModel>,
) -> Result<impl IntoResponse, AppError> {
    let activation = usecase.generate_code(auth.actor(), model.meal_id).await?;
    Ok(ApiResponse::ok("Activation code ready", activation))
}

pub async fn activate_code(
    State(usecase): State<Arc<MealActivations>>,
    auth: AuthUser,
    Json(model): Json<ActivateCodeModel>,
) -> Result<impl IntoResponse, AppError> {
    info!(user_id = %auth.user_id, "meal_activations: activate request received");
    let activation = usecase.activate_code(auth.actor(), &model.code).await?;
    Ok(ApiResponse::ok("Meal activated", activation))
}

pub async fn list_my_activations(
    State(usecase): State<Arc<MealActivations>>,
    auth: AuthUser,
    Query(filter): Query<ListActivationsFilter>,
) -> Result<impl IntoResponse, AppError> {
    let activations = usecase.list_my_activations(auth.actor(), filter).await?;
    Ok(ApiResponse::ok("Activations fetched", activations))
}

pub async fn list_mess_activations(
    State(usecase): State<Arc<MealActivations>>,
    auth: AuthUser,
    Path(mess_id): Path<Uuid>,
    Query(filter): Query<MessActivationsFilter>,
) -> Result<impl IntoResponse, AppError> {
    let activations = usecase
        .list_mess_activations(auth.actor(), mess_id, filter)
        .await?;
    Ok(ApiResponse::ok("Activations fetched", activations))
}
