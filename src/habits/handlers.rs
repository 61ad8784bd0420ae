use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateHabitRequest, HabitResponse, UpdateHabitRequest};
use super::service;
use crate::{auth::service::CurrentUser, error::ApiError, state::AppState};

pub fn habit_routes() -> Router<AppState> {
    Router::new()
        .route("/habits", get(list_habits).post(create_habit))
        .route("/habits/:id", put(update_habit).delete(delete_habit))
}

#[instrument(skip_all)]
pub async fn list_habits(
    State(state): State<AppState>,
    identity: CurrentUser,
) -> Result<Json<Vec<HabitResponse>>, ApiError> {
    let habits = service::list_habits(&state, &identity).await?;
    Ok(Json(habits.into_iter().map(Into::into).collect()))
}

#[instrument(skip_all)]
pub async fn create_habit(
    State(state): State<AppState>,
    identity: CurrentUser,
    Json(payload): Json<CreateHabitRequest>,
) -> Result<(StatusCode, Json<HabitResponse>), ApiError> {
    let habit = service::create_habit(&state, &identity, payload).await?;
    Ok((StatusCode::CREATED, Json(habit.into())))
}

#[instrument(skip_all, fields(habit_id = %id))]
pub async fn update_habit(
    State(state): State<AppState>,
    identity: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateHabitRequest>,
) -> Result<Json<HabitResponse>, ApiError> {
    let habit = service::update_habit(&state, &identity, id, payload).await?;
    Ok(Json(habit.into()))
}

#[instrument(skip_all, fields(habit_id = %id))]
pub async fn delete_habit(
    State(state): State<AppState>,
    identity: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service::delete_habit(&state, &identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
