use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{ScheduledMeal, SwapRequest, WeekQuery, WeekView};
use super::services;
use crate::{auth::AuthUser, dates::parse_iso_date, error::AppError, state::AppState};

pub fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/schedule/week", get(get_week))
        .route("/schedule/:id/eaten", post(mark_eaten))
        .route("/schedule/:id/skipped", post(mark_skipped))
        .route("/schedule/:id/swap", post(swap_meal))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_week(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<WeekQuery>,
) -> Result<Json<WeekView>, AppError> {
    let anchor = match q.date.as_deref() {
        Some(s) => parse_iso_date(s)
            .map_err(|_| AppError::BadRequest(format!("Invalid date {s:?}, expected YYYY-MM-DD")))?,
        None => state.config.today(),
    };
    let week = services::list_week(state.schedule.as_ref(), user.id, anchor).await?;
    Ok(Json(week))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn mark_eaten(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduledMeal>, AppError> {
    let meal = services::mark_eaten(state.schedule.as_ref(), user.id, id).await?;
    Ok(Json(meal))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn mark_skipped(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduledMeal>, AppError> {
    let meal = services::mark_skipped(state.schedule.as_ref(), user.id, id).await?;
    Ok(Json(meal))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn swap_meal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SwapRequest>,
) -> Result<Json<ScheduledMeal>, AppError> {
    let meal = services::swap_meal(
        state.schedule.as_ref(),
        state.catalog.as_ref(),
        user.id,
        id,
        body.meal_id,
    )
    .await?;
    Ok(Json(meal))
}
