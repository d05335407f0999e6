use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{ActiveSubscription, Dashboard, UpcomingQuery};
use super::services;
use crate::{auth::AuthUser, error::AppError, schedule::ScheduledMeal, state::AppState};

pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/subscriptions/active", get(get_active_subscription))
        .route("/subscriptions/upcoming", get(get_upcoming_meals))
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_active_subscription(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Option<ActiveSubscription>>, AppError> {
    let sub = services::get_active_subscription(state.subscriptions.as_ref(), user.id).await?;
    Ok(Json(sub))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_upcoming_meals(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<UpcomingQuery>,
) -> Result<Json<Vec<ScheduledMeal>>, AppError> {
    let meals = services::upcoming_meals(
        state.schedule.as_ref(),
        user.id,
        state.config.today(),
        q.limit,
    )
    .await?;
    Ok(Json(meals))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_dashboard(State(state): State<AppState>, user: AuthUser) -> Json<Dashboard> {
    let dash = services::dashboard(
        state.subscriptions.as_ref(),
        state.schedule.as_ref(),
        state.referrals.as_ref(),
        user.id,
        state.config.today(),
    )
    .await;
    Json(dash)
}
