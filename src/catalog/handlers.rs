use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{MealQuery, MealView, PlanView};
use super::services;
use crate::{error::AppError, state::AppState};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/plans", get(list_plans))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Query(q): Query<MealQuery>,
) -> Result<Json<Vec<MealView>>, AppError> {
    let meals = services::list_meals(state.catalog.as_ref(), q.category.as_deref()).await?;
    Ok(Json(meals))
}

#[instrument(skip(state))]
pub async fn list_plans(State(state): State<AppState>) -> Result<Json<Vec<PlanView>>, AppError> {
    let plans = services::list_plans(state.catalog.as_ref()).await?;
    Ok(Json(plans))
}
