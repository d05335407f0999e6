use time::{Date, Duration};
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{ScheduledMeal, WeekSummary, WeekView};
use super::repo::ScheduleRepo;
use crate::catalog::repo::CatalogRepo;
use crate::dates::week_bounds;
use crate::error::AppError;

pub fn summarize(meals: &[ScheduledMeal]) -> WeekSummary {
    WeekSummary {
        scheduled: meals.len(),
        eaten: meals.iter().filter(|m| m.is_eaten).count(),
        skipped: meals.iter().filter(|m| m.is_skipped).count(),
        total_calories: meals
            .iter()
            .filter_map(|m| m.meal.as_ref().and_then(|meal| meal.calories))
            .map(i64::from)
            .sum(),
    }
}

/// The Monday..=Sunday week around `anchor`.
pub async fn list_week(
    repo: &dyn ScheduleRepo,
    user: Uuid,
    anchor: Date,
) -> Result<WeekView, AppError> {
    let out_of_range =
        || AppError::BadRequest(format!("Date {anchor} is outside the supported calendar"));
    let (week_start, week_end) = week_bounds(anchor).ok_or_else(out_of_range)?;
    let previous_week = week_start
        .checked_sub(Duration::weeks(1))
        .ok_or_else(out_of_range)?;
    let next_week = week_start
        .checked_add(Duration::weeks(1))
        .ok_or_else(out_of_range)?;
    let meals: Vec<ScheduledMeal> = repo
        .list_range(user, week_start, week_end)
        .await?
        .into_iter()
        .map(ScheduledMeal::from)
        .collect();
    let summary = summarize(&meals);

    Ok(WeekView {
        week_start,
        week_end,
        previous_week,
        next_week,
        meals,
        summary,
    })
}

pub async fn mark_eaten(
    repo: &dyn ScheduleRepo,
    user: Uuid,
    schedule_id: Uuid,
) -> Result<ScheduledMeal, AppError> {
    let row = repo
        .set_flags(user, schedule_id, true, false)
        .await?
        .ok_or_else(|| not_found(schedule_id))?;
    info!(user_id = %user, %schedule_id, "meal marked eaten");
    Ok(row.into())
}

pub async fn mark_skipped(
    repo: &dyn ScheduleRepo,
    user: Uuid,
    schedule_id: Uuid,
) -> Result<ScheduledMeal, AppError> {
    let row = repo
        .set_flags(user, schedule_id, false, true)
        .await?
        .ok_or_else(|| not_found(schedule_id))?;
    info!(user_id = %user, %schedule_id, "meal skipped");
    Ok(row.into())
}

/// Point a schedule row at another meal. Only checks that the meal can be
/// ordered; dietary fit with the subscription is not checked.
pub async fn swap_meal(
    schedule: &dyn ScheduleRepo,
    catalog: &dyn CatalogRepo,
    user: Uuid,
    schedule_id: Uuid,
    meal_id: Uuid,
) -> Result<ScheduledMeal, AppError> {
    let meal = catalog.find_meal(meal_id).await?;
    if !meal.is_some_and(|m| m.is_available.unwrap_or(false)) {
        warn!(user_id = %user, %meal_id, "swap to unavailable meal");
        return Err(AppError::Unprocessable(format!(
            "Meal {meal_id} is not available"
        )));
    }

    let row = schedule
        .set_meal(user, schedule_id, meal_id)
        .await?
        .ok_or_else(|| not_found(schedule_id))?;
    info!(user_id = %user, %schedule_id, %meal_id, "meal swapped");
    Ok(row.into())
}

fn not_found(schedule_id: Uuid) -> AppError {
    AppError::NotFound(format!("Scheduled meal {schedule_id} not found"))
}
