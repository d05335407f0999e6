use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::repo_types::ScheduledMealRow;
use crate::dates::iso_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Scheduled,
    Eaten,
    Skipped,
}

impl ScheduleStatus {
    pub fn from_flags(is_eaten: bool, is_skipped: bool) -> Self {
        match (is_eaten, is_skipped) {
            (true, _) => ScheduleStatus::Eaten,
            (false, true) => ScheduleStatus::Skipped,
            (false, false) => ScheduleStatus::Scheduled,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MealSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub calories: Option<i32>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledMeal {
    pub id: Uuid,
    #[serde(with = "iso_date")]
    pub scheduled_date: Date,
    pub is_eaten: bool,
    pub is_skipped: bool,
    pub status: ScheduleStatus,
    pub meal: Option<MealSummary>,
}

impl From<ScheduledMealRow> for ScheduledMeal {
    fn from(r: ScheduledMealRow) -> Self {
        let is_eaten = r.is_eaten.unwrap_or(false);
        let is_skipped = r.is_skipped.unwrap_or(false);
        let meal = r.meal_id.map(|id| MealSummary {
            id,
            name: r.meal_name,
            image_url: r.meal_image_url,
            description: r.meal_description,
            calories: r.meal_calories,
            category: r.meal_category,
        });
        Self {
            id: r.id,
            scheduled_date: r.scheduled_date,
            is_eaten,
            is_skipped,
            status: ScheduleStatus::from_flags(is_eaten, is_skipped),
            meal,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
    pub scheduled: usize,
    pub eaten: usize,
    pub skipped: usize,
    pub total_calories: i64,
}

#[derive(Debug, Serialize)]
pub struct WeekView {
    #[serde(with = "iso_date")]
    pub week_start: Date,
    #[serde(with = "iso_date")]
    pub week_end: Date,
    #[serde(with = "iso_date")]
    pub previous_week: Date,
    #[serde(with = "iso_date")]
    pub next_week: Date,
    pub meals: Vec<ScheduledMeal>,
    pub summary: WeekSummary,
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// Any day inside the wanted week, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SwapRequest {
    pub meal_id: Uuid,
}
