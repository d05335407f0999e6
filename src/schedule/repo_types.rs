use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

/// A `weekly_meal_schedules` row joined with the scheduled meal's summary.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduledMealRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub meal_id: Option<Uuid>,
    pub subscription_id: Option<Uuid>,
    pub scheduled_date: Date,
    pub week_start_date: Date,
    pub is_eaten: Option<bool>,
    pub is_skipped: Option<bool>,
    pub meal_name: Option<String>,
    pub meal_image_url: Option<String>,
    pub meal_description: Option<String>,
    pub meal_calories: Option<i32>,
    pub meal_category: Option<String>,
}
