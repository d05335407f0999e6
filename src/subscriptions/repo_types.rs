use rust_decimal::Decimal;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// `user_subscriptions` joined with its `meal_plans` row.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionWithPlanRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub meal_plan_id: Option<Uuid>,
    pub status: Option<String>,
    pub delivery_days: Option<Vec<String>>,
    pub delivery_time_slot: Option<String>,
    pub delivery_address: Option<String>,
    pub dietary_preferences: Option<Vec<String>>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub created_at: OffsetDateTime,
    pub plan_name: Option<String>,
    pub price_per_meal: Option<Decimal>,
    pub meals_per_week: Option<i32>,
}
