use rust_decimal::Decimal;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Row of the `meals` table.
#[derive(Debug, Clone, FromRow)]
pub struct MealRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub calories: Option<i32>,
    pub protein: Option<i32>,
    pub carbs: Option<i32>,
    pub fat: Option<i32>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
    pub created_at: OffsetDateTime,
}

/// Row of the `meal_plans` table.
#[derive(Debug, Clone, FromRow)]
pub struct MealPlanRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_per_meal: Decimal,
    pub meals_per_week: i32,
    pub is_active: Option<bool>,
}
