use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{MealPlanRow, MealRow};
use crate::money::format_naira;

#[derive(Debug, Deserialize)]
pub struct MealQuery {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Nutrition {
    pub calories: Option<i32>,
    pub protein: Option<i32>,
    pub carbs: Option<i32>,
    pub fat: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct MealView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub nutrition: Nutrition,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<MealRow> for MealView {
    fn from(m: MealRow) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            image_url: m.image_url,
            category: m.category,
            nutrition: Nutrition {
                calories: m.calories,
                protein: m.protein,
                carbs: m.carbs,
                fat: m.fat,
            },
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_per_meal: Decimal,
    pub meals_per_week: i32,
    pub weekly_cost: Decimal,
    pub weekly_cost_display: String,
}

impl From<MealPlanRow> for PlanView {
    fn from(p: MealPlanRow) -> Self {
        let weekly_cost = p.price_per_meal * Decimal::from(p.meals_per_week);
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price_per_meal: p.price_per_meal,
            meals_per_week: p.meals_per_week,
            weekly_cost,
            weekly_cost_display: format_naira(weekly_cost),
        }
    }
}
