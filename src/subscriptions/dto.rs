use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::repo_types::SubscriptionWithPlanRow;
use crate::dates::iso_date;
use crate::money::format_naira;
use crate::schedule::ScheduledMeal;

#[derive(Debug, Serialize)]
pub struct PlanSummary {
    pub id: Uuid,
    pub name: String,
    pub price_per_meal: Decimal,
    pub meals_per_week: i32,
    pub weekly_cost: Decimal,
    pub weekly_cost_display: String,
}

#[derive(Debug, Serialize)]
pub struct ActiveSubscription {
    pub id: Uuid,
    pub status: String,
    pub delivery_days: Vec<String>,
    pub delivery_time_slot: Option<String>,
    pub delivery_address: Option<String>,
    pub dietary_preferences: Vec<String>,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date::option")]
    pub end_date: Option<Date>,
    pub plan: Option<PlanSummary>,
}

impl From<SubscriptionWithPlanRow> for ActiveSubscription {
    fn from(r: SubscriptionWithPlanRow) -> Self {
        let plan = match (r.meal_plan_id, r.plan_name, r.price_per_meal, r.meals_per_week) {
            (Some(id), Some(name), Some(price_per_meal), Some(meals_per_week)) => {
                let weekly_cost = price_per_meal * Decimal::from(meals_per_week);
                Some(PlanSummary {
                    id,
                    name,
                    price_per_meal,
                    meals_per_week,
                    weekly_cost,
                    weekly_cost_display: format_naira(weekly_cost),
                })
            }
            _ => None,
        };
        Self {
            id: r.id,
            status: r.status.unwrap_or_default(),
            delivery_days: r.delivery_days.unwrap_or_default(),
            delivery_time_slot: r.delivery_time_slot,
            delivery_address: r.delivery_address,
            dietary_preferences: r.dietary_preferences.unwrap_or_default(),
            start_date: r.start_date,
            end_date: r.end_date,
            plan,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 {
    super::services::DEFAULT_UPCOMING_LIMIT
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub subscription: Option<ActiveSubscription>,
    pub upcoming_meals: Vec<ScheduledMeal>,
    pub available_credits: Decimal,
    pub available_credits_display: String,
}
