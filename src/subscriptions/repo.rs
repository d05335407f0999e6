use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::SubscriptionWithPlanRow;
use crate::store::PgStore;

pub const ACTIVE_STATUS: &str = "active";

#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    /// The user's newest `active` subscription.
    async fn find_active(&self, user: Uuid) -> anyhow::Result<Option<SubscriptionWithPlanRow>>;
}

#[async_trait]
impl SubscriptionRepo for PgStore {
    async fn find_active(&self, user: Uuid) -> anyhow::Result<Option<SubscriptionWithPlanRow>> {
        let row = sqlx::query_as::<_, SubscriptionWithPlanRow>(
            r#"
            SELECT s.id, s.user_id, s.meal_plan_id, s.status, s.delivery_days,
                   s.delivery_time_slot, s.delivery_address, s.dietary_preferences,
                   s.start_date, s.end_date, s.created_at,
                   p.name AS plan_name, p.price_per_meal, p.meals_per_week
              FROM user_subscriptions s
              LEFT JOIN meal_plans p ON p.id = s.meal_plan_id
             WHERE s.user_id = $1 AND s.status = $2
             ORDER BY s.created_at DESC
             LIMIT 1
            "#,
        )
        .bind(user)
        .bind(ACTIVE_STATUS)
        .fetch_optional(&self.db)
        .await
        .context("find active subscription")?;
        Ok(row)
    }
}
