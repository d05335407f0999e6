use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{MealPlanRow, MealRow};
use crate::store::PgStore;

#[async_trait]
pub trait CatalogRepo: Send + Sync {
    /// Available meals, newest first.
    async fn list_available_meals(&self) -> anyhow::Result<Vec<MealRow>>;
    async fn find_meal(&self, meal_id: Uuid) -> anyhow::Result<Option<MealRow>>;
    /// Active plans, cheapest first.
    async fn list_active_plans(&self) -> anyhow::Result<Vec<MealPlanRow>>;
}

#[async_trait]
impl CatalogRepo for PgStore {
    async fn list_available_meals(&self) -> anyhow::Result<Vec<MealRow>> {
        let rows = sqlx::query_as::<_, MealRow>(
            r#"
            SELECT id, name, description, image_url, calories, protein, carbs, fat,
                   category, is_available, created_at
              FROM meals
             WHERE is_available = TRUE
             ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list available meals")?;
        Ok(rows)
    }

    async fn find_meal(&self, meal_id: Uuid) -> anyhow::Result<Option<MealRow>> {
        let row = sqlx::query_as::<_, MealRow>(
            r#"
            SELECT id, name, description, image_url, calories, protein, carbs, fat,
                   category, is_available, created_at
              FROM meals
             WHERE id = $1
            "#,
        )
        .bind(meal_id)
        .fetch_optional(&self.db)
        .await
        .context("find meal")?;
        Ok(row)
    }

    async fn list_active_plans(&self) -> anyhow::Result<Vec<MealPlanRow>> {
        let rows = sqlx::query_as::<_, MealPlanRow>(
            r#"
            SELECT id, name, description, price_per_meal, meals_per_week, is_active
              FROM meal_plans
             WHERE is_active = TRUE AND price_per_meal > 0
             ORDER BY price_per_meal * meals_per_week ASC, name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list active plans")?;
        Ok(rows)
    }
}
