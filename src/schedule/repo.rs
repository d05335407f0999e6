use anyhow::Context;
use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use super::repo_types::ScheduledMealRow;
use crate::store::PgStore;

#[async_trait]
pub trait ScheduleRepo: Send + Sync {
    /// Rows with `from <= scheduled_date <= to`, oldest first.
    async fn list_range(&self, user: Uuid, from: Date, to: Date)
        -> anyhow::Result<Vec<ScheduledMealRow>>;

    /// Rows on or after `from`, oldest first, at most `limit`.
    async fn list_from(&self, user: Uuid, from: Date, limit: i64)
        -> anyhow::Result<Vec<ScheduledMealRow>>;

    /// Overwrite both status flags. None when the row is missing or not the user's.
    async fn set_flags(
        &self,
        user: Uuid,
        schedule_id: Uuid,
        is_eaten: bool,
        is_skipped: bool,
    ) -> anyhow::Result<Option<ScheduledMealRow>>;

    async fn set_meal(
        &self,
        user: Uuid,
        schedule_id: Uuid,
        meal_id: Uuid,
    ) -> anyhow::Result<Option<ScheduledMealRow>>;
}

#[async_trait]
impl ScheduleRepo for PgStore {
    async fn list_range(
        &self,
        user: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<ScheduledMealRow>> {
        let rows = sqlx::query_as::<_, ScheduledMealRow>(
            r#"
            SELECT s.id, s.user_id, s.meal_id, s.subscription_id, s.scheduled_date,
                   s.week_start_date, s.is_eaten, s.is_skipped,
                   m.name AS meal_name, m.image_url AS meal_image_url,
                   m.description AS meal_description, m.calories AS meal_calories,
                   m.category AS meal_category
              FROM weekly_meal_schedules s
              LEFT JOIN meals m ON m.id = s.meal_id
             WHERE s.user_id = $1
               AND s.scheduled_date >= $2
               AND s.scheduled_date <= $3
             ORDER BY s.scheduled_date ASC, s.created_at ASC
            "#,
        )
        .bind(user)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await
        .context("list schedule range")?;
        Ok(rows)
    }

    async fn list_from(
        &self,
        user: Uuid,
        from: Date,
        limit: i64,
    ) -> anyhow::Result<Vec<ScheduledMealRow>> {
        let rows = sqlx::query_as::<_, ScheduledMealRow>(
            r#"
            SELECT s.id, s.user_id, s.meal_id, s.subscription_id, s.scheduled_date,
                   s.week_start_date, s.is_eaten, s.is_skipped,
                   m.name AS meal_name, m.image_url AS meal_image_url,
                   m.description AS meal_description, m.calories AS meal_calories,
                   m.category AS meal_category
              FROM weekly_meal_schedules s
              LEFT JOIN meals m ON m.id = s.meal_id
             WHERE s.user_id = $1
               AND s.scheduled_date >= $2
             ORDER BY s.scheduled_date ASC, s.created_at ASC
             LIMIT $3
            "#,
        )
        .bind(user)
        .bind(from)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("list upcoming schedule")?;
        Ok(rows)
    }

    async fn set_flags(
        &self,
        user: Uuid,
        schedule_id: Uuid,
        is_eaten: bool,
        is_skipped: bool,
    ) -> anyhow::Result<Option<ScheduledMealRow>> {
        let row = sqlx::query_as::<_, ScheduledMealRow>(
            r#"
            WITH updated AS (
                UPDATE weekly_meal_schedules
                   SET is_eaten = $3, is_skipped = $4, updated_at = now()
                 WHERE id = $1 AND user_id = $2
             RETURNING *
            )
            SELECT u.id, u.user_id, u.meal_id, u.subscription_id, u.scheduled_date,
                   u.week_start_date, u.is_eaten, u.is_skipped,
                   m.name AS meal_name, m.image_url AS meal_image_url,
                   m.description AS meal_description, m.calories AS meal_calories,
                   m.category AS meal_category
              FROM updated u
              LEFT JOIN meals m ON m.id = u.meal_id
            "#,
        )
        .bind(schedule_id)
        .bind(user)
        .bind(is_eaten)
        .bind(is_skipped)
        .fetch_optional(&self.db)
        .await
        .context("update schedule flags")?;
        Ok(row)
    }

    async fn set_meal(
        &self,
        user: Uuid,
        schedule_id: Uuid,
        meal_id: Uuid,
    ) -> anyhow::Result<Option<ScheduledMealRow>> {
        let row = sqlx::query_as::<_, ScheduledMealRow>(
            r#"
            WITH updated AS (
                UPDATE weekly_meal_schedules
                   SET meal_id = $3, updated_at = now()
                 WHERE id = $1 AND user_id = $2
             RETURNING *
            )
            SELECT u.id, u.user_id, u.meal_id, u.subscription_id, u.scheduled_date,
                   u.week_start_date, u.is_eaten, u.is_skipped,
                   m.name AS meal_name, m.image_url AS meal_image_url,
                   m.description AS meal_description, m.calories AS meal_calories,
                   m.category AS meal_category
              FROM updated u
              LEFT JOIN meals m ON m.id = u.meal_id
            "#,
        )
        .bind(schedule_id)
        .bind(user)
        .bind(meal_id)
        .fetch_optional(&self.db)
        .await
        .context("swap scheduled meal")?;
        Ok(row)
    }
}
