use anyhow::Context;
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::repo_types::{CreditRow, ReferralRow};
use crate::store::PgStore;

pub const REFERRAL_SOURCE: &str = "referral";

#[async_trait]
pub trait ReferralRepo: Send + Sync {
    /// Code from the referrer's code-holder row, if one exists.
    async fn find_code(&self, referrer: Uuid) -> anyhow::Result<Option<String>>;

    /// Insert a code-holder row. Returns false when either the referrer already
    /// holds a code or the code belongs to someone else.
    async fn insert_code(&self, referrer: Uuid, code: &str, reward: Decimal)
        -> anyhow::Result<bool>;

    async fn find_referrer_by_code(&self, code: &str) -> anyhow::Result<Option<Uuid>>;

    /// Record that `referred` signed up with `code`. None when `referred`
    /// already has a referral recorded.
    async fn insert_claim(
        &self,
        referrer: Uuid,
        referred: Uuid,
        code: &str,
        reward: Decimal,
    ) -> anyhow::Result<Option<ReferralRow>>;

    async fn list_referrals(&self, referrer: Uuid) -> anyhow::Result<Vec<ReferralRow>>;

    /// Credits of a user, optionally restricted to one source.
    async fn list_credits(&self, user: Uuid, source: Option<&str>)
        -> anyhow::Result<Vec<CreditRow>>;

    async fn find_profile_email(&self, user: Uuid) -> anyhow::Result<Option<String>>;
}

#[async_trait]
impl ReferralRepo for PgStore {
    async fn find_code(&self, referrer: Uuid) -> anyhow::Result<Option<String>> {
        let code = sqlx::query_scalar::<_, String>(
            r#"
            SELECT referral_code
              FROM referrals
             WHERE referrer_user_id = $1 AND referred_user_id IS NULL
             ORDER BY created_at ASC
             LIMIT 1
            "#,
        )
        .bind(referrer)
        .fetch_optional(&self.db)
        .await
        .context("find referral code")?;
        Ok(code)
    }

    async fn insert_code(
        &self,
        referrer: Uuid,
        code: &str,
        reward: Decimal,
    ) -> anyhow::Result<bool> {
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO referrals (referrer_user_id, referral_code, reward_amount, status)
            VALUES ($1, $2, $3, 'active')
            ON CONFLICT DO NOTHING
            RETURNING id
            "#,
        )
        .bind(referrer)
        .bind(code)
        .bind(reward)
        .fetch_optional(&self.db)
        .await
        .context("insert referral code")?;
        Ok(inserted.is_some())
    }

    async fn find_referrer_by_code(&self, code: &str) -> anyhow::Result<Option<Uuid>> {
        let referrer = sqlx::query_scalar::<_, Option<Uuid>>(
            r#"
            SELECT referrer_user_id
              FROM referrals
             WHERE referral_code = $1 AND referred_user_id IS NULL
             LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.db)
        .await
        .context("find referrer by code")?;
        Ok(referrer.flatten())
    }

    async fn insert_claim(
        &self,
        referrer: Uuid,
        referred: Uuid,
        code: &str,
        reward: Decimal,
    ) -> anyhow::Result<Option<ReferralRow>> {
        let row = sqlx::query_as::<_, ReferralRow>(
            r#"
            INSERT INTO referrals (referrer_user_id, referred_user_id, referral_code, reward_amount, status)
            VALUES ($1, $2, $3, $4, 'pending')
            ON CONFLICT DO NOTHING
            RETURNING id, referrer_user_id, referred_user_id, referral_code, reward_amount, status, created_at
            "#,
        )
        .bind(referrer)
        .bind(referred)
        .bind(code)
        .bind(reward)
        .fetch_optional(&self.db)
        .await
        .context("insert referral claim")?;
        Ok(row)
    }

    async fn list_referrals(&self, referrer: Uuid) -> anyhow::Result<Vec<ReferralRow>> {
        let rows = sqlx::query_as::<_, ReferralRow>(
            r#"
            SELECT id, referrer_user_id, referred_user_id, referral_code, reward_amount, status, created_at
              FROM referrals
             WHERE referrer_user_id = $1
             ORDER BY created_at ASC
            "#,
        )
        .bind(referrer)
        .fetch_all(&self.db)
        .await
        .context("list referrals")?;
        Ok(rows)
    }

    async fn list_credits(
        &self,
        user: Uuid,
        source: Option<&str>,
    ) -> anyhow::Result<Vec<CreditRow>> {
        let rows = sqlx::query_as::<_, CreditRow>(
            r#"
            SELECT id, user_id, amount, source, description, is_used, created_at
              FROM user_credits
             WHERE user_id = $1 AND ($2::text IS NULL OR source = $2)
             ORDER BY created_at ASC
            "#,
        )
        .bind(user)
        .bind(source)
        .fetch_all(&self.db)
        .await
        .context("list user credits")?;
        Ok(rows)
    }

    async fn find_profile_email(&self, user: Uuid) -> anyhow::Result<Option<String>> {
        let email = sqlx::query_scalar::<_, String>(
            r#"SELECT email FROM profiles WHERE user_id = $1 LIMIT 1"#,
        )
        .bind(user)
        .fetch_optional(&self.db)
        .await
        .context("find profile email")?;
        Ok(email)
    }
}
