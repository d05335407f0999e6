use rust_decimal::Decimal;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Row of the `referrals` table. A row with no `referred_user_id` holds the
/// referrer's code; every claim adds another row.
#[derive(Debug, Clone, FromRow)]
pub struct ReferralRow {
    pub id: Uuid,
    pub referrer_user_id: Option<Uuid>,
    pub referred_user_id: Option<Uuid>,
    pub referral_code: String,
    pub reward_amount: Option<Decimal>,
    pub status: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Row of the `user_credits` ledger.
#[derive(Debug, Clone, FromRow)]
pub struct CreditRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub amount: Decimal,
    pub source: String,
    pub description: Option<String>,
    pub is_used: Option<bool>,
    pub created_at: OffsetDateTime,
}

impl CreditRow {
    /// A NULL `is_used` counts as still available.
    pub fn is_available(&self) -> bool {
        !self.is_used.unwrap_or(false)
    }
}
