use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::ReferralRow;

/// Numbers shown on the "Refer & Earn" card.
#[derive(Debug, Serialize)]
pub struct ReferralStats {
    pub referral_code: String,
    pub total_referrals: usize,
    pub total_earnings: Decimal,
    pub pending_earnings: Decimal,
    pub total_earnings_display: String,
    pub pending_earnings_display: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum ShareAction {
    Native {
        title: String,
        text: String,
        url: String,
    },
    Clipboard {
        text: String,
        notice: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    #[serde(default)]
    pub native_share: bool,
}

#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: Uuid,
    pub referral_code: String,
    pub status: Option<String>,
    pub reward_amount: Option<Decimal>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<ReferralRow> for ClaimResponse {
    fn from(r: ReferralRow) -> Self {
        Self {
            id: r.id,
            referral_code: r.referral_code,
            status: r.status,
            reward_amount: r.reward_amount,
            created_at: r.created_at,
        }
    }
}
