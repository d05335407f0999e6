use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{ReferralStats, ShareAction};
use super::repo::{ReferralRepo, REFERRAL_SOURCE};
use super::repo_types::{CreditRow, ReferralRow};
use crate::auth::AuthUser;
use crate::config::ReferralConfig;
use crate::error::AppError;
use crate::money::format_naira;

pub const CODE_PREFIX: &str = "MEAL";
const EMAIL_PART_LEN: usize = 3;
const SUFFIX_LEN: usize = 6;
const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_CODE_ATTEMPTS: usize = 5;

pub(crate) fn is_valid_code(code: &str) -> bool {
    lazy_static! {
        static ref CODE_RE: Regex = Regex::new(r"^MEAL[A-Z]{3}[A-Z0-9]{6}$").unwrap();
    }
    CODE_RE.is_match(code)
}

/// `MEAL` + three letters of the email's local part + six random alphanumerics.
pub fn generate_code<R: Rng>(email: Option<&str>, rng: &mut R) -> String {
    let local = email
        .and_then(|e| e.split('@').next())
        .unwrap_or_default();
    let mut letters: String = local
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(EMAIL_PART_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    while letters.len() < EMAIL_PART_LEN {
        letters.push('X');
    }

    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();

    format!("{CODE_PREFIX}{letters}{suffix}")
}

pub struct LedgerTotals {
    pub total: Decimal,
    pub pending: Decimal,
}

pub fn credit_totals(credits: &[CreditRow]) -> LedgerTotals {
    credits.iter().fold(
        LedgerTotals {
            total: Decimal::ZERO,
            pending: Decimal::ZERO,
        },
        |mut acc, c| {
            acc.total += c.amount;
            if c.is_available() {
                acc.pending += c.amount;
            }
            acc
        },
    )
}

/// Sum of credits that can still be spent, whatever their source.
pub fn available_credits(credits: &[CreditRow]) -> Decimal {
    credits
        .iter()
        .filter(|c| c.is_available())
        .map(|c| c.amount)
        .sum()
}

/// Return the caller's code, creating the code-holder row on first use.
pub async fn get_or_create_code(
    repo: &dyn ReferralRepo,
    user: &AuthUser,
    reward: Decimal,
) -> Result<String, AppError> {
    if let Some(code) = repo.find_code(user.id).await? {
        return Ok(code);
    }

    let email = match &user.email {
        Some(e) => Some(e.clone()),
        None => repo.find_profile_email(user.id).await?,
    };

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = generate_code(email.as_deref(), &mut rand::thread_rng());
        if repo.insert_code(user.id, &code, reward).await? {
            info!(user_id = %user.id, %code, "referral code issued");
            return Ok(code);
        }
        // Lost a race with a concurrent request, or the code is taken.
        if let Some(existing) = repo.find_code(user.id).await? {
            return Ok(existing);
        }
        warn!(user_id = %user.id, attempt, "referral code collision");
    }

    Err(AppError::Internal(anyhow::anyhow!(
        "could not issue a unique referral code after {MAX_CODE_ATTEMPTS} attempts"
    )))
}

pub async fn referral_stats(
    repo: &dyn ReferralRepo,
    user: &AuthUser,
    reward: Decimal,
) -> Result<ReferralStats, AppError> {
    let referral_code = get_or_create_code(repo, user, reward).await?;
    let referrals = repo.list_referrals(user.id).await?;
    let credits = repo.list_credits(user.id, Some(REFERRAL_SOURCE)).await?;
    let totals = credit_totals(&credits);

    Ok(ReferralStats {
        referral_code,
        total_referrals: referrals.len(),
        total_earnings: totals.total,
        pending_earnings: totals.pending,
        total_earnings_display: format_naira(totals.total),
        pending_earnings_display: format_naira(totals.pending),
    })
}

pub fn share_message(code: &str, reward: Decimal) -> String {
    format!(
        "Join MealMate with my referral code {code} and get {} off your first order! \
         Fresh Nigerian meals delivered daily. 🍛",
        format_naira(reward)
    )
}

/// Native share sheet when the caller has one, clipboard text otherwise.
pub fn share_action(code: &str, cfg: &ReferralConfig, native_share: bool) -> ShareAction {
    let text = share_message(code, cfg.reward_amount);
    if native_share {
        ShareAction::Native {
            title: "Join MealMate".into(),
            text,
            url: cfg.site_url.clone(),
        }
    } else {
        ShareAction::Clipboard {
            text,
            notice: "Referral message copied to clipboard".into(),
        }
    }
}

pub fn copy_action(code: &str) -> ShareAction {
    ShareAction::Clipboard {
        text: code.to_string(),
        notice: "Referral code copied to clipboard".into(),
    }
}

pub async fn claim_code(
    repo: &dyn ReferralRepo,
    referred: Uuid,
    code: &str,
    reward: Decimal,
) -> Result<ReferralRow, AppError> {
    let code = code.trim().to_ascii_uppercase();
    if !is_valid_code(&code) {
        return Err(AppError::BadRequest("Invalid referral code".into()));
    }

    let referrer = repo
        .find_referrer_by_code(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("Referral code not found".into()))?;

    if referrer == referred {
        warn!(user_id = %referred, "self-referral rejected");
        return Err(AppError::BadRequest("Self-referrals are not allowed".into()));
    }

    let row = repo
        .insert_claim(referrer, referred, &code, reward)
        .await?
        .ok_or_else(|| AppError::Conflict("A referral is already recorded for this user".into()))?;

    info!(referrer = %referrer, referred = %referred, %code, "referral recorded");
    Ok(row)
}
