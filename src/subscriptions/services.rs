use rust_decimal::Decimal;
use time::Date;
use tracing::error;
use uuid::Uuid;

use super::dto::{ActiveSubscription, Dashboard};
use super::repo::SubscriptionRepo;
use crate::error::AppError;
use crate::money::format_naira;
use crate::referrals::{repo::ReferralRepo, services::available_credits};
use crate::schedule::{repo::ScheduleRepo, ScheduledMeal};

pub const DEFAULT_UPCOMING_LIMIT: i64 = 3;
const MAX_UPCOMING_LIMIT: i64 = 50;

pub async fn get_active_subscription(
    repo: &dyn SubscriptionRepo,
    user: Uuid,
) -> Result<Option<ActiveSubscription>, AppError> {
    Ok(repo.find_active(user).await?.map(ActiveSubscription::from))
}

/// Scheduled meals from `today` on, soonest first.
pub async fn upcoming_meals(
    repo: &dyn ScheduleRepo,
    user: Uuid,
    today: Date,
    limit: i64,
) -> Result<Vec<ScheduledMeal>, AppError> {
    let limit = limit.clamp(1, MAX_UPCOMING_LIMIT);
    let rows = repo.list_from(user, today, limit).await?;
    Ok(rows.into_iter().map(ScheduledMeal::from).collect())
}

pub async fn credit_balance(repo: &dyn ReferralRepo, user: Uuid) -> Result<Decimal, AppError> {
    let credits = repo.list_credits(user, None).await?;
    Ok(available_credits(&credits))
}

/// Everything the dashboard shows. A section that fails to load is logged and
/// rendered empty instead of failing the whole page.
pub async fn dashboard(
    subscriptions: &dyn SubscriptionRepo,
    schedule: &dyn ScheduleRepo,
    ledger: &dyn ReferralRepo,
    user: Uuid,
    today: Date,
) -> Dashboard {
    let (subscription, upcoming, credits) = tokio::join!(
        get_active_subscription(subscriptions, user),
        upcoming_meals(schedule, user, today, DEFAULT_UPCOMING_LIMIT),
        credit_balance(ledger, user),
    );

    let subscription = subscription.unwrap_or_else(|e| {
        error!(error = %e, user_id = %user, "dashboard: subscription unavailable");
        None
    });
    let upcoming_meals = upcoming.unwrap_or_else(|e| {
        error!(error = %e, user_id = %user, "dashboard: upcoming meals unavailable");
        Vec::new()
    });
    let available_credits = credits.unwrap_or_else(|e| {
        error!(error = %e, user_id = %user, "dashboard: credits unavailable");
        Decimal::ZERO
    });

    Dashboard {
        subscription,
        upcoming_meals,
        available_credits_display: format_naira(available_credits),
        available_credits,
    }
}
