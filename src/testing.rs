//! In-memory stand-in for Postgres, mirroring the queries in each `repo.rs`.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::{macros::datetime, Date, Duration, OffsetDateTime};
use uuid::Uuid;

use crate::catalog::repo::CatalogRepo;
use crate::catalog::repo_types::{MealPlanRow, MealRow};
use crate::dates::week_bounds;
use crate::referrals::repo::ReferralRepo;
use crate::referrals::repo_types::{CreditRow, ReferralRow};
use crate::schedule::repo::ScheduleRepo;
use crate::schedule::repo_types::ScheduledMealRow;
use crate::subscriptions::repo::{SubscriptionRepo, ACTIVE_STATUS};
use crate::subscriptions::repo_types::SubscriptionWithPlanRow;

struct SubscriptionRecord {
    id: Uuid,
    user_id: Uuid,
    meal_plan_id: Uuid,
    status: String,
    created_at: OffsetDateTime,
}

struct ScheduleRecord {
    id: Uuid,
    user_id: Uuid,
    meal_id: Option<Uuid>,
    scheduled_date: Date,
    is_eaten: Option<bool>,
    is_skipped: Option<bool>,
    seq: i64,
}

#[derive(Default)]
struct Tables {
    seq: i64,
    meals: Vec<MealRow>,
    plans: Vec<MealPlanRow>,
    subscriptions: Vec<SubscriptionRecord>,
    schedules: Vec<ScheduleRecord>,
    referrals: Vec<ReferralRow>,
    credits: Vec<CreditRow>,
    profiles: HashMap<Uuid, String>,
    failing: HashSet<&'static str>,
    rejected_code_inserts: usize,
    rival_code: Option<String>,
    attempted_codes: Vec<String>,
}

impl Tables {
    /// Monotonic timestamps so "newest"/"oldest" orderings are stable.
    fn tick(&mut self) -> (i64, OffsetDateTime) {
        self.seq += 1;
        (self.seq, datetime!(2026-01-01 0:00 UTC) + Duration::seconds(self.seq))
    }

    fn check(&self, table: &'static str) -> anyhow::Result<()> {
        if self.failing.contains(table) {
            anyhow::bail!("{table}: simulated outage");
        }
        Ok(())
    }

    fn joined(&self, s: &ScheduleRecord) -> ScheduledMealRow {
        let meal = s
            .meal_id
            .and_then(|id| self.meals.iter().find(|m| m.id == id));
        ScheduledMealRow {
            id: s.id,
            user_id: Some(s.user_id),
            meal_id: s.meal_id,
            subscription_id: None,
            scheduled_date: s.scheduled_date,
            week_start_date: week_bounds(s.scheduled_date)
                .map_or(s.scheduled_date, |(start, _)| start),
            is_eaten: s.is_eaten,
            is_skipped: s.is_skipped,
            meal_name: meal.map(|m| m.name.clone()),
            meal_image_url: meal.and_then(|m| m.image_url.clone()),
            meal_description: meal.and_then(|m| m.description.clone()),
            meal_calories: meal.and_then(|m| m.calories),
            meal_category: meal.and_then(|m| m.category.clone()),
        }
    }

    fn sorted_schedules<'a>(
        &'a self,
        keep: impl Fn(&ScheduleRecord) -> bool,
    ) -> Vec<&'a ScheduleRecord> {
        let mut rows: Vec<&ScheduleRecord> = self.schedules.iter().filter(|s| keep(s)).collect();
        rows.sort_by_key(|s| (s.scheduled_date, s.seq));
        rows
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.inner.lock().expect("memory store poisoned")
    }

    /// Make every query touching `table` fail.
    pub fn fail_table(&self, table: &'static str) {
        self.tables().failing.insert(table);
    }

    pub fn add_meal(&self, name: &str, category: &str, available: bool) -> Uuid {
        self.insert_meal(name, category, available, Some(400))
    }

    pub fn add_meal_with_calories(&self, name: &str, category: &str, calories: i32) -> Uuid {
        self.insert_meal(name, category, true, Some(calories))
    }

    fn insert_meal(&self, name: &str, category: &str, available: bool, calories: Option<i32>) -> Uuid {
        let mut t = self.tables();
        let (_, created_at) = t.tick();
        let id = Uuid::new_v4();
        t.meals.push(MealRow {
            id,
            name: name.into(),
            description: None,
            image_url: Some(format!("https://cdn.mealmate.test/{id}.jpg")),
            calories,
            protein: Some(20),
            carbs: Some(50),
            fat: Some(12),
            category: Some(category.into()),
            is_available: Some(available),
            created_at,
        });
        id
    }

    pub fn add_plan(&self, name: &str, price_per_meal: Decimal, meals_per_week: i32) -> Uuid {
        let id = Uuid::new_v4();
        self.tables().plans.push(MealPlanRow {
            id,
            name: name.into(),
            description: None,
            price_per_meal,
            meals_per_week,
            is_active: Some(true),
        });
        id
    }

    pub fn add_subscription(
        &self,
        user: Uuid,
        plan: Uuid,
        status: &str,
        created_at: OffsetDateTime,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.tables().subscriptions.push(SubscriptionRecord {
            id,
            user_id: user,
            meal_plan_id: plan,
            status: status.into(),
            created_at,
        });
        id
    }

    pub fn add_schedule(&self, user: Uuid, meal: Uuid, date: Date) -> Uuid {
        let mut t = self.tables();
        let (seq, _) = t.tick();
        let id = Uuid::new_v4();
        t.schedules.push(ScheduleRecord {
            id,
            user_id: user,
            meal_id: Some(meal),
            scheduled_date: date,
            is_eaten: Some(false),
            is_skipped: Some(false),
            seq,
        });
        id
    }

    pub fn schedule_row(&self, id: Uuid) -> Option<ScheduledMealRow> {
        let t = self.tables();
        t.schedules.iter().find(|s| s.id == id).map(|s| t.joined(s))
    }

    pub fn add_referral(&self, referrer: Uuid, referred: Option<Uuid>, code: &str) -> Uuid {
        let mut t = self.tables();
        let (_, created_at) = t.tick();
        let id = Uuid::new_v4();
        t.referrals.push(ReferralRow {
            id,
            referrer_user_id: Some(referrer),
            referred_user_id: referred,
            referral_code: code.into(),
            reward_amount: Some(Decimal::from(500)),
            status: Some(if referred.is_some() { "completed" } else { "active" }.into()),
            created_at,
        });
        id
    }

    pub fn referrals_of(&self, referrer: Uuid) -> Vec<ReferralRow> {
        self.tables()
            .referrals
            .iter()
            .filter(|r| r.referrer_user_id == Some(referrer))
            .cloned()
            .collect()
    }

    pub fn add_credit(&self, user: Uuid, amount: Decimal, source: &str, used: bool) -> Uuid {
        assert!(amount >= Decimal::ZERO, "user_credits violates CHECK (amount >= 0)");
        let mut t = self.tables();
        let (_, created_at) = t.tick();
        let id = Uuid::new_v4();
        t.credits.push(CreditRow {
            id,
            user_id: Some(user),
            amount,
            source: source.into(),
            description: None,
            is_used: Some(used),
            created_at,
        });
        id
    }

    pub fn credits_of(&self, user: Uuid) -> Vec<CreditRow> {
        self.tables()
            .credits
            .iter()
            .filter(|c| c.user_id == Some(user))
            .cloned()
            .collect()
    }

    pub fn add_profile(&self, user: Uuid, email: &str) {
        self.tables().profiles.insert(user, email.into());
    }

    /// The next `n` code-holder inserts hit a conflict and write nothing.
    pub fn reject_code_inserts(&self, n: usize) {
        self.tables().rejected_code_inserts = n;
    }

    /// The next code-holder insert loses to a concurrent request that has
    /// just stored `code` for the same referrer.
    pub fn lose_code_race_to(&self, code: &str) {
        let mut t = self.tables();
        t.rejected_code_inserts = 1;
        t.rival_code = Some(code.into());
    }

    /// Every code passed to `insert_code`, in call order.
    pub fn attempted_codes(&self) -> Vec<String> {
        self.tables().attempted_codes.clone()
    }
}

#[async_trait]
impl CatalogRepo for MemoryStore {
    async fn list_available_meals(&self) -> anyhow::Result<Vec<MealRow>> {
        let t = self.tables();
        t.check("meals")?;
        let mut rows: Vec<MealRow> = t
            .meals
            .iter()
            .filter(|m| m.is_available == Some(true))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_meal(&self, meal_id: Uuid) -> anyhow::Result<Option<MealRow>> {
        let t = self.tables();
        t.check("meals")?;
        Ok(t.meals.iter().find(|m| m.id == meal_id).cloned())
    }

    async fn list_active_plans(&self) -> anyhow::Result<Vec<MealPlanRow>> {
        let t = self.tables();
        t.check("meal_plans")?;
        let mut rows: Vec<MealPlanRow> = t
            .plans
            .iter()
            .filter(|p| p.is_active == Some(true) && p.price_per_meal > Decimal::ZERO)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            let wa = a.price_per_meal * Decimal::from(a.meals_per_week);
            let wb = b.price_per_meal * Decimal::from(b.meals_per_week);
            wa.cmp(&wb).then_with(|| a.name.cmp(&b.name))
        });
        Ok(rows)
    }
}

#[async_trait]
impl ReferralRepo for MemoryStore {
    async fn find_code(&self, referrer: Uuid) -> anyhow::Result<Option<String>> {
        let t = self.tables();
        t.check("referrals")?;
        Ok(t.referrals
            .iter()
            .filter(|r| r.referrer_user_id == Some(referrer) && r.referred_user_id.is_none())
            .min_by_key(|r| r.created_at)
            .map(|r| r.referral_code.clone()))
    }

    async fn insert_code(
        &self,
        referrer: Uuid,
        code: &str,
        reward: Decimal,
    ) -> anyhow::Result<bool> {
        let mut t = self.tables();
        t.check("referrals")?;
        t.attempted_codes.push(code.into());
        if t.rejected_code_inserts > 0 {
            t.rejected_code_inserts -= 1;
            if let Some(rival) = t.rival_code.take() {
                let (_, created_at) = t.tick();
                t.referrals.push(ReferralRow {
                    id: Uuid::new_v4(),
                    referrer_user_id: Some(referrer),
                    referred_user_id: None,
                    referral_code: rival,
                    reward_amount: Some(reward),
                    status: Some("active".into()),
                    created_at,
                });
            }
            return Ok(false);
        }
        let conflict = t.referrals.iter().any(|r| {
            r.referred_user_id.is_none()
                && (r.referrer_user_id == Some(referrer) || r.referral_code == code)
        });
        if conflict {
            return Ok(false);
        }
        let (_, created_at) = t.tick();
        t.referrals.push(ReferralRow {
            id: Uuid::new_v4(),
            referrer_user_id: Some(referrer),
            referred_user_id: None,
            referral_code: code.into(),
            reward_amount: Some(reward),
            status: Some("active".into()),
            created_at,
        });
        Ok(true)
    }

    async fn find_referrer_by_code(&self, code: &str) -> anyhow::Result<Option<Uuid>> {
        let t = self.tables();
        t.check("referrals")?;
        Ok(t.referrals
            .iter()
            .find(|r| r.referral_code == code && r.referred_user_id.is_none())
            .and_then(|r| r.referrer_user_id))
    }

    async fn insert_claim(
        &self,
        referrer: Uuid,
        referred: Uuid,
        code: &str,
        reward: Decimal,
    ) -> anyhow::Result<Option<ReferralRow>> {
        let mut t = self.tables();
        t.check("referrals")?;
        if t.referrals.iter().any(|r| r.referred_user_id == Some(referred)) {
            return Ok(None);
        }
        let (_, created_at) = t.tick();
        let row = ReferralRow {
            id: Uuid::new_v4(),
            referrer_user_id: Some(referrer),
            referred_user_id: Some(referred),
            referral_code: code.into(),
            reward_amount: Some(reward),
            status: Some("pending".into()),
            created_at,
        };
        t.referrals.push(row.clone());
        Ok(Some(row))
    }

    async fn list_referrals(&self, referrer: Uuid) -> anyhow::Result<Vec<ReferralRow>> {
        self.tables().check("referrals")?;
        Ok(self.referrals_of(referrer))
    }

    async fn list_credits(
        &self,
        user: Uuid,
        source: Option<&str>,
    ) -> anyhow::Result<Vec<CreditRow>> {
        let t = self.tables();
        t.check("user_credits")?;
        Ok(t.credits
            .iter()
            .filter(|c| c.user_id == Some(user))
            .filter(|c| source.map_or(true, |s| c.source == s))
            .cloned()
            .collect())
    }

    async fn find_profile_email(&self, user: Uuid) -> anyhow::Result<Option<String>> {
        let t = self.tables();
        t.check("profiles")?;
        Ok(t.profiles.get(&user).cloned())
    }
}

#[async_trait]
impl ScheduleRepo for MemoryStore {
    async fn list_range(
        &self,
        user: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<ScheduledMealRow>> {
        let t = self.tables();
        t.check("weekly_meal_schedules")?;
        let rows = t.sorted_schedules(|s| {
            s.user_id == user && s.scheduled_date >= from && s.scheduled_date <= to
        });
        Ok(rows.into_iter().map(|s| t.joined(s)).collect())
    }

    async fn list_from(
        &self,
        user: Uuid,
        from: Date,
        limit: i64,
    ) -> anyhow::Result<Vec<ScheduledMealRow>> {
        let t = self.tables();
        t.check("weekly_meal_schedules")?;
        let rows = t.sorted_schedules(|s| s.user_id == user && s.scheduled_date >= from);
        Ok(rows
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|s| t.joined(s))
            .collect())
    }

    async fn set_flags(
        &self,
        user: Uuid,
        schedule_id: Uuid,
        is_eaten: bool,
        is_skipped: bool,
    ) -> anyhow::Result<Option<ScheduledMealRow>> {
        let mut t = self.tables();
        t.check("weekly_meal_schedules")?;
        let Some(idx) = t
            .schedules
            .iter()
            .position(|s| s.id == schedule_id && s.user_id == user)
        else {
            return Ok(None);
        };
        t.schedules[idx].is_eaten = Some(is_eaten);
        t.schedules[idx].is_skipped = Some(is_skipped);
        Ok(Some(t.joined(&t.schedules[idx])))
    }

    async fn set_meal(
        &self,
        user: Uuid,
        schedule_id: Uuid,
        meal_id: Uuid,
    ) -> anyhow::Result<Option<ScheduledMealRow>> {
        let mut t = self.tables();
        t.check("weekly_meal_schedules")?;
        let Some(idx) = t
            .schedules
            .iter()
            .position(|s| s.id == schedule_id && s.user_id == user)
        else {
            return Ok(None);
        };
        t.schedules[idx].meal_id = Some(meal_id);
        Ok(Some(t.joined(&t.schedules[idx])))
    }
}

#[async_trait]
impl SubscriptionRepo for MemoryStore {
    async fn find_active(&self, user: Uuid) -> anyhow::Result<Option<SubscriptionWithPlanRow>> {
        let t = self.tables();
        t.check("user_subscriptions")?;
        let Some(sub) = t
            .subscriptions
            .iter()
            .filter(|s| s.user_id == user && s.status == ACTIVE_STATUS)
            .max_by_key(|s| s.created_at)
        else {
            return Ok(None);
        };
        let plan = t.plans.iter().find(|p| p.id == sub.meal_plan_id);
        Ok(Some(SubscriptionWithPlanRow {
            id: sub.id,
            user_id: Some(sub.user_id),
            meal_plan_id: Some(sub.meal_plan_id),
            status: Some(sub.status.clone()),
            delivery_days: Some(vec!["monday".into(), "wednesday".into(), "friday".into()]),
            delivery_time_slot: Some("12:00-14:00".into()),
            delivery_address: Some("12 Admiralty Way, Lekki".into()),
            dietary_preferences: None,
            start_date: sub.created_at.date(),
            end_date: None,
            created_at: sub.created_at,
            plan_name: plan.map(|p| p.name.clone()),
            price_per_meal: plan.map(|p| p.price_per_meal),
            meals_per_week: plan.map(|p| p.meals_per_week),
        }))
    }
}
