use crate::auth::jwt::JwtKeys;
use crate::catalog::repo::CatalogRepo;
use crate::config::AppConfig;
use crate::referrals::repo::ReferralRepo;
use crate::schedule::repo::ScheduleRepo;
use crate::store::PgStore;
use crate::subscriptions::repo::SubscriptionRepo;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtKeys>,
    pub catalog: Arc<dyn CatalogRepo>,
    pub referrals: Arc<dyn ReferralRepo>,
    pub schedule: Arc<dyn ScheduleRepo>,
    pub subscriptions: Arc<dyn SubscriptionRepo>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = PgStore::connect(&config).await?;

        // Run migrations if present
        if let Err(e) = store.migrate().await {
            tracing::warn!(error = %format!("{e:#}"), "migration failed; continuing");
        }

        Ok(Self::from_store(config, Arc::new(store)))
    }

    pub fn from_store<S>(config: Arc<AppConfig>, store: Arc<S>) -> Self
    where
        S: CatalogRepo + ReferralRepo + ScheduleRepo + SubscriptionRepo + 'static,
    {
        Self {
            jwt: Arc::new(JwtKeys::from_config(&config.jwt)),
            config,
            catalog: store.clone(),
            referrals: store.clone(),
            schedule: store.clone(),
            subscriptions: store,
        }
    }

    #[cfg(test)]
    pub fn fake(store: Arc<crate::testing::MemoryStore>) -> Self {
        Self::from_store(Arc::new(AppConfig::for_tests()), store)
    }
}
