use std::time::Duration;

use moka::future::Cache;

use crate::models::users::{self, ExternalId};

/// In-process cache of users keyed by external id.
///
/// Serves `GET /api/user/{id}` lookups; `POST /api/user` invalidates the
/// entry it touched.
#[derive(Clone)]
pub struct IdentityCache {
    users: Cache<i64, users::Model>,
}

impl IdentityCache {
    pub fn new(config: &CacheConfig) -> Self {
        let users = Cache::builder()
            .max_capacity(config.max_users)
            .time_to_live(config.user_ttl)
            .build();
        Self { users }
    }

    pub async fn get(&self, external_id: ExternalId) -> Option<users::Model> {
        self.users.get(&external_id.get()).await
    }

    pub async fn put(&self, user: users::Model) {
        self.users.insert(user.external_id, user).await;
    }

    pub async fn invalidate(&self, external_id: ExternalId) {
        self.users.invalidate(&external_id.get()).await;
    }
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub user_ttl: Duration,
    pub max_users: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            user_ttl: Duration::from_secs(900), // 15 minutes
            max_users: 10_000,
        }
    }
}
