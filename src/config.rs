use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Process configuration, read from the environment (after `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Absent: the server runs but every core endpoint answers 503.
    pub database_url: Option<String>,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
    pub run_migrations: bool,
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = CacheConfig::default();

        Self {
            database_url: get("DATABASE_URL"),
            port: get("PORT").and_then(|v| v.parse().ok()).unwrap_or(3000),
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            run_migrations: get("RUN_MIGRATIONS")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
            cache: CacheConfig {
                user_ttl: get("CACHE_TTL_USERS")
                    .and_then(|v| v.parse().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.user_ttl),
                max_users: get("CACHE_MAX_USERS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_users),
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_bool(v: &str) -> bool {
    !matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
