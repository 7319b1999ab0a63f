//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use sage_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on a throwaway in-memory store.
    pub database: Option<DatabaseConfig>,
    /// Apply pending schema migrations on startup.
    pub auto_migrate: bool,
    pub blog: BlogSettings,
}

/// Listing and sidebar knobs.
#[derive(Debug, Clone)]
pub struct BlogSettings {
    pub post_per_page: u64,
    pub sidebar: SidebarSettings,
}

#[derive(Debug, Clone)]
pub struct SidebarSettings {
    pub recent_posts_limit: u64,
    pub tags_days_ago: i64,
    pub tags_min_count: i64,
    pub tags_limit: i64,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            post_per_page: 15,
            sidebar: SidebarSettings::default(),
        }
    }
}

impl Default for SidebarSettings {
    fn default() -> Self {
        Self {
            recent_posts_limit: 3,
            tags_days_ago: 0,
            tags_min_count: 1,
            tags_limit: 5,
        }
    }
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: var_or("DB_MAX_CONNECTIONS", 100),
            min_connections: var_or("DB_MIN_CONNECTIONS", 10),
        });

        let defaults = SidebarSettings::default();
        let blog = BlogSettings {
            post_per_page: var_or("BLOG_POST_PER_PAGE", 15),
            sidebar: SidebarSettings {
                recent_posts_limit: var_or("SIDEBAR_RECENT_POSTS", defaults.recent_posts_limit),
                tags_days_ago: var_or("SIDEBAR_TAGS_DAYS_AGO", defaults.tags_days_ago),
                tags_min_count: var_or("SIDEBAR_TAGS_MIN_COUNT", defaults.tags_min_count),
                tags_limit: var_or("SIDEBAR_TAGS_LIMIT", defaults.tags_limit),
            },
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: var_or("PORT", 8080),
            database,
            auto_migrate: var_or("AUTO_MIGRATE", true),
            blog,
        }
    }
}
