//! Fills a blog store with generated categories, tags, posts and FAQs.
//!
//! Counts come from `SEED_CATEGORIES`, `SEED_TAGS`, `SEED_POSTS` and
//! `SEED_FAQS`; `SEED_RNG` fixes the random seed for reproducible runs.

use std::env;
use std::str::FromStr;

use anyhow::Context;
use sage_infra::database::schema;
use sage_infra::{DataGenerator, DatabaseConfig, GeneratorConfig, Store};

struct SeedCounts {
    categories: usize,
    tags: usize,
    posts: usize,
    faqs: usize,
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl SeedCounts {
    fn from_env() -> Self {
        Self {
            categories: var_or("SEED_CATEGORIES", 11),
            tags: var_or("SEED_TAGS", 25),
            posts: var_or("SEED_POSTS", 50),
            faqs: var_or("SEED_FAQS", 50),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    let url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let store = Store::connect(&DatabaseConfig {
        url,
        max_connections: 5,
        min_connections: 1,
    })
    .await
    .context("failed to connect to the blog store")?;
    schema::create_schema(store.conn())
        .await
        .context("failed to create the blog schema")?;

    let counts = SeedCounts::from_env();
    let config = GeneratorConfig {
        seed: env::var("SEED_RNG").ok().and_then(|s| s.parse().ok()),
        ..GeneratorConfig::default()
    };
    let mut generator = DataGenerator::new(store.conn(), config);

    let categories = generator.create_categories(counts.categories).await?;
    let tags = generator.create_tags(counts.tags).await?;
    let posts = generator.create_posts(counts.posts).await?;
    let faqs = generator.create_faqs(counts.faqs).await?;

    tracing::info!(
        categories = categories.len(),
        tags = tags.len(),
        posts = posts.len(),
        faqs = faqs.len(),
        "Seeding finished"
    );
    Ok(())
}
