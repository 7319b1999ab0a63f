//! Bulk demo data.
//!
//! Fills the store with random categories, tags, posts and FAQs. Rows are
//! inserted in batches of `GeneratorConfig::batch_size`; every `create_*`
//! returns the records it stored.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect,
};
use thiserror::Error;

use sage_core::domain::{Category, Faq, Post, Tag};
use sage_core::ranking::MAX_LOOKBACK_DAYS;
use sage_core::{DomainError, RepoError};

use crate::database::entity::{category, faq, post, post_tag, tag};
use crate::database::repo_err;

const WORDS: &[&str] = &[
    "async", "atlas", "bloom", "border", "bridge", "canvas", "cedar", "cipher", "cloud", "coast",
    "comet", "copper", "crystal", "delta", "drift", "ember", "engine", "field", "fjord", "forge",
    "garden", "glacier", "harbor", "horizon", "island", "journey", "kernel", "lantern", "ledger",
    "meadow", "mirror", "nebula", "north", "orbit", "pattern", "pixel", "prairie", "quartz",
    "raven", "river", "rust", "saddle", "signal", "silver", "summit", "tempest", "thread",
    "timber", "trail", "tundra", "valley", "vector", "velvet", "willow", "winter", "zenith",
];

const FAQ_QUESTION_MAX_CHARS: usize = 150;
const SUMMARY_CHARS: usize = 125;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Rows per INSERT statement.
    pub batch_size: usize,
    /// Upper bound on tags attached to each generated post.
    pub tags_per_post: usize,
    /// Post creation dates are spread over this many past days.
    pub spread_days: i64,
    /// Fixed seed for reproducible data.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            batch_size: 300,
            tags_per_post: 3,
            spread_days: 60,
            seed: None,
        }
    }
}

pub struct DataGenerator<'a, C> {
    db: &'a C,
    config: GeneratorConfig,
    rng: StdRng,
}

fn capitalise(words: &str) -> String {
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl<'a, C: ConnectionTrait> DataGenerator<'a, C> {
    pub fn new(db: &'a C, config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { db, config, rng }
    }

    fn words(&mut self, count: usize) -> String {
        (0..count)
            .map(|_| WORDS.choose(&mut self.rng).copied().unwrap_or("lorem"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn sentence(&mut self) -> String {
        let count = self.rng.random_range(6..=12);
        format!("{}.", capitalise(&self.words(count)))
    }

    fn text(&mut self, sentences: usize) -> String {
        (0..sentences)
            .map(|_| self.sentence())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// A three-word title whose slug is not in `taken`, which it then joins.
    fn unique_title(&mut self, taken: &mut HashSet<String>) -> String {
        let base = capitalise(&self.words(3));
        let mut title = base.clone();
        let mut suffix = 1;
        while !taken.insert(sage_core::slug::slugify(&title)) {
            suffix += 1;
            title = format!("{base} {suffix}");
        }
        title
    }

    async fn taken_slugs<E>(&self, slug: E::Column) -> Result<HashSet<String>, RepoError>
    where
        E: EntityTrait,
    {
        let slugs: Vec<String> = E::find()
            .select_only()
            .column(slug)
            .into_tuple()
            .all(self.db)
            .await
            .map_err(repo_err)?;
        Ok(slugs.into_iter().collect())
    }

    async fn max_id<E>(&self, id: E::Column) -> Result<i32, RepoError>
    where
        E: EntityTrait,
    {
        let max: Option<Option<i32>> = E::find()
            .select_only()
            .expr(Expr::col(id).max())
            .into_tuple()
            .one(self.db)
            .await
            .map_err(repo_err)?;
        Ok(max.flatten().unwrap_or(0))
    }

    async fn created_after<E>(&self, id: E::Column, after: i32) -> Result<Vec<E::Model>, RepoError>
    where
        E: EntityTrait,
    {
        E::find()
            .filter(id.gt(after))
            .order_by_asc(id)
            .all(self.db)
            .await
            .map_err(repo_err)
    }

    async fn insert_batches<A>(&self, rows: Vec<A>) -> Result<(), RepoError>
    where
        A: ActiveModelTrait + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let batch_size = self.config.batch_size.max(1);
        let mut rows = rows.into_iter().peekable();
        while rows.peek().is_some() {
            let batch: Vec<A> = rows.by_ref().take(batch_size).collect();
            <A::Entity as EntityTrait>::insert_many(batch)
                .exec_without_returning(self.db)
                .await
                .map_err(repo_err)?;
        }
        Ok(())
    }

    pub async fn create_categories(&mut self, total: usize) -> Result<Vec<Category>, GeneratorError> {
        let mut taken = self.taken_slugs::<category::Entity>(category::Column::Slug).await?;
        let mut rows = Vec::with_capacity(total);
        for _ in 0..total {
            let title = self.unique_title(&mut taken);
            let mut category = Category::new(title)?;
            category.is_published = self.rng.random_bool(0.5);
            rows.push(category::ActiveModel::from(category));
        }
        tracing::debug!(total, "Category records prepared");

        let before = self.max_id::<category::Entity>(category::Column::Id).await?;
        self.insert_batches(rows).await?;
        tracing::debug!("Categories saved into the store");

        let created = self
            .created_after::<category::Entity>(category::Column::Id, before)
            .await?;
        Ok(created.into_iter().map(Into::into).collect())
    }

    pub async fn create_tags(&mut self, total: usize) -> Result<Vec<Tag>, GeneratorError> {
        let mut taken = self.taken_slugs::<tag::Entity>(tag::Column::Slug).await?;
        let mut rows = Vec::with_capacity(total);
        for _ in 0..total {
            let title = self.unique_title(&mut taken);
            let mut tag = Tag::new(title)?;
            tag.is_published = self.rng.random_bool(0.5);
            rows.push(tag::ActiveModel::from(tag));
        }
        tracing::debug!(total, "Tag records prepared");

        let before = self.max_id::<tag::Entity>(tag::Column::Id).await?;
        self.insert_batches(rows).await?;
        tracing::debug!("Tags saved into the store");

        let created = self.created_after::<tag::Entity>(tag::Column::Id, before).await?;
        Ok(created.into_iter().map(Into::into).collect())
    }

    /// Posts spread over existing categories, each carrying up to
    /// `tags_per_post` existing tags.
    pub async fn create_posts(&mut self, total: usize) -> Result<Vec<Post>, GeneratorError> {
        let categories = category::Entity::find().all(self.db).await.map_err(repo_err)?;
        if categories.is_empty() {
            tracing::warn!("No categories in the store, no posts generated");
            return Ok(Vec::new());
        }
        let tags = tag::Entity::find().all(self.db).await.map_err(repo_err)?;

        let mut taken = self.taken_slugs::<post::Entity>(post::Column::Slug).await?;
        let now = Utc::now();
        let mut rows = Vec::with_capacity(total);
        for _ in 0..total {
            let title = self.unique_title(&mut taken);
            let category_id = categories
                .choose(&mut self.rng)
                .map(|c| c.id)
                .unwrap_or_default();
            let description = self.text(5);
            let summary: String = self.sentence().chars().take(SUMMARY_CHARS).collect();

            let mut post = Post::new(category_id, title, description)?.with_summary(summary)?;
            let spread = self.config.spread_days.clamp(0, MAX_LOOKBACK_DAYS);
            let age = Duration::days(self.rng.random_range(0..=spread))
                + Duration::seconds(self.rng.random_range(0..86_400));
            post.is_published = self.rng.random_bool(0.5);
            post.created_at = now - age;
            post.published_at = post.created_at;
            post.updated_at = post.created_at;
            rows.push(post::ActiveModel::from(post));
        }
        tracing::debug!(total, "Post records prepared");

        let before = self.max_id::<post::Entity>(post::Column::Id).await?;
        self.insert_batches(rows).await?;
        tracing::debug!("Posts saved into the store");

        let created = self
            .created_after::<post::Entity>(post::Column::Id, before)
            .await?;

        if !tags.is_empty() && self.config.tags_per_post > 0 {
            let mut links = Vec::new();
            for post in &created {
                let count = self.rng.random_range(1..=self.config.tags_per_post);
                links.extend(
                    tags.choose_multiple(&mut self.rng, count)
                        .map(|tag| post_tag::link(post.id, tag.id)),
                );
            }
            tracing::debug!(links = links.len(), "Attaching tags to posts");
            self.insert_batches(links).await?;
        }

        Ok(created.into_iter().map(Into::into).collect())
    }

    /// FAQs attached to random existing posts.
    pub async fn create_faqs(&mut self, total: usize) -> Result<Vec<Faq>, GeneratorError> {
        let post_ids: Vec<i32> = post::Entity::find()
            .select_only()
            .column(post::Column::Id)
            .into_tuple()
            .all(self.db)
            .await
            .map_err(repo_err)?;
        if post_ids.is_empty() {
            tracing::warn!("No posts in the store, no FAQs generated");
            return Ok(Vec::new());
        }

        let mut rows = Vec::with_capacity(total);
        for _ in 0..total {
            let post_id = post_ids.choose(&mut self.rng).copied().unwrap_or_default();
            let question: String = self
                .sentence()
                .trim_end_matches('.')
                .chars()
                .take(FAQ_QUESTION_MAX_CHARS - 1)
                .collect();
            let answer = self.text(2);
            rows.push(faq::ActiveModel::from(Faq::new(post_id, format!("{question}?"), answer)?));
        }
        tracing::debug!(total, "FAQ records prepared");

        let before = self.max_id::<faq::Entity>(faq::Column::Id).await?;
        self.insert_batches(rows).await?;
        tracing::debug!("FAQs saved into the store");

        let created = self.created_after::<faq::Entity>(faq::Column::Id, before).await?;
        Ok(created.into_iter().map(Into::into).collect())
    }
}
