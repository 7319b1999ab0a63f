//! Post query builder.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Alias, Expr, IntoCondition, Order, Query, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, LoaderTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QueryResult, QuerySelect, Select,
};

use sage_core::domain::{
    Category, NEW_POST_DAYS, days_before, Post, PostFilter, PostWithAge, PostWithNeighbours, PostWithRecency,
    PostWithTagCount, Tag,
};
use sage_core::{Capabilities, RepoError, SearchTerm};

use super::{Annotated, AnnotatedRow, db_time, fetch_page, nothing, sub_query};
use crate::database::entity::{category, post, post_tag, tag};
use crate::database::repo_err;
use crate::search::{FullTextStrategy, SearchChain, SearchStrategy, SubstringStrategy, TrigramStrategy};

/// Deferred query over posts.
#[derive(Debug, Clone)]
pub struct PostQuery {
    select: Select<post::Entity>,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl PostQuery {
    /// Every post.
    pub fn new() -> Self {
        Self::from_select(post::Entity::find())
    }

    pub(crate) fn from_select(select: Select<post::Entity>) -> Self {
        Self { select }
    }

    pub fn into_select(self) -> Select<post::Entity> {
        self.select
    }

    /// The same query, matching nothing.
    pub fn none(self) -> Self {
        self.filter(nothing())
    }

    fn filter(self, condition: impl IntoCondition) -> Self {
        Self::from_select(self.select.filter(condition))
    }

    pub fn filter_published(self, is_published: bool) -> Self {
        self.filter(post::Column::IsPublished.eq(is_published))
    }

    /// Posts whose category has exactly this slug.
    pub fn filter_by_category(self, category_slug: &str) -> Self {
        self.filter(
            post::Column::CategoryId.in_subquery(
                Query::select()
                    .column(category::Column::Id)
                    .from(category::Entity)
                    .and_where(category::Column::Slug.eq(category_slug))
                    .to_owned(),
            ),
        )
    }

    /// Posts carrying a tag with exactly this slug. Each post appears once.
    pub fn filter_by_tag(self, tag_slug: &str) -> Self {
        self.filter(
            post::Column::Id.in_subquery(
                Query::select()
                    .column((post_tag::Entity, post_tag::Column::PostId))
                    .from(post_tag::Entity)
                    .inner_join(
                        tag::Entity,
                        Expr::col((tag::Entity, tag::Column::Id))
                            .equals((post_tag::Entity, post_tag::Column::TagId)),
                    )
                    .and_where(Expr::col((tag::Entity, tag::Column::Slug)).eq(tag_slug))
                    .to_owned(),
            ),
        )
    }

    /// Apply the optional category and tag slugs a consumer passed in.
    pub fn apply_filter(self, filter: &PostFilter) -> Self {
        let mut query = self;
        if let Some(category) = &filter.category {
            query = query.filter_by_category(category);
        }
        if let Some(tag) = &filter.tag {
            query = query.filter_by_tag(tag);
        }
        query
    }

    /// Posts created between `start` and `end`, both inclusive.
    pub fn filter_in_date_range(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if start > end {
            return self.none();
        }
        self.filter(post::Column::CreatedAt.between(db_time(start), db_time(end)))
    }

    /// Posts created within the last `days` days.
    ///
    /// A window too wide to represent keeps every post.
    pub fn filter_new_posts(self, days: i64) -> Self {
        match days_before(Utc::now(), days) {
            Some(since) => self.filter(post::Column::CreatedAt.gte(db_time(since))),
            None if days > 0 => self,
            None => self.none(),
        }
    }

    pub fn filter_by_id(self, id: i32) -> Self {
        self.filter(post::Column::Id.eq(id))
    }

    /// The `limit` most recently created posts, optionally leaving one out.
    pub fn filter_recent_posts(self, limit: u64, exclude: Option<i32>) -> Self {
        let query = match exclude {
            Some(id) => self.filter(post::Column::Id.ne(id)),
            None => self,
        };
        Self::from_select(
            query
                .select
                .order_by_desc(post::Column::CreatedAt)
                .order_by_desc(post::Column::Id)
                .limit(limit),
        )
    }

    pub fn annotate_total_tags(self) -> Annotated<post::Entity, PostTagCountRow> {
        let tags_count = sub_query(
            Query::select()
                .expr(Expr::col((post_tag::Entity, post_tag::Column::TagId)).count())
                .from(post_tag::Entity)
                .and_where(
                    Expr::col((post_tag::Entity, post_tag::Column::PostId))
                        .equals((post::Entity, post::Column::Id)),
                )
                .to_owned(),
        );
        Annotated::new(self.ordered().expr_as(tags_count, "tags_count"), Utc::now())
    }

    /// Whole days since publication, measured against one clock reading.
    pub fn annotate_published_since(self) -> Annotated<post::Entity, PostAgeRow> {
        Annotated::new(self.ordered(), Utc::now())
    }

    pub fn annotate_is_recent(self) -> Annotated<post::Entity, RecencyRow> {
        self.annotate_is_recent_within(NEW_POST_DAYS)
    }

    pub fn annotate_is_recent_within(self, days: i64) -> Annotated<post::Entity, RecencyRow> {
        let now = Utc::now();
        let is_recent: SimpleExpr = match days_before(now, days) {
            Some(threshold) => Expr::case(post::Column::CreatedAt.gte(db_time(threshold)), 1)
                .finally(0)
                .into(),
            None => Expr::val(i32::from(days > 0)).into(),
        };
        Annotated::new(self.ordered().expr_as(is_recent, "is_recent"), now)
    }

    /// Slugs of the adjacent posts, by id, inside the same category.
    pub fn annotate_next_and_prev(self) -> Annotated<post::Entity, NeighboursRow> {
        let select = self
            .ordered()
            .expr_as(neighbour_slug(Neighbour::Next), "next_post_slug")
            .expr_as(neighbour_slug(Neighbour::Prev), "prev_post_slug");
        Annotated::new(select, Utc::now())
    }

    /// Linguistic full-text match. Empty when the store has no full-text search.
    pub fn full_text_search(self, capabilities: &Capabilities, raw: &str) -> Self {
        self.single_strategy(&FullTextStrategy, capabilities, raw)
    }

    /// Case-insensitive substring match on title or description.
    pub fn substring_search(self, capabilities: &Capabilities, raw: &str) -> Self {
        self.single_strategy(&SubstringStrategy, capabilities, raw)
    }

    /// Trigram similarity match, best first. Empty without trigram support.
    pub fn trigram_similarity_search(self, capabilities: &Capabilities, raw: &str) -> Self {
        self.single_strategy(&TrigramStrategy, capabilities, raw)
    }

    fn single_strategy(
        self,
        strategy: &dyn SearchStrategy,
        capabilities: &Capabilities,
        raw: &str,
    ) -> Self {
        match SearchTerm::parse(raw) {
            None => self,
            Some(term) if strategy.supported(capabilities) => {
                Self::from_select(strategy.apply(self.select, &term))
            }
            Some(_) => self.none(),
        }
    }

    /// Search with fallback: full-text, then substring, then trigram.
    ///
    /// Blank input returns the query unchanged. Otherwise the first supported
    /// strategy that yields a row wins, and no hit at all yields an empty query.
    /// Each attempt costs one existence check against `db`.
    pub async fn heavy_search<C: ConnectionTrait>(
        self,
        db: &C,
        capabilities: &Capabilities,
        raw: &str,
    ) -> Result<Self, RepoError> {
        let Some(term) = SearchTerm::parse(raw) else {
            return Ok(self);
        };

        let chain = SearchChain::default();
        match chain
            .first_match(db, capabilities, self.select.clone(), &term)
            .await?
        {
            Some(select) => Ok(Self::from_select(select)),
            None => Ok(self.none()),
        }
    }

    /// Ordering applied on materialisation: id ascending, after any ranking order.
    fn ordered(self) -> Select<post::Entity> {
        self.select.order_by_asc(post::Column::Id)
    }

    pub async fn all<C: ConnectionTrait>(self, db: &C) -> Result<Vec<Post>, RepoError> {
        let models = self.ordered().all(db).await.map_err(repo_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn count<C: ConnectionTrait>(self, db: &C) -> Result<u64, RepoError> {
        self.select.count(db).await.map_err(repo_err)
    }

    pub async fn exists<C: ConnectionTrait>(self, db: &C) -> Result<bool, RepoError> {
        let first = self.select.one(db).await.map_err(repo_err)?;
        Ok(first.is_some())
    }

    /// One zero-based page plus the total number of matching posts.
    pub async fn page<C: ConnectionTrait>(
        self,
        db: &C,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Post>, u64), RepoError> {
        let per_page = per_page.max(1);
        let (models, total) =
            fetch_page(self.ordered().paginate(db, per_page), page, per_page).await?;
        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    /// Posts joined with their category in a single query.
    pub async fn with_category<C: ConnectionTrait>(
        self,
        db: &C,
    ) -> Result<Vec<(Post, Category)>, RepoError> {
        let rows = self
            .ordered()
            .find_also_related(category::Entity)
            .all(db)
            .await
            .map_err(repo_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|(post, category)| category.map(|c| (post.into(), c.into())))
            .collect())
    }

    /// Posts with their tags, loaded in one extra query for the whole batch.
    pub async fn with_tags<C: ConnectionTrait>(
        self,
        db: &C,
    ) -> Result<Vec<(Post, Vec<Tag>)>, RepoError> {
        let posts = self.ordered().all(db).await.map_err(repo_err)?;
        let tags = posts
            .load_many_to_many(tag::Entity, post_tag::Entity, db)
            .await
            .map_err(repo_err)?;

        Ok(posts
            .into_iter()
            .zip(tags)
            .map(|(post, tags)| (post.into(), tags.into_iter().map(Into::into).collect()))
            .collect())
    }
}

#[derive(Clone, Copy)]
enum Neighbour {
    Next,
    Prev,
}

fn neighbour_slug(direction: Neighbour) -> SimpleExpr {
    let neighbour = Alias::new("neighbour");
    let neighbour_id = Expr::col((neighbour.clone(), post::Column::Id));
    let current_id = Expr::col((post::Entity, post::Column::Id));

    let (position, order) = match direction {
        Neighbour::Next => (neighbour_id.gt(current_id), Order::Asc),
        Neighbour::Prev => (neighbour_id.lt(current_id), Order::Desc),
    };

    sub_query(
        Query::select()
            .column((neighbour.clone(), post::Column::Slug))
            .from_as(post::Entity, neighbour.clone())
            .and_where(
                Expr::col((neighbour.clone(), post::Column::CategoryId))
                    .equals((post::Entity, post::Column::CategoryId)),
            )
            .and_where(position)
            .order_by((neighbour, post::Column::Id), order)
            .limit(1)
            .to_owned(),
    )
}

/// Post row plus its tag count.
#[derive(Debug)]
pub struct PostTagCountRow {
    model: post::Model,
    tags_count: i64,
}

impl FromQueryResult for PostTagCountRow {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            model: post::Model::from_query_result(res, pre)?,
            tags_count: res.try_get(pre, "tags_count")?,
        })
    }
}

impl AnnotatedRow for PostTagCountRow {
    type Output = PostWithTagCount;

    fn finish(self, _now: DateTime<Utc>) -> PostWithTagCount {
        PostWithTagCount {
            post: self.model.into(),
            tags_count: self.tags_count,
        }
    }
}

/// Post row whose age is derived from the query's clock reading.
#[derive(Debug)]
pub struct PostAgeRow(post::Model);

impl FromQueryResult for PostAgeRow {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        post::Model::from_query_result(res, pre).map(Self)
    }
}

impl AnnotatedRow for PostAgeRow {
    type Output = PostWithAge;

    fn finish(self, now: DateTime<Utc>) -> PostWithAge {
        let post: Post = self.0.into();
        let days_since_published = post.days_since_published_at(now);
        PostWithAge {
            post,
            days_since_published,
        }
    }
}

/// Post row plus its recency flag.
#[derive(Debug)]
pub struct RecencyRow {
    model: post::Model,
    is_recent: i32,
}

impl FromQueryResult for RecencyRow {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            model: post::Model::from_query_result(res, pre)?,
            is_recent: res.try_get(pre, "is_recent")?,
        })
    }
}

impl AnnotatedRow for RecencyRow {
    type Output = PostWithRecency;

    fn finish(self, _now: DateTime<Utc>) -> PostWithRecency {
        PostWithRecency {
            post: self.model.into(),
            is_recent: self.is_recent != 0,
        }
    }
}

/// Post row plus the slugs of its neighbours.
#[derive(Debug)]
pub struct NeighboursRow {
    model: post::Model,
    next_post_slug: Option<String>,
    prev_post_slug: Option<String>,
}

impl FromQueryResult for NeighboursRow {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            model: post::Model::from_query_result(res, pre)?,
            next_post_slug: res.try_get(pre, "next_post_slug")?,
            prev_post_slug: res.try_get(pre, "prev_post_slug")?,
        })
    }
}

impl AnnotatedRow for NeighboursRow {
    type Output = PostWithNeighbours;

    fn finish(self, _now: DateTime<Utc>) -> PostWithNeighbours {
        PostWithNeighbours {
            post: self.model.into(),
            next_post_slug: self.next_post_slug,
            prev_post_slug: self.prev_post_slug,
        }
    }
}
