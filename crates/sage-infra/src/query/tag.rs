//! Tag query builder and tag rankings.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{
    Expr, Func, IntoCondition, LikeExpr, NullOrdering, Order, Query, SelectStatement, SimpleExpr,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QueryResult, QuerySelect, Select,
};

use sage_core::domain::{Tag, TagWithCount, TagWithTotal};
use sage_core::ranking::{RecentTagsParams, TrendTagsParams};
use sage_core::{QueryError, RepoError, SearchTerm};

use super::{Annotated, AnnotatedRow, db_time, fetch_page, nothing, sub_query};
use crate::database::entity::{category, post, post_tag, tag};
use crate::database::repo_err;

/// Deferred query over tags.
#[derive(Debug, Clone)]
pub struct TagQuery {
    select: Select<tag::Entity>,
}

impl Default for TagQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Posts carrying the outer tag row. Selects nothing yet.
fn tagged_posts() -> SelectStatement {
    Query::select()
        .from(post_tag::Entity)
        .inner_join(
            post::Entity,
            Expr::col((post::Entity, post::Column::Id))
                .equals((post_tag::Entity, post_tag::Column::PostId)),
        )
        .and_where(
            Expr::col((post_tag::Entity, post_tag::Column::TagId))
                .equals((tag::Entity, tag::Column::Id)),
        )
        .to_owned()
}

fn any_of(mut posts: SelectStatement) -> SimpleExpr {
    Expr::exists(posts.expr(Expr::val(1)).to_owned())
}

fn count_of(mut posts: SelectStatement) -> SimpleExpr {
    sub_query(
        posts
            .expr(Expr::col((post::Entity, post::Column::Id)).count())
            .to_owned(),
    )
}

fn created_since(posts: &mut SelectStatement, since: DateTime<Utc>) {
    posts.and_where(Expr::col((post::Entity, post::Column::CreatedAt)).gte(db_time(since)));
}

impl TagQuery {
    pub fn new() -> Self {
        Self::from_select(tag::Entity::find())
    }

    fn from_select(select: Select<tag::Entity>) -> Self {
        Self { select }
    }

    pub fn into_select(self) -> Select<tag::Entity> {
        self.select
    }

    pub fn none(self) -> Self {
        self.filter(nothing())
    }

    fn filter(self, condition: impl IntoCondition) -> Self {
        Self::from_select(self.select.filter(condition))
    }

    pub fn filter_published(self, is_published: bool) -> Self {
        self.filter(tag::Column::IsPublished.eq(is_published))
    }

    /// Tags with at least one post in the given publish state.
    pub fn filter_published_posts(self, is_published: bool) -> Self {
        let mut posts = tagged_posts();
        posts.and_where(Expr::col((post::Entity, post::Column::IsPublished)).eq(is_published));
        self.filter(any_of(posts))
    }

    /// Tags used by at least one published post.
    pub fn exclude_unpublished_posts(self) -> Self {
        self.filter_published_posts(true)
    }

    /// Case-insensitive match on the title. Blank input leaves the query as is.
    pub fn search(self, raw: &str) -> Self {
        let Some(term) = SearchTerm::parse(raw) else {
            return self;
        };
        self.filter(
            Expr::expr(Func::lower(Expr::col((tag::Entity, tag::Column::Title))))
                .like(LikeExpr::new(term.contains_pattern()).escape('\\')),
        )
    }

    /// Tags used by a post of the category with this slug.
    pub fn filter_by_posts_category(self, category_slug: &str) -> Self {
        let mut posts = tagged_posts();
        posts
            .inner_join(
                category::Entity,
                Expr::col((category::Entity, category::Column::Id))
                    .equals((post::Entity, post::Column::CategoryId)),
            )
            .and_where(Expr::col((category::Entity, category::Column::Slug)).eq(category_slug));
        self.filter(any_of(posts))
    }

    /// Tags used by a post created between `start` and `end`, both inclusive.
    pub fn filter_by_post_date_range(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if start > end {
            return self.none();
        }
        let mut posts = tagged_posts();
        posts.and_where(
            Expr::col((post::Entity, post::Column::CreatedAt))
                .between(db_time(start), db_time(end)),
        );
        self.filter(any_of(posts))
    }

    /// Number of published posts carrying each tag.
    pub fn annotate_total_posts(self) -> Annotated<tag::Entity, TagTotalRow> {
        let mut posts = tagged_posts();
        posts.and_where(Expr::col((post::Entity, post::Column::IsPublished)).eq(true));
        Annotated::new(
            self.ordered().expr_as(count_of(posts), "total_posts"),
            Utc::now(),
        )
    }

    /// Every tag with its post count, most used first.
    pub fn sort_by_popularity(self) -> Annotated<tag::Entity, TagCountRow> {
        let posts_count = count_of(tagged_posts());
        let select = self
            .select
            .expr_as(posts_count.clone(), "posts_count")
            .order_by(posts_count, Order::Desc)
            .order_by_asc(tag::Column::Id);
        Annotated::new(select, Utc::now())
    }

    /// Tags by recent use.
    ///
    /// With `days_ago == 0` every tag is kept, most recently used first and
    /// unused tags last. Otherwise only tags used by a post created inside the
    /// window remain.
    pub fn filter_recent_tags(self, params: &RecentTagsParams) -> Result<Self, QueryError> {
        let plan = params.validate()?;
        let now = Utc::now();

        let mut select = match plan.lookback.since(now) {
            None => {
                let mut posts = tagged_posts();
                posts.expr(Expr::col((post::Entity, post::Column::CreatedAt)).max());
                self.select.order_by_with_nulls(
                    sub_query(posts),
                    Order::Desc,
                    NullOrdering::Last,
                )
            }
            Some(since) => {
                let mut posts = tagged_posts();
                created_since(&mut posts, since);
                self.select.filter(any_of(posts))
            }
        };

        if let Some(id) = plan.exclude {
            select = select.filter(tag::Column::Id.ne(id));
        }
        if let Some(limit) = plan.limit {
            select = select.order_by_asc(tag::Column::Id).limit(limit);
        }

        tracing::debug!(?plan, "Recent tags query built");
        Ok(Self::from_select(select))
    }

    /// Tags by usage frequency.
    ///
    /// Counts every associated post when `days_ago == 0`, otherwise only posts
    /// created inside the window, then keeps tags reaching `min_count`, most
    /// used first.
    pub fn filter_trend_tags(
        self,
        params: &TrendTagsParams,
    ) -> Result<Annotated<tag::Entity, TagCountRow>, QueryError> {
        let plan = params.validate()?;
        let now = Utc::now();

        let mut posts = tagged_posts();
        if let Some(since) = plan.lookback.since(now) {
            created_since(&mut posts, since);
        }
        let posts_count = count_of(posts);

        let mut select = self
            .select
            .expr_as(posts_count.clone(), "posts_count")
            .filter(Expr::expr(posts_count.clone()).gte(plan.min_count))
            .order_by(posts_count, Order::Desc)
            .order_by_asc(tag::Column::Id);
        if let Some(limit) = plan.limit {
            select = select.limit(limit);
        }

        tracing::debug!(?plan, "Trend tags query built");
        Ok(Annotated::new(select, now))
    }

    fn ordered(self) -> Select<tag::Entity> {
        self.select.order_by_asc(tag::Column::Id)
    }

    pub async fn all<C: ConnectionTrait>(self, db: &C) -> Result<Vec<Tag>, RepoError> {
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

    pub async fn page<C: ConnectionTrait>(
        self,
        db: &C,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Tag>, u64), RepoError> {
        let per_page = per_page.max(1);
        let (models, total) =
            fetch_page(self.ordered().paginate(db, per_page), page, per_page).await?;
        Ok((models.into_iter().map(Into::into).collect(), total))
    }
}

/// Tag row plus its published post count.
#[derive(Debug)]
pub struct TagTotalRow {
    model: tag::Model,
    total_posts: i64,
}

impl FromQueryResult for TagTotalRow {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            model: tag::Model::from_query_result(res, pre)?,
            total_posts: res.try_get(pre, "total_posts")?,
        })
    }
}

impl AnnotatedRow for TagTotalRow {
    type Output = TagWithTotal;

    fn finish(self, _now: DateTime<Utc>) -> TagWithTotal {
        TagWithTotal {
            tag: self.model.into(),
            total_posts: self.total_posts,
        }
    }
}

/// Tag row plus the number of posts counted by a ranking.
#[derive(Debug)]
pub struct TagCountRow {
    model: tag::Model,
    posts_count: i64,
}

impl FromQueryResult for TagCountRow {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            model: tag::Model::from_query_result(res, pre)?,
            posts_count: res.try_get(pre, "posts_count")?,
        })
    }
}

impl AnnotatedRow for TagCountRow {
    type Output = TagWithCount;

    fn finish(self, _now: DateTime<Utc>) -> TagWithCount {
        TagWithCount {
            tag: self.model.into(),
            posts_count: self.posts_count,
        }
    }
}
