//! Category query builder.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, IntoCondition, Query, SelectStatement};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, LoaderTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QueryResult, QuerySelect, Select,
};

use sage_core::RepoError;
use sage_core::domain::{Category, CategoryWithTotal, Post};

use super::{Annotated, AnnotatedRow, fetch_page, sub_query};
use crate::database::entity::{category, post};
use crate::database::repo_err;

/// Deferred query over categories.
#[derive(Debug, Clone)]
pub struct CategoryQuery {
    select: Select<category::Entity>,
}

impl Default for CategoryQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Posts of the outer category row.
fn posts_of_category() -> SelectStatement {
    Query::select()
        .expr(Expr::val(1))
        .from(post::Entity)
        .and_where(
            Expr::col((post::Entity, post::Column::CategoryId))
                .equals((category::Entity, category::Column::Id)),
        )
        .to_owned()
}

impl CategoryQuery {
    pub fn new() -> Self {
        Self {
            select: category::Entity::find(),
        }
    }

    pub fn into_select(self) -> Select<category::Entity> {
        self.select
    }

    pub fn none(self) -> Self {
        self.filter(super::nothing())
    }

    fn filter(self, condition: impl IntoCondition) -> Self {
        Self {
            select: self.select.filter(condition),
        }
    }

    pub fn filter_published(self, is_published: bool) -> Self {
        self.filter(category::Column::IsPublished.eq(is_published))
    }

    /// Categories with at least one post in the given publish state.
    ///
    /// Only the posts' state is tested; compose with `filter_published` to
    /// restrict the categories themselves.
    pub fn filter_published_posts(self, is_published: bool) -> Self {
        let posts = posts_of_category()
            .and_where(Expr::col((post::Entity, post::Column::IsPublished)).eq(is_published))
            .to_owned();
        self.filter(Expr::exists(posts))
    }

    /// Categories no post points at.
    pub fn filter_without_posts(self) -> Self {
        self.filter(Expr::exists(posts_of_category()).not())
    }

    /// The `limit` most recently created categories, optionally leaving one out.
    pub fn filter_recent_categories(self, limit: u64, exclude: Option<i32>) -> Self {
        let query = match exclude {
            Some(id) => self.filter(category::Column::Id.ne(id)),
            None => self,
        };
        Self {
            select: query
                .select
                .order_by_desc(category::Column::CreatedAt)
                .order_by_desc(category::Column::Id)
                .limit(limit),
        }
    }

    /// Number of published posts per category. Categories without any still
    /// come back, with a total of zero.
    pub fn annotate_total_posts(self) -> Annotated<category::Entity, CategoryTotalRow> {
        let total = sub_query(
            Query::select()
                .expr(Expr::col((post::Entity, post::Column::Id)).count())
                .from(post::Entity)
                .and_where(
                    Expr::col((post::Entity, post::Column::CategoryId))
                        .equals((category::Entity, category::Column::Id)),
                )
                .and_where(Expr::col((post::Entity, post::Column::IsPublished)).eq(true))
                .to_owned(),
        );
        Annotated::new(self.ordered().expr_as(total, "total_posts"), Utc::now())
    }

    fn ordered(self) -> Select<category::Entity> {
        self.select.order_by_asc(category::Column::Id)
    }

    pub async fn all<C: ConnectionTrait>(self, db: &C) -> Result<Vec<Category>, RepoError> {
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
    ) -> Result<(Vec<Category>, u64), RepoError> {
        let per_page = per_page.max(1);
        let (models, total) =
            fetch_page(self.ordered().paginate(db, per_page), page, per_page).await?;
        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    /// Categories with all of their posts, in two queries.
    pub async fn with_posts<C: ConnectionTrait>(
        self,
        db: &C,
    ) -> Result<Vec<(Category, Vec<Post>)>, RepoError> {
        let categories = self.ordered().all(db).await.map_err(repo_err)?;
        let posts = categories
            .load_many(
                post::Entity::find().order_by_asc(post::Column::Id),
                db,
            )
            .await
            .map_err(repo_err)?;

        Ok(categories
            .into_iter()
            .zip(posts)
            .map(|(category, posts)| {
                (category.into(), posts.into_iter().map(Into::into).collect())
            })
            .collect())
    }
}

/// Category row plus its published post count.
#[derive(Debug)]
pub struct CategoryTotalRow {
    model: category::Model,
    total_posts: i64,
}

impl FromQueryResult for CategoryTotalRow {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            model: category::Model::from_query_result(res, pre)?,
            total_posts: res.try_get(pre, "total_posts")?,
        })
    }
}

impl AnnotatedRow for CategoryTotalRow {
    type Output = CategoryWithTotal;

    fn finish(self, _now: DateTime<Utc>) -> CategoryWithTotal {
        CategoryWithTotal {
            category: self.model.into(),
            total_posts: self.total_posts,
        }
    }
}
