//! Deferred query builders.
//!
//! Each builder wraps a SeaORM `Select` and composes filters, annotations and
//! orderings without touching the store. Nothing runs until a materialising
//! method (`all`, `count`, `exists`, `page`) is awaited against a connection.

mod category;
mod post;
mod tag;

#[cfg(test)]
mod tests;

pub use category::{CategoryQuery, CategoryTotalRow};
pub use post::{NeighboursRow, PostAgeRow, PostQuery, PostTagCountRow, RecencyRow};
pub use tag::{TagCountRow, TagQuery, TagTotalRow};

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, SelectStatement, SimpleExpr, SubQueryStatement};
use sea_orm::{
    ConnectionTrait, EntityTrait, FromQueryResult, Paginator, PaginatorTrait, QuerySelect,
    Select, SelectorTrait,
};

use sage_core::RepoError;

use crate::database::repo_err;

/// Row shape of an annotated query, turned into its domain view once fetched.
pub trait AnnotatedRow: FromQueryResult + Sized + Send + Sync + 'static {
    type Output;

    /// Build the domain view. `now` is the instant the query was built.
    fn finish(self, now: DateTime<Utc>) -> Self::Output;
}

/// A deferred query whose rows carry derived values.
///
/// Every annotation is computed in the same round trip that fetches the rows.
pub struct Annotated<E: EntityTrait, R> {
    select: Select<E>,
    now: DateTime<Utc>,
    row: PhantomData<R>,
}

impl<E: EntityTrait, R> Clone for Annotated<E, R> {
    fn clone(&self) -> Self {
        Self {
            select: self.select.clone(),
            now: self.now,
            row: PhantomData,
        }
    }
}

impl<E, R> Annotated<E, R>
where
    E: EntityTrait,
    E::Model: Sync,
    R: AnnotatedRow,
{
    pub(crate) fn new(select: Select<E>, now: DateTime<Utc>) -> Self {
        Self {
            select,
            now,
            row: PhantomData,
        }
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.select = QuerySelect::limit(self.select, limit);
        self
    }

    pub fn into_select(self) -> Select<E> {
        self.select
    }

    pub async fn all<C: ConnectionTrait>(self, db: &C) -> Result<Vec<R::Output>, RepoError> {
        let now = self.now;
        let rows = self
            .select
            .into_model::<R>()
            .all(db)
            .await
            .map_err(repo_err)?;

        Ok(rows.into_iter().map(|row| row.finish(now)).collect())
    }

    pub async fn count<C: ConnectionTrait>(self, db: &C) -> Result<u64, RepoError> {
        self.select.count(db).await.map_err(repo_err)
    }

    /// One page (zero-based) of annotated rows plus the total row count.
    pub async fn page<C: ConnectionTrait>(
        self,
        db: &C,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<R::Output>, u64), RepoError> {
        let now = self.now;
        let per_page = per_page.max(1);
        let paginator = self.select.into_model::<R>().paginate(db, per_page);
        let (rows, total) = fetch_page(paginator, page, per_page).await?;

        Ok((rows.into_iter().map(|row| row.finish(now)).collect(), total))
    }
}

/// One zero-based page plus the total row count.
///
/// A page starting at or past the last row is empty and skips the row query,
/// so an arbitrarily large page number never reaches the offset arithmetic.
pub(crate) async fn fetch_page<'db, C, S>(
    paginator: Paginator<'db, C, S>,
    page: u64,
    per_page: u64,
) -> Result<(Vec<S::Item>, u64), RepoError>
where
    C: ConnectionTrait,
    S: SelectorTrait + 'db,
{
    let total = paginator.num_items().await.map_err(repo_err)?;
    let starts_inside = page
        .checked_mul(per_page)
        .is_some_and(|offset| offset < total);
    if !starts_inside {
        return Ok((Vec::new(), total));
    }
    let items = paginator.fetch_page(page).await.map_err(repo_err)?;
    Ok((items, total))
}

/// Wrap a select statement as a scalar or set subquery expression.
pub(crate) fn sub_query(select: SelectStatement) -> SimpleExpr {
    SimpleExpr::SubQuery(None, Box::new(SubQueryStatement::SelectStatement(select)))
}

/// A predicate no row satisfies.
pub(crate) fn nothing() -> SimpleExpr {
    Expr::cust("1 = 0")
}

pub(crate) fn db_time(at: DateTime<Utc>) -> DateTimeWithTimeZone {
    at.into()
}
