use sea_orm::sea_query::{Condition, Expr, Func, LikeExpr, Order};
use sea_orm::{EntityName, QueryFilter, QueryOrder, Select};

use sage_core::search::TRIGRAM_THRESHOLD;
use sage_core::{Capabilities, SearchTerm};

use super::SearchStrategy;
use crate::database::entity::post;

/// Postgres linguistic search over title and description.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullTextStrategy;

impl SearchStrategy for FullTextStrategy {
    fn name(&self) -> &'static str {
        "full_text"
    }

    fn supported(&self, capabilities: &Capabilities) -> bool {
        capabilities.full_text
    }

    fn apply(&self, select: Select<post::Entity>, term: &SearchTerm) -> Select<post::Entity> {
        let table = post::Entity.table_name();
        select.filter(Expr::cust_with_values(
            format!(
                r#"to_tsvector(COALESCE("{table}"."title", '') || ' ' || COALESCE("{table}"."description", '')) @@ plainto_tsquery(?)"#
            ),
            [term.as_str()],
        ))
    }
}

/// Case-insensitive contains on title or description. Runs everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringStrategy;

impl SearchStrategy for SubstringStrategy {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn supported(&self, _capabilities: &Capabilities) -> bool {
        true
    }

    fn apply(&self, select: Select<post::Entity>, term: &SearchTerm) -> Select<post::Entity> {
        let pattern = term.contains_pattern();
        let contains = |column: post::Column| {
            Expr::expr(Func::lower(Expr::col((post::Entity, column))))
                .like(LikeExpr::new(pattern.as_str()).escape('\\'))
        };

        select.filter(
            Condition::any()
                .add(contains(post::Column::Title))
                .add(contains(post::Column::Description)),
        )
    }
}

/// `pg_trgm` similarity, best match first.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrigramStrategy;

impl SearchStrategy for TrigramStrategy {
    fn name(&self) -> &'static str {
        "trigram"
    }

    fn supported(&self, capabilities: &Capabilities) -> bool {
        capabilities.trigram
    }

    fn apply(&self, select: Select<post::Entity>, term: &SearchTerm) -> Select<post::Entity> {
        let table = post::Entity.table_name();
        let similarity = Expr::cust_with_values(
            format!(r#"similarity("{table}"."title", ?) + similarity("{table}"."description", ?)"#),
            [term.as_str(), term.as_str()],
        );

        select
            .filter(Expr::expr(similarity.clone()).gt(TRIGRAM_THRESHOLD))
            .order_by(similarity, Order::Desc)
    }
}
