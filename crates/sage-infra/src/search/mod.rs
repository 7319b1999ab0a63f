//! Post search: interchangeable strategies and the fallback chain.

mod strategies;

pub use strategies::{FullTextStrategy, SubstringStrategy, TrigramStrategy};

use sea_orm::{ConnectionTrait, Select};

use sage_core::{Capabilities, RepoError, SearchTerm};

use crate::database::entity::post;
use crate::database::repo_err;

/// One way of matching posts against a search term.
pub trait SearchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the store can run this strategy at all.
    fn supported(&self, capabilities: &Capabilities) -> bool;

    /// Narrow `select` to the posts matching `term`.
    fn apply(&self, select: Select<post::Entity>, term: &SearchTerm) -> Select<post::Entity>;
}

/// Ordered list of strategies tried until one yields a row.
pub struct SearchChain {
    strategies: Vec<Box<dyn SearchStrategy>>,
}

impl Default for SearchChain {
    /// Full-text, then substring, then trigram.
    fn default() -> Self {
        Self::new(vec![
            Box::new(FullTextStrategy),
            Box::new(SubstringStrategy),
            Box::new(TrigramStrategy),
        ])
    }
}

impl SearchChain {
    pub fn new(strategies: Vec<Box<dyn SearchStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// The first supported strategy's query that matches at least one post.
    ///
    /// Strategies run one after another; unsupported ones are skipped without
    /// touching the store.
    pub async fn first_match<C: ConnectionTrait>(
        &self,
        db: &C,
        capabilities: &Capabilities,
        base: Select<post::Entity>,
        term: &SearchTerm,
    ) -> Result<Option<Select<post::Entity>>, RepoError> {
        for strategy in &self.strategies {
            if !strategy.supported(capabilities) {
                tracing::debug!(strategy = strategy.name(), "Search strategy unsupported, skipped");
                continue;
            }

            let candidate = strategy.apply(base.clone(), term);
            let hit = candidate.clone().one(db).await.map_err(repo_err)?.is_some();
            if hit {
                tracing::debug!(strategy = strategy.name(), "Search strategy matched");
                return Ok(Some(candidate));
            }
            tracing::debug!(strategy = strategy.name(), "Search strategy found nothing");
        }

        Ok(None)
    }
}
