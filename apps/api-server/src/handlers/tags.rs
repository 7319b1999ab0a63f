//! Tag rankings.

use actix_web::{HttpResponse, web};

use sage_core::domain::{Tag, TagWithCount};
use sage_core::ranking::{RecentTagsParams, TrendTagsParams};
use sage_infra::TagQuery;
use sage_shared::ApiResponse;
use sage_shared::dto::TagResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(super) fn ranked_tag(view: TagWithCount) -> TagResponse {
    TagResponse {
        id: view.tag.id,
        title: view.tag.title,
        slug: view.tag.slug,
        posts_count: Some(view.posts_count),
    }
}

fn plain_tag(tag: Tag) -> TagResponse {
    TagResponse {
        id: tag.id,
        title: tag.title,
        slug: tag.slug,
        posts_count: None,
    }
}

/// Published tags by usage frequency.
///
/// GET /api/tags/trending?days_ago=&min_count=&limit=
pub async fn trending_tags(
    state: web::Data<AppState>,
    query: web::Query<TrendTagsParams>,
) -> AppResult<HttpResponse> {
    let tags = TagQuery::new()
        .filter_published(true)
        .filter_trend_tags(&query)?
        .all(state.store.conn())
        .await?;

    let body: Vec<_> = tags.into_iter().map(ranked_tag).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// Published tags by recent use.
///
/// GET /api/tags/recent?days_ago=&limit=&exclude=
pub async fn recent_tags(
    state: web::Data<AppState>,
    query: web::Query<RecentTagsParams>,
) -> AppResult<HttpResponse> {
    let tags = TagQuery::new()
        .filter_published(true)
        .filter_recent_tags(&query)?
        .all(state.store.conn())
        .await?;

    let body: Vec<_> = tags.into_iter().map(plain_tag).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}
