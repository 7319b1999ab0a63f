//! Sidebar blocks shared by every blog page.

use actix_web::{HttpResponse, web};

use sage_core::ranking::TrendTagsParams;
use sage_infra::{CategoryQuery, PostQuery, TagQuery};
use sage_shared::ApiResponse;
use sage_shared::dto::SidebarResponse;

use super::categories::category_response;
use super::posts::summary;
use super::tags::ranked_tag;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Categories with totals, the newest posts and the trending tags.
///
/// GET /api/sidebar
pub async fn sidebar(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let db = state.store.conn();
    let settings = &state.blog.sidebar;

    let categories = CategoryQuery::new()
        .filter_published(true)
        .annotate_total_posts()
        .all(db)
        .await?;

    let recent_posts = PostQuery::new()
        .filter_published(true)
        .filter_recent_posts(settings.recent_posts_limit, None)
        .annotate_is_recent()
        .all(db)
        .await?;

    let tags = TagQuery::new()
        .filter_published(true)
        .exclude_unpublished_posts()
        .filter_trend_tags(&TrendTagsParams {
            days_ago: settings.tags_days_ago,
            min_count: settings.tags_min_count,
            limit: Some(settings.tags_limit),
        })?
        .all(db)
        .await?;

    let body = SidebarResponse {
        categories: categories.into_iter().map(category_response).collect(),
        recent_posts: recent_posts.into_iter().map(summary).collect(),
        tags: tags.into_iter().map(ranked_tag).collect(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}
