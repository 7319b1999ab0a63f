//! Category listing.

use actix_web::{HttpResponse, web};

use sage_core::domain::CategoryWithTotal;
use sage_infra::CategoryQuery;
use sage_shared::ApiResponse;
use sage_shared::dto::CategoryResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(super) fn category_response(view: CategoryWithTotal) -> CategoryResponse {
    CategoryResponse {
        id: view.category.id,
        title: view.category.title,
        slug: view.category.slug,
        total_posts: view.total_posts,
    }
}

/// Published categories with their published post totals.
///
/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = CategoryQuery::new()
        .filter_published(true)
        .annotate_total_posts()
        .all(state.store.conn())
        .await?;

    let body: Vec<_> = categories.into_iter().map(category_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}
