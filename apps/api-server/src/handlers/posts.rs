//! Post listing and detail.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use sage_core::domain::{NEW_POST_DAYS, PostFilter, PostWithRecency};
use sage_core::ports::{FaqRepository, PostRepository};
use sage_infra::PostQuery;
use sage_shared::dto::{CategoryRef, FaqResponse, ListPostsParams, PostDetail, PostSummary, TagRef};
use sage_shared::{ApiResponse, Page};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(super) fn summary(view: PostWithRecency) -> PostSummary {
    let post = view.post;
    PostSummary {
        id: post.id,
        title: post.title,
        slug: post.slug,
        summary: post.summary,
        is_recent: view.is_recent,
        published_at: post.published_at,
        created_at: post.created_at,
    }
}

/// Published posts, optionally narrowed by category, tag and search.
///
/// GET /api/posts?search=&cat=&tag=&page=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsParams>,
) -> AppResult<HttpResponse> {
    let params = query.into_inner();
    let db = state.store.conn();
    let filter = PostFilter {
        category: params.cat,
        tag: params.tag,
    };

    let posts = PostQuery::new()
        .filter_published(true)
        .apply_filter(&filter)
        .heavy_search(
            db,
            &state.store.capabilities(),
            params.search.as_deref().unwrap_or_default(),
        )
        .await?;

    let page = params.page.unwrap_or(1).max(1);
    let per_page = state.blog.post_per_page;
    let (items, total) = posts
        .annotate_is_recent()
        .page(db, page - 1, per_page)
        .await?;

    let page = Page::new(items.into_iter().map(summary).collect(), page, per_page, total);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// A published post with its category, tags, FAQs and neighbours.
///
/// GET /api/posts/{slug}
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let db = state.store.conn();

    let post = state
        .posts
        .find_by_slug(&slug)
        .await?
        .filter(|post| post.is_published)
        .ok_or_else(|| AppError::not_found("Post", &slug))?;

    let this = PostQuery::new().filter_by_id(post.id);
    let neighbours = this
        .clone()
        .annotate_next_and_prev()
        .all(db)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::not_found("Post", &slug))?;
    let category = this
        .clone()
        .with_category(db)
        .await?
        .into_iter()
        .next()
        .map(|(_, category)| category)
        .ok_or_else(|| AppError::not_found("Category of post", &slug))?;
    let tags = this
        .with_tags(db)
        .await?
        .into_iter()
        .next()
        .map(|(_, tags)| tags)
        .unwrap_or_default();
    let faqs = state.faqs.list_for_post(post.id).await?;

    let now = Utc::now();
    let post = neighbours.post;
    let detail = PostDetail {
        id: post.id,
        is_recent: post.is_recent_at(now, NEW_POST_DAYS),
        days_since_published: post.days_since_published_at(now),
        reading_time: post.reading_time(),
        title: post.title,
        slug: post.slug,
        summary: post.summary,
        description: post.description,
        category: CategoryRef {
            title: category.title,
            slug: category.slug,
        },
        tags: tags
            .into_iter()
            .filter(|tag| tag.is_published)
            .map(|tag| TagRef {
                title: tag.title,
                slug: tag.slug,
            })
            .collect(),
        faqs: faqs
            .into_iter()
            .map(|faq| FaqResponse {
                question: faq.question,
                answer: faq.answer,
            })
            .collect(),
        next_post_slug: neighbours.next_post_slug,
        prev_post_slug: neighbours.prev_post_slug,
        published_at: post.published_at,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}
