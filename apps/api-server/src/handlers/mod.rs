//! HTTP handlers and route configuration.

mod categories;
mod health;
mod posts;
mod sidebar;
mod tags;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/sidebar", web::get().to(sidebar::sidebar))
            .route("/categories", web::get().to(categories::list_categories))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("/{slug}", web::get().to(posts::post_detail)),
            )
            .service(
                web::scope("/tags")
                    .route("/trending", web::get().to(tags::trending_tags))
                    .route("/recent", web::get().to(tags::recent_tags)),
            ),
    );
}
