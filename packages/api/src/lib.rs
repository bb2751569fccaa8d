// ABOUTME: HTTP API layer and routing for Quill
// ABOUTME: Public blog views plus authoring endpoints for tags, posts, images, and authors

use axum::{
    routing::{delete, get, post},
    Router,
};

pub mod authors_handlers;
pub mod blog_handlers;
pub mod extract;
pub mod health;
pub mod posts_handlers;
pub mod response;
pub mod state;
pub mod tags_handlers;

pub use extract::{ApiJson, ApiQuery, ApiRejection};
pub use response::{ApiError, ApiResponse};
pub use state::DbState;

/// Creates the public, read-only blog router
pub fn create_blog_router() -> Router<DbState> {
    Router::new()
        .route("/posts", get(blog_handlers::post_list))
        .route("/posts/{slug}", get(blog_handlers::post_detail))
        .route("/tags/{slug}/posts", get(blog_handlers::tag_posts))
}

/// Creates the tags API router
pub fn create_tags_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(tags_handlers::list_tags).post(tags_handlers::create_tag),
        )
        .route(
            "/{tag_id}",
            get(tags_handlers::get_tag)
                .put(tags_handlers::update_tag)
                .delete(tags_handlers::delete_tag),
        )
}

/// Creates the posts API router
pub fn create_posts_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(posts_handlers::list_posts).post(posts_handlers::create_post),
        )
        .route(
            "/{post_id}",
            get(posts_handlers::get_post)
                .put(posts_handlers::update_post)
                .delete(posts_handlers::delete_post),
        )
        .route(
            "/{post_id}/images",
            get(posts_handlers::list_images).post(posts_handlers::add_image),
        )
}

/// Creates the authors API router
pub fn create_authors_router() -> Router<DbState> {
    Router::new()
        .route("/", post(authors_handlers::create_author))
        .route(
            "/{author_id}",
            get(authors_handlers::get_author).delete(authors_handlers::delete_author),
        )
}

/// Full application router
pub fn create_router(state: DbState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/blog", create_blog_router())
        .nest("/api/tags", create_tags_router())
        .nest("/api/posts", create_posts_router())
        .route("/api/images/{image_id}", delete(posts_handlers::delete_image))
        .nest("/api/authors", create_authors_router())
        .with_state(state)
}
