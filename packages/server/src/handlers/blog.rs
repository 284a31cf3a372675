use axum::Json;
use axum::extract::{Path, State};
use common::BlogPost;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

const NOT_FOUND_MESSAGE: &str = "Blog post not found.";

#[utoipa::path(
    get,
    path = "/blogs",
    tag = "Blogs",
    operation_id = "listBlogs",
    summary = "List every blog post",
    description = "Returns all stored blog posts in the store's natural order. There is no filtering, sorting or pagination.",
    responses(
        (status = 200, description = "All blog posts", body = Vec<BlogPost>),
        (status = 500, description = "Connection or query failure", body = String, content_type = "text/plain"),
    ),
)]
#[instrument(skip(state))]
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, AppError> {
    state.db.ensure_connected().await?;
    let store = state.db.store().await?;
    let posts = store.find_all().await?;

    tracing::debug!(count = posts.len(), "Listing blog posts");
    Ok(Json(posts))
}

#[utoipa::path(
    get,
    path = "/blogs/{slug}",
    tag = "Blogs",
    operation_id = "getBlog",
    summary = "Get a blog post by slug",
    description = "Looks up a single post. Slugs are compared case-insensitively after trimming surrounding whitespace.",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Blog post", body = BlogPost),
        (status = 404, description = "No post with this slug", body = String, content_type = "text/plain"),
        (status = 500, description = "Connection or query failure", body = String, content_type = "text/plain"),
    ),
)]
#[instrument(skip_all, fields(slug = %slug))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    state.db.ensure_connected().await?;
    let store = state.db.store().await?;

    store
        .find_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.into()))
}
