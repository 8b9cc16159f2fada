use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};

use crate::auth::{self, AppState};
use crate::middleware::require_user;
use crate::{posts, users};

/// The full `/api` surface. Mutating post routes sit behind [`require_user`].
pub fn router(state: AppState) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.clone(), require_user);

    Router::new()
        .route(
            "/api/posts",
            get(posts::list_posts).merge(post(posts::create_post).route_layer(auth_layer.clone())),
        )
        .route("/api/posts/stats", get(posts::post_stats))
        .route(
            "/api/posts/{id}",
            get(posts::get_post).merge(
                put(posts::update_post)
                    .delete(posts::delete_post)
                    .route_layer(auth_layer),
            ),
        )
        .route("/api/users", get(users::list_users).post(users::register))
        .route("/api/login", post(auth::login))
        .fallback(unknown_endpoint)
        .with_state(state)
}

async fn unknown_endpoint() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "unknown endpoint" })),
    )
}
