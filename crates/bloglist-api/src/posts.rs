use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info};
use uuid::Uuid;

use bloglist_db::models::{NewPost, PostPatch, PostRow, PostWithOwnerRow};
use bloglist_types::api::{CreatePostRequest, PostResponse, PostStats, UpdatePostRequest, UserSummary};
use bloglist_types::models::Post;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::list_helper;
use crate::middleware::{CurrentUser, ensure_owner};
use crate::parse_uuid;

pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = load_posts(&state).await?;

    let posts: Vec<PostResponse> = rows.into_iter().map(populated_response).collect();

    Ok(Json(posts))
}

pub async fn post_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let posts: Vec<Post> = load_posts(&state)
        .await?
        .into_iter()
        .map(|row| post_model(row.post))
        .collect();

    Ok(Json(PostStats {
        total_likes: list_helper::total_likes(&posts),
        favorite: list_helper::favorite_post(&posts),
        most_posts: list_helper::most_posts(&posts),
        most_likes: list_helper::most_likes(&posts),
    }))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_post(&post_id.to_string())?
        .ok_or(ApiError::NotFound)?;

    let owner = match row.user_id.as_deref() {
        Some(owner_id) => state.db.get_user_by_id(owner_id)?.map(|user| UserSummary {
            id: parse_uuid(&user.id, "user id"),
            username: user.username,
            name: user.name,
        }),
        None => None,
    };

    Ok(Json(post_response(row, owner)))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(title), Some(url)) = (non_blank(req.title), non_blank(req.url)) else {
        return Err(ApiError::validation("title or url is missing"));
    };
    let likes = req.likes.unwrap_or(0);
    check_likes(likes)?;

    let post_id = Uuid::new_v4();
    let id = post_id.to_string();
    let new_post = NewPost {
        id: &id,
        title: &title,
        author: req.author.as_deref(),
        url: &url,
        likes,
    };

    state.db.create_post(&new_post, &user.id.to_string())?;

    info!("Post {} created by {}", post_id, user.username);

    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            id: post_id,
            title,
            author: req.author,
            url,
            likes,
            user: Some(user.summary()),
        }),
    ))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = post_id.to_string();
    let existing = state.db.get_post(&id)?.ok_or(ApiError::NotFound)?;
    ensure_owner(&user, &existing)?;

    if req.title.as_deref().is_some_and(is_blank) || req.url.as_deref().is_some_and(is_blank) {
        return Err(ApiError::validation("title and url cannot be empty"));
    }
    if let Some(likes) = req.likes {
        check_likes(likes)?;
    }

    let patch = PostPatch {
        title: req.title.as_deref(),
        author: req.author.as_deref(),
        url: req.url.as_deref(),
        likes: req.likes,
    };

    // Deleted between the ownership check and the write
    let updated = state.db.update_post(&id, &patch)?.ok_or(ApiError::NotFound)?;

    Ok(Json(post_response(updated, Some(user.summary()))))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
) -> Result<StatusCode, ApiError> {
    let id = post_id.to_string();
    let existing = state.db.get_post(&id)?.ok_or(ApiError::NotFound)?;
    ensure_owner(&user, &existing)?;

    if !state.db.delete_post(&id)? {
        return Err(ApiError::NotFound);
    }

    info!("Post {} deleted by {}", post_id, user.username);
    Ok(StatusCode::NO_CONTENT)
}

/// Run the blocking list query off the async runtime.
async fn load_posts(state: &AppState) -> Result<Vec<PostWithOwnerRow>, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_posts())
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            anyhow::anyhow!("list posts task failed")
        })??;
    Ok(rows)
}

fn populated_response(row: PostWithOwnerRow) -> PostResponse {
    let owner = match (&row.post.user_id, row.owner_username) {
        (Some(owner_id), Some(username)) => Some(UserSummary {
            id: parse_uuid(owner_id, "post owner"),
            username,
            name: row.owner_name.unwrap_or_default(),
        }),
        _ => None,
    };
    post_response(row.post, owner)
}

fn post_response(row: PostRow, user: Option<UserSummary>) -> PostResponse {
    PostResponse {
        id: parse_uuid(&row.id, "post id"),
        title: row.title,
        author: row.author,
        url: row.url,
        likes: row.likes,
        user,
    }
}

fn post_model(row: PostRow) -> Post {
    Post {
        id: parse_uuid(&row.id, "post id"),
        user: row.user_id.as_deref().map(|id| parse_uuid(id, "post owner")),
        title: row.title,
        author: row.author,
        url: row.url,
        likes: row.likes,
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !is_blank(v))
}

fn check_likes(likes: i64) -> Result<(), ApiError> {
    if likes < 0 {
        return Err(ApiError::validation("likes cannot be negative"));
    }
    Ok(())
}
