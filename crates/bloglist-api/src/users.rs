use std::collections::HashMap;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, info};
use uuid::Uuid;

use bloglist_types::api::{PostSummary, RegisterRequest, UserResponse};

use crate::auth::{self, AppState};
use crate::error::ApiError;
use crate::parse_uuid;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 32;
pub const MIN_PASSWORD_LEN: usize = 3;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username_len = req.username.chars().count();
    if username_len < MIN_USERNAME_LEN {
        return Err(ApiError::validation(format!(
            "username must be at least {} characters long",
            MIN_USERNAME_LEN
        )));
    }
    if username_len > MAX_USERNAME_LEN {
        return Err(ApiError::validation(format!(
            "username must be at most {} characters long",
            MAX_USERNAME_LEN
        )));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    // Skip hashing when the name is obviously taken
    if state.db.get_user_by_username(&req.username)?.is_some() {
        return Err(ApiError::validation("username must be unique"));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let user_id = Uuid::new_v4();

    // The insert itself is the authoritative uniqueness check
    let created = state
        .db
        .create_user(&user_id.to_string(), &req.username, &req.name, &password_hash)?;
    if !created {
        return Err(ApiError::validation("username must be unique"));
    }

    info!("User {} registered", req.username);

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user_id,
            username: req.username,
            name: req.name,
            posts: vec![],
        }),
    ))
}

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();

    let users = tokio::task::spawn_blocking(move || {
        let rows = db.db.list_user_posts()?;

        // Rows arrive ordered by owner, then by position in the owner's list
        let mut posts_by_user: HashMap<String, Vec<PostSummary>> = HashMap::new();
        for (user_id, post) in rows {
            posts_by_user.entry(user_id).or_default().push(PostSummary {
                id: parse_uuid(&post.id, "post id"),
                title: post.title,
                author: post.author,
                url: post.url,
                likes: post.likes,
            });
        }

        let users: Vec<UserResponse> = db
            .db
            .list_users()?
            .into_iter()
            .map(|row| UserResponse {
                id: parse_uuid(&row.id, "user id"),
                posts: posts_by_user.remove(&row.id).unwrap_or_default(),
                username: row.username,
                name: row.name,
            })
            .collect();

        Ok::<_, anyhow::Error>(users)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        anyhow::anyhow!("list users task failed")
    })??;

    Ok(Json(users))
}
