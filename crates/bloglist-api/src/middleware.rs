//! Request authentication.
//!
//! Protected routes run four checks in order, and the first failure ends the
//! request:
//!
//! 1. [`token_from_headers`] pulls the bearer token out of `Authorization`.
//! 2. [`verify_token`] checks its signature and expiry and decodes the claims.
//! 3. [`resolve_user`] loads the account named by the `sub` claim.
//! 4. [`ensure_owner`] is run by mutating post handlers against the stored owner.
//!
//! [`require_user`] chains the first three and attaches a [`CurrentUser`]
//! extension for the handler.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;
use uuid::Uuid;

use bloglist_db::Database;
use bloglist_db::models::PostRow;
use bloglist_types::api::{Claims, UserSummary};

use crate::auth::AppState;
use crate::error::ApiError;

/// The authenticated account behind a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

impl CurrentUser {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
        }
    }
}

/// Returns the token of a `Bearer ` authorization header, if there is one.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

pub fn verify_token(token: Option<&str>, secret: &str) -> Result<Claims, ApiError> {
    let token = token.ok_or(ApiError::TokenMissing)?;

    // A missing or non-uuid `sub` fails claim deserialization, same as a bad signature
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::TokenInvalid)?;

    Ok(token_data.claims)
}

pub fn resolve_user(db: &Database, claims: &Claims) -> Result<CurrentUser, ApiError> {
    let user = db
        .get_user_by_id(&claims.sub.to_string())?
        .ok_or(ApiError::UserNotFound)?;

    Ok(CurrentUser {
        id: claims.sub,
        username: user.username,
        name: user.name,
    })
}

/// Only the account recorded as the post's owner may change it.
pub fn ensure_owner(user: &CurrentUser, post: &PostRow) -> Result<(), ApiError> {
    let owner = post
        .user_id
        .as_deref()
        .and_then(|id| id.parse::<Uuid>().ok());

    if owner == Some(user.id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Authenticate the request and attach the [`CurrentUser`].
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = verify_token(token_from_headers(req.headers()), &state.jwt_secret)
        .and_then(|claims| resolve_user(&state.db, &claims))
        .inspect_err(|e| debug!("Rejected {} {}: {}", req.method(), req.uri(), e))?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
