pub mod auth;
pub mod error;
pub mod list_helper;
pub mod middleware;
pub mod posts;
pub mod routes;
pub mod users;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use routes::router;

use tracing::warn;
use uuid::Uuid;

/// Ids are stored as text; a corrupt one is logged and replaced by the nil uuid
/// instead of failing the whole listing.
pub(crate) fn parse_uuid(raw: &str, what: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}': {}", what, raw, e);
        Uuid::default()
    })
}
