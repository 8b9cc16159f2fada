use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A blog post. `user` is the id of the owning account; it is only `None`
/// for posts that predate ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub user: Option<Uuid>,
}
