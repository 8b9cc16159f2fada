//! Database row types: these map directly to SQLite rows.
//! Distinct from bloglist-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub name: String,
    pub password_hash: String,
}

pub struct PostRow {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub user_id: Option<String>,
}

/// A post joined with its owner's public fields.
pub struct PostWithOwnerRow {
    pub post: PostRow,
    pub owner_username: Option<String>,
    pub owner_name: Option<String>,
}

/// Fields of a new post. `likes` is already defaulted by the caller.
pub struct NewPost<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub author: Option<&'a str>,
    pub url: &'a str,
    pub likes: i64,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Default)]
pub struct PostPatch<'a> {
    pub title: Option<&'a str>,
    pub author: Option<&'a str>,
    pub url: Option<&'a str>,
    pub likes: Option<i64>,
}
