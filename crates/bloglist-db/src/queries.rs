use crate::models::{NewPost, PostPatch, PostRow, PostWithOwnerRow, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, Row};

impl Database {
    // -- Users --

    /// Inserts a user unless the username is taken.
    /// Returns `false` when another account already holds `username`.
    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (id, username, name, password_hash) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(username) DO NOTHING",
                (id, username, name, password_hash),
            )?;
            Ok(inserted == 1)
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, name, password_hash FROM users ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Posts --

    /// Inserts the post and appends it to the owner's post list in one
    /// transaction: either both records change or neither does.
    pub fn create_post(&self, post: &NewPost<'_>, owner_id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO posts (id, title, author, url, likes, user_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![post.id, post.title, post.author, post.url, post.likes, owner_id],
            )?;
            tx.execute(
                "INSERT INTO user_posts (user_id, post_id, position)
                 SELECT ?1, ?2, COALESCE(MAX(position), -1) + 1 FROM user_posts WHERE user_id = ?1",
                (owner_id, post.id),
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    pub fn get_post(&self, id: &str) -> Result<Option<PostRow>> {
        self.with_conn(|conn| query_post_by_id(conn, id))
    }

    /// All posts in insertion order, each joined with its owner.
    pub fn list_posts(&self) -> Result<Vec<PostWithOwnerRow>> {
        self.with_conn(|conn| {
            // LEFT JOIN so posts without an owner are still listed
            let mut stmt = conn.prepare(
                "SELECT p.id, p.title, p.author, p.url, p.likes, p.user_id, u.username, u.name
                 FROM posts p
                 LEFT JOIN users u ON p.user_id = u.id
                 ORDER BY p.rowid",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(PostWithOwnerRow {
                        post: post_from_row(row)?,
                        owner_username: row.get(6)?,
                        owner_name: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Every owned post paired with its owner id, grouped by owner and in
    /// creation order within each owner.
    pub fn list_user_posts(&self) -> Result<Vec<(String, PostRow)>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.title, p.author, p.url, p.likes, p.user_id, up.user_id
                 FROM user_posts up
                 JOIN posts p ON up.post_id = p.id
                 ORDER BY up.user_id, up.position",
            )?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(6)?, post_from_row(row)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Applies `patch` and returns the updated row, or `None` if no post has `id`.
    pub fn update_post(&self, id: &str, patch: &PostPatch<'_>) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE posts SET
                    title = COALESCE(?2, title),
                    author = COALESCE(?3, author),
                    url = COALESCE(?4, url),
                    likes = COALESCE(?5, likes)
                 WHERE id = ?1",
                rusqlite::params![id, patch.title, patch.author, patch.url, patch.likes],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_post_by_id(conn, id)
        })
    }

    /// Returns whether a post was removed. The owner's list entry goes with it.
    pub fn delete_post(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(removed == 1)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // `column` is always one of our own literals, never user input
    let sql = format!(
        "SELECT id, username, name, password_hash FROM users WHERE {} = ?1",
        column
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt.query_row([value], user_from_row).optional()?;

    Ok(row)
}

fn query_post_by_id(conn: &Connection, id: &str) -> Result<Option<PostRow>> {
    let mut stmt =
        conn.prepare("SELECT id, title, author, url, likes, user_id FROM posts WHERE id = ?1")?;

    let row = stmt.query_row([id], post_from_row).optional()?;

    Ok(row)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
    })
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        url: row.get(3)?,
        likes: row.get(4)?,
        user_id: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
