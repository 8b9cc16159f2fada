//! Summary statistics over a list of posts.
//!
//! Posts without an author are counted under the empty-string author.
//! Like sums saturate at `i64::MAX` instead of overflowing.

use std::collections::HashMap;

use bloglist_types::api::{AuthorLikes, AuthorPosts, FavoritePost};
use bloglist_types::models::Post;

pub fn total_likes(posts: &[Post]) -> i64 {
    posts
        .iter()
        .fold(0i64, |total, post| total.saturating_add(post.likes))
}

/// The most liked post. On a tie the earliest post wins.
pub fn favorite_post(posts: &[Post]) -> Option<FavoritePost> {
    posts
        .iter()
        .reduce(|best, post| if post.likes > best.likes { post } else { best })
        .map(|post| FavoritePost {
            title: post.title.clone(),
            author: post.author.clone(),
            likes: post.likes,
        })
}

/// The author with the most posts. On a tie the author who appears first wins.
pub fn most_posts(posts: &[Post]) -> Option<AuthorPosts> {
    tally_by_author(posts, |_| 1)
        .into_iter()
        .reduce(|best, entry| if entry.1 > best.1 { entry } else { best })
        .map(|(author, count)| AuthorPosts {
            author: author.to_string(),
            posts: count as usize,
        })
}

/// The author with the highest summed likes.
///
/// The running maximum starts at `{author: "", likes: 0}` and only a strictly
/// greater total replaces it, so when every author totals 0 likes the result
/// is that empty seed rather than a real author.
pub fn most_likes(posts: &[Post]) -> Option<AuthorLikes> {
    if posts.is_empty() {
        return None;
    }

    let (author, likes) = tally_by_author(posts, |post| post.likes)
        .into_iter()
        .fold(("", 0), |best, entry| if entry.1 > best.1 { entry } else { best });

    Some(AuthorLikes {
        author: author.to_string(),
        likes,
    })
}

/// Sums `weight` per author, keeping authors in order of first appearance.
fn tally_by_author<'a, F>(posts: &'a [Post], mut weight: F) -> Vec<(&'a str, i64)>
where
    F: FnMut(&Post) -> i64,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut tallies: Vec<(&'a str, i64)> = Vec::new();

    for post in posts {
        let author = post.author.as_deref().unwrap_or("");
        let slot = *slots.entry(author).or_insert_with(|| {
            tallies.push((author, 0));
            tallies.len() - 1
        });
        tallies[slot].1 = tallies[slot].1.saturating_add(weight(post));
    }

    tallies
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn post(title: &str, author: &str, likes: i64) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author: Some(author.to_string()),
            url: format!("http://example.com/{}", title.replace(' ', "-")),
            likes,
            user: None,
        }
    }

    fn sample_posts() -> Vec<Post> {
        vec![
            post("React patterns", "Michael Chan", 7),
            post("Go To Statement Considered Harmful", "Edsger W. Dijkstra", 5),
            post("Canonical string reduction", "Edsger W. Dijkstra", 12),
            post("First class tests", "Robert C. Martin", 10),
            post("TDD harms architecture", "Robert C. Martin", 0),
            post("Type wars", "Robert C. Martin", 2),
        ]
    }

    #[test]
    fn total_likes_of_empty_list_is_zero() {
        assert_eq!(total_likes(&[]), 0);
    }

    #[test]
    fn total_likes_sums_every_post() {
        let posts = vec![post("a", "x", 11), post("b", "y", 1)];
        assert_eq!(total_likes(&posts), 12);
        assert_eq!(total_likes(&sample_posts()), 36);
    }

    #[test]
    fn favorite_of_empty_list_is_none() {
        assert_eq!(favorite_post(&[]), None);
    }

    #[test]
    fn favorite_is_projection_of_most_liked() {
        let posts = vec![post("a", "x", 11), post("b", "y", 1)];
        let favorite = favorite_post(&posts).unwrap();
        assert_eq!(favorite.likes, 11);

        assert_eq!(
            favorite_post(&sample_posts()),
            Some(FavoritePost {
                title: "Canonical string reduction".into(),
                author: Some("Edsger W. Dijkstra".into()),
                likes: 12,
            })
        );
    }

    #[test]
    fn favorite_tie_keeps_first_post() {
        let posts = vec![post("first", "x", 3), post("second", "y", 3)];
        assert_eq!(favorite_post(&posts).unwrap().title, "first");
    }

    #[test]
    fn most_posts_of_empty_list_is_none() {
        assert_eq!(most_posts(&[]), None);
    }

    #[test]
    fn most_posts_counts_same_author() {
        let posts = vec![post("a", "Ada", 1), post("b", "Ada", 2)];
        assert_eq!(
            most_posts(&posts),
            Some(AuthorPosts {
                author: "Ada".into(),
                posts: 2,
            })
        );
        assert_eq!(most_posts(&sample_posts()).unwrap().author, "Robert C. Martin");
        assert_eq!(most_posts(&sample_posts()).unwrap().posts, 3);
    }

    #[test]
    fn most_posts_tie_goes_to_first_author_seen() {
        let posts = vec![
            post("a", "Grace", 0),
            post("b", "Ada", 0),
            post("c", "Ada", 0),
            post("d", "Grace", 0),
        ];
        assert_eq!(most_posts(&posts).unwrap().author, "Grace");
    }

    #[test]
    fn most_likes_of_empty_list_is_none() {
        assert_eq!(most_likes(&[]), None);
    }

    #[test]
    fn most_likes_sums_per_author() {
        let posts = vec![post("a", "Ada", 4), post("b", "Grace", 5), post("c", "Ada", 3)];
        assert_eq!(
            most_likes(&posts),
            Some(AuthorLikes {
                author: "Ada".into(),
                likes: 7,
            })
        );
        assert_eq!(
            most_likes(&sample_posts()),
            Some(AuthorLikes {
                author: "Edsger W. Dijkstra".into(),
                likes: 17,
            })
        );
    }

    #[test]
    fn most_likes_with_only_zero_likes_returns_empty_seed() {
        let posts = vec![post("a", "Ada", 0)];
        assert_eq!(
            most_likes(&posts),
            Some(AuthorLikes {
                author: String::new(),
                likes: 0,
            })
        );
    }

    #[test]
    fn most_likes_tie_goes_to_first_author_seen() {
        let posts = vec![post("a", "Grace", 5), post("b", "Ada", 2), post("c", "Ada", 3)];
        assert_eq!(
            most_likes(&posts),
            Some(AuthorLikes {
                author: "Grace".into(),
                likes: 5,
            })
        );
    }

    #[test]
    fn huge_like_counts_saturate() {
        let posts = vec![post("a", "Ada", i64::MAX), post("b", "Ada", 1), post("c", "Grace", 2)];
        assert_eq!(total_likes(&posts), i64::MAX);
        assert_eq!(
            most_likes(&posts),
            Some(AuthorLikes {
                author: "Ada".into(),
                likes: i64::MAX,
            })
        );
        assert_eq!(favorite_post(&posts).unwrap().likes, i64::MAX);
    }

    #[test]
    fn authorless_posts_group_under_empty_name() {
        let mut anonymous = post("a", "", 2);
        anonymous.author = None;
        let posts = vec![anonymous.clone(), anonymous, post("b", "Ada", 1)];

        assert_eq!(most_posts(&posts).unwrap().author, "");
        assert_eq!(most_likes(&posts).unwrap().likes, 4);
    }
}
