use super::Post;

/// Subject and body of a "recommend this post" email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMessage {
    pub subject: String,
    pub body: String,
}

impl ShareMessage {
    /// Compose the fixed template. `post_url` must already be absolute.
    pub fn compose(post: &Post, post_url: &str, sender_name: &str, comments: &str) -> Self {
        Self {
            subject: format!("{} recommends you read {}", sender_name, post.title),
            body: format!(
                "Read {} at {}\n\n{}'s comments: {}",
                post.title, post_url, sender_name, comments
            ),
        }
    }
}
