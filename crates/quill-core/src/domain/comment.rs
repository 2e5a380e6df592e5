use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity - a reader's comment attached to one post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active: bool,
}

impl Comment {
    /// Create a new, active comment on `post_id`.
    pub fn new(
        post_id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            post_id,
            name: name.into(),
            email: email.into(),
            body: body.into(),
            created_at: now,
            updated_at: now,
            active: true,
        }
    }

    /// Hide the comment from readers (moderation).
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_start_active_and_can_be_moderated() {
        let mut comment = Comment::new(3, "Ann", "ann@example.com", "Nice");
        assert!(comment.active);
        comment.deactivate();
        assert!(!comment.active);
        comment.activate();
        assert!(comment.active);
    }
}
