use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author entity - the account a post is attributed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Author {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: 0,
            username: username.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}
