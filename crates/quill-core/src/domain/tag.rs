use serde::{Deserialize, Serialize};
use slug::slugify;

/// Tag entity. Posts and tags are joined many-to-many.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: 0,
            slug: slugify(&name),
            name,
        }
    }
}
