//! Domain entities - the core business objects.

mod author;
mod comment;
mod post;
mod share;
mod tag;

pub use author::Author;
pub use comment::Comment;
pub use post::{Post, PostStatus};
pub use share::ShareMessage;
pub use tag::Tag;
