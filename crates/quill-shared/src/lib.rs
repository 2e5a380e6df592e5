//! # Quill Shared
//!
//! Wire types of the blog API: request forms with their validation rules and the
//! response bodies handlers serialize.

pub mod dto;
pub mod forms;
pub mod response;

pub use forms::{CommentForm, FormErrors, ShareForm};
pub use response::ErrorResponse;
