//! # Quill Core
//!
//! The domain layer of the Quillpost blog.
//! This crate contains the blog's business rules (publishing, pagination, similar-post
//! ranking, share messages) with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod query;

pub use error::{DomainError, RepoError};
pub use pagination::{Page, Paginator};
