//! Submitted forms and their validation rules.
//!
//! Every field defaults to empty so a missing field is reported as a validation
//! error rather than a decoding failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Field name -> error messages, ready to echo back next to the form.
pub type FormErrors = BTreeMap<String, Vec<String>>;

/// "Email this post" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ShareForm {
    #[validate(length(min = 1, max = 25, message = "Enter your name (25 characters at most)."))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub to: String,
    pub comments: String,
}

impl ShareForm {
    /// Trim surrounding whitespace from every field.
    pub fn cleaned(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            to: self.to.trim().to_string(),
            comments: self.comments.trim().to_string(),
        }
    }

    pub fn check(&self) -> Result<(), FormErrors> {
        self.validate().map_err(|e| form_errors(&e))
    }
}

/// Reader comment form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(length(min = 1, max = 80, message = "Enter your name (80 characters at most)."))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub body: String,
}

impl CommentForm {
    pub fn cleaned(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            body: self.body.trim().to_string(),
        }
    }

    pub fn check(&self) -> Result<(), FormErrors> {
        self.validate().map_err(|e| form_errors(&e))
    }
}

/// Flatten validator output into per-field messages.
pub fn form_errors(errors: &ValidationErrors) -> FormErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
