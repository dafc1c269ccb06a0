//! Clients for the review tools a webhook can come from.
//!
//! [`ReviewTarget`] reads what a webhook payload leaves out (review title,
//! participants, changed files and their content) and writes the AI review
//! back as a single comment.

pub mod errors;
pub mod providers;
pub mod types;

pub use errors::{
    ReviewTargetConfigError, ReviewTargetError, ReviewTargetProviderError, ReviewTargetResult,
};
pub use providers::{HttpTimeouts, ReviewTarget, TargetConfig};
pub use types::{FileChange, FileRevision, ReviewDetails, ReviewRef};
