//! Video field validation helpers.
//!
//! Length limits follow the external publish platform's constraints so a
//! video accepted here cannot be rejected later for metadata reasons.

use crate::error::CoreError;

/// Maximum title length (external platform limit).
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum description length (external platform limit).
pub const MAX_DESCRIPTION_LENGTH: usize = 5_000;

/// Maximum length of a comment body.
pub const MAX_COMMENT_LENGTH: usize = 2_000;

/// Maximum length of a rejection reason (creator or editor).
pub const MAX_REJECTION_REASON_LENGTH: usize = 2_000;

/// Validate a video title: non-blank and within the length limit.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a video description length.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a comment body: non-blank and within the length limit.
pub fn validate_comment_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation("Comment must not be empty".into()));
    }
    if body.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional rejection reason length.
pub fn validate_rejection_reason(reason: &str) -> Result<(), CoreError> {
    if reason.chars().count() > MAX_REJECTION_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Rejection reason must be at most {MAX_REJECTION_REASON_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate that a media or thumbnail URL is an absolute http(s) URL.
///
/// The object-storage layer returns durable URLs; anything else is a client
/// mistake.
pub fn validate_media_url(url: &str) -> Result<(), CoreError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid media URL '{url}'. Must be an absolute http(s) URL"
        )))
    }
}
