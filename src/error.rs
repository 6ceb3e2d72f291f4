use thiserror::Error;

use crate::routes::Route;

/// Text shown under the file input when the attachment is rejected.
pub const UNSUPPORTED_FORMAT_MESSAGE: &str = "Choisir un format supporté (.JPG, .JPEG, .PNG)";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("{}", UNSUPPORTED_FORMAT_MESSAGE)]
    UnsupportedFormat { file_name: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("Missing field: {0}")]
    Missing(&'static str),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Failures reported by a bill store. The display text is what the error
/// page shows to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Erreur 404")]
    NotFound,

    #[error("Erreur 500")]
    Internal,

    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No user is signed in")]
    SignedOut,

    #[error("Malformed session user: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum BilledError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Route {0} is not served to this user")]
    Forbidden(Route),

    #[error("Route {0} has no page")]
    UnsupportedRoute(Route),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BilledError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_displays_the_inline_message() {
        let err = AttachmentError::UnsupportedFormat { file_name: "hello.txt".into() };
        assert_eq!(err.to_string(), UNSUPPORTED_FORMAT_MESSAGE);
        assert_eq!(err.to_string(), "Choisir un format supporté (.JPG, .JPEG, .PNG)");
    }

    #[test]
    fn store_errors_display_status_text() {
        assert_eq!(StoreError::NotFound.to_string(), "Erreur 404");
        assert_eq!(StoreError::Internal.to_string(), "Erreur 500");
        assert_eq!(StoreError::Backend("Erreur 401".into()).to_string(), "Erreur 401");
    }
}
