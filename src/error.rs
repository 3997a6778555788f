//! Error types shared by the UI controllers.
//!
//! Every variant is handled where it is raised: the controller resets the
//! affected widget to an interactive state and turns the error into a
//! notification via [`UiError::severity`] and [`UiError::user_message`].

use crate::config::{
    ANALYSIS_ERROR_MESSAGE, ANALYSIS_FAILED_MESSAGE, CLIPBOARD_FAILED_MESSAGE,
};
use crate::Severity;
use std::fmt;

/// Form input rejected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// URL empty or not matching the accepted pattern (form submission).
    InvalidUrl,
    /// "Analyze URL" pressed without a usable URL.
    UrlRequired,
    MissingSelectorValue,
    /// Preview pressed without a selector value.
    MissingPreviewValue,
    EmptySearchTerm,
    UnknownCategory(String),
}

impl ValidationError {
    pub fn severity(&self) -> Severity {
        match self {
            ValidationError::InvalidUrl => Severity::Danger,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidUrl => write!(f, "Please enter a valid URL"),
            ValidationError::UrlRequired => write!(f, "Please enter a valid URL first"),
            ValidationError::MissingSelectorValue => {
                write!(f, "Please select a selector value for extraction")
            }
            ValidationError::MissingPreviewValue => {
                write!(f, "Please select a selector value first")
            }
            ValidationError::EmptySearchTerm => write!(f, "Please enter a search term"),
            ValidationError::UnknownCategory(raw) => {
                write!(f, "Unknown selector type: {}", raw)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    Validation(ValidationError),
    /// Transport or decode failure; the string is diagnostic detail only.
    Fetch(String),
    /// The backend answered with `success: false`.
    ServerReported { message: Option<String> },
    Clipboard(String),
    Storage(String),
}

impl UiError {
    pub fn severity(&self) -> Severity {
        match self {
            UiError::Validation(e) => e.severity(),
            UiError::Fetch(_) | UiError::Clipboard(_) => Severity::Danger,
            UiError::ServerReported { .. } | UiError::Storage(_) => Severity::Warning,
        }
    }

    /// Text shown to the user in a notification.
    pub fn user_message(&self) -> String {
        match self {
            UiError::Validation(e) => e.to_string(),
            UiError::Fetch(_) => ANALYSIS_ERROR_MESSAGE.to_string(),
            UiError::ServerReported { message } => message
                .as_deref()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(ANALYSIS_FAILED_MESSAGE)
                .to_string(),
            UiError::Clipboard(_) => CLIPBOARD_FAILED_MESSAGE.to_string(),
            UiError::Storage(_) => "Could not save your preference".to_string(),
        }
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::Validation(e) => write!(f, "Validation failed: {}", e),
            UiError::Fetch(detail) => write!(f, "Request failed: {}", detail),
            UiError::ServerReported { message: Some(m) } => {
                write!(f, "Server reported failure: {}", m)
            }
            UiError::ServerReported { message: None } => write!(f, "Server reported failure"),
            UiError::Clipboard(detail) => write!(f, "Clipboard write failed: {}", detail),
            UiError::Storage(detail) => write!(f, "Storage write failed: {}", detail),
        }
    }
}

impl std::error::Error for UiError {}

impl From<ValidationError> for UiError {
    fn from(e: ValidationError) -> Self {
        UiError::Validation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_preferred_when_present() {
        let err = UiError::ServerReported {
            message: Some("Please provide a valid URL".into()),
        };
        assert_eq!(err.user_message(), "Please provide a valid URL");
        assert_eq!(err.severity(), Severity::Warning);
    }

    #[test]
    fn blank_server_message_falls_back_to_generic() {
        let err = UiError::ServerReported { message: Some("  ".into()) };
        assert_eq!(err.user_message(), ANALYSIS_FAILED_MESSAGE);
        let err = UiError::ServerReported { message: None };
        assert_eq!(err.user_message(), ANALYSIS_FAILED_MESSAGE);
    }

    #[test]
    fn url_validation_is_danger_and_value_validation_is_warning() {
        assert_eq!(UiError::from(ValidationError::InvalidUrl).severity(), Severity::Danger);
        assert_eq!(
            UiError::from(ValidationError::MissingSelectorValue).severity(),
            Severity::Warning
        );
    }
}
