use libris_core::errors::ApplicationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success status; `message` carries
    /// the body's `message` field when the service provided one.
    #[error("the library service returned status {status}{}", render_detail(.message))]
    Server { status: u16, message: Option<String> },
    #[error("request to `{url}` failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not decode the response from `{url}`: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

fn render_detail(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {message}"),
        None => String::new(),
    }
}

impl ApiError {
    /// Display rule carried over from the original client: prefer the
    /// server-provided message, fall back to the view's generic string.
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            Self::Server { message: Some(message), .. } => message,
            _ => fallback,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for ApplicationError {
    fn from(value: ApiError) -> Self {
        ApplicationError::Api(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use libris_core::errors::{ApplicationError, InterfaceError};

    use super::ApiError;

    #[test]
    fn the_server_message_wins_over_the_view_fallback() {
        let error =
            ApiError::Server { status: 400, message: Some("Book already borrowed".to_string()) };

        assert_eq!(error.user_message("Failed to borrow book"), "Book already borrowed");
    }

    #[test]
    fn a_bare_status_falls_back_to_the_view_string() {
        let error = ApiError::Server { status: 500, message: None };

        assert_eq!(error.user_message("Failed to fetch books"), "Failed to fetch books");
        assert_eq!(error.to_string(), "the library service returned status 500");
    }

    #[test]
    fn api_errors_classify_as_service_unavailable() {
        let error = ApiError::Server { status: 503, message: None };

        let interface = ApplicationError::from(error).into_interface("req-9");
        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
    }
}
