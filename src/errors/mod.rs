use std::{fmt, io};
use axum::{http::StatusCode, response::{IntoResponse, Response}};

/// Error types for the notepad application
#[derive(Debug)]
pub enum NotesError {
    Io(io::Error),
    NotFound,
    InvalidIdentifier(String),
    MethodNotAllowed,
    ConfigError(String),
    TemplateError(String),
}

impl From<io::Error> for NotesError {
    fn from(err: io::Error) -> Self {
        NotesError::Io(err)
    }
}

impl From<serde_json::Error> for NotesError {
    fn from(err: serde_json::Error) -> Self {
        NotesError::ConfigError(err.to_string())
    }
}

impl fmt::Display for NotesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotesError::Io(e) => write!(f, "I/O error: {}", e),
            NotesError::NotFound => write!(f, "Not found"),
            NotesError::InvalidIdentifier(id) => write!(f, "Invalid page identifier: {:?}", id),
            NotesError::MethodNotAllowed => write!(f, "Method not allowed"),
            NotesError::ConfigError(e) => write!(f, "Config error: {}", e),
            NotesError::TemplateError(e) => write!(f, "Template error: {}", e),
        }
    }
}

impl std::error::Error for NotesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NotesError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl IntoResponse for NotesError {
    fn into_response(self) -> Response {
        let status = match &self {
            NotesError::NotFound => StatusCode::NOT_FOUND,
            NotesError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            NotesError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            NotesError::Io(_) | NotesError::ConfigError(_) | NotesError::TemplateError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
