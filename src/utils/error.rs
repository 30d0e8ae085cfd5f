use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;
use std::fmt;

/// Mongo server code for a unique index violation
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    DatabaseError(String),
    NotFound(String),
    InvalidRequest(String),
    /// Unique field already taken (`field` is the JSON field name)
    Conflict { field: String, message: String },
}

impl AppError {
    /// Raw message carried in the error body
    pub fn message(&self) -> &str {
        match self {
            AppError::DatabaseError(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidRequest(msg) => msg,
            AppError::Conflict { message, .. } => message,
        }
    }

    pub fn conflict(field: &str, value: &str) -> Self {
        AppError::Conflict {
            field: field.to_string(),
            message: format!("{} '{}' is already taken", field, value),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        if let Some(message) = duplicate_key_message(&err) {
            // Race past the pre-check
            let field = conflict_field(message);
            return AppError::Conflict {
                field: field.to_string(),
                message: format!("{} is already taken", field),
            };
        }
        AppError::DatabaseError(err.to_string())
    }
}

fn duplicate_key_message(err: &mongodb::error::Error) -> Option<&str> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            Some(write_error.message.as_str())
        }
        _ => None,
    }
}

/// Field behind an E11000 message, read from the violated index name.
/// The message also echoes the duplicate value, so only `index: <name>` is trusted.
fn conflict_field(message: &str) -> &'static str {
    let index = message
        .split("index: ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or_default();
    if index.starts_with("email") {
        "email"
    } else {
        "referralCode"
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let field = match self {
            AppError::Conflict { field, .. } => Some(field.clone()),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.message().to_string(),
            field,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::DatabaseError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::conflict("email", "a@b.c").status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_conflict_message_names_field() {
        let err = AppError::conflict("referralCode", "johndoe2025");
        assert_eq!(err.message(), "referralCode 'johndoe2025' is already taken");
        assert_eq!(err.to_string(), "Conflict: referralCode 'johndoe2025' is already taken");
    }

    #[test]
    fn test_duplicate_key_field_comes_from_index_name() {
        let by_code = "E11000 duplicate key error collection: refrel-system.users \
                       index: referralCode_1 dup key: { referralCode: \"emailbob2025\" }";
        assert_eq!(conflict_field(by_code), "referralCode");

        let by_email = "E11000 duplicate key error collection: refrel-system.users \
                        index: email_1 dup key: { email: \"bob@example.com\" }";
        assert_eq!(conflict_field(by_email), "email");

        assert_eq!(conflict_field("E11000 duplicate key error"), "referralCode");
    }
}
