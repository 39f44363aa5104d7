use crate::core::ValidationError;
use crate::models::{ErrorResponse, FieldWarning};
use crate::services::AuthError;
use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};
use thiserror::Error;

/// Errors surfaced by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn error_label(&self) -> String {
        match self {
            ApiError::BadRequest(_) => "Bad request".to_string(),
            ApiError::Unauthorized(_) => "Unauthorized".to_string(),
            ApiError::NotFound(_) => "Not found".to_string(),
            ApiError::Conflict(_) => "Conflict".to_string(),
            ApiError::Validation(_) => "Validation failed".to_string(),
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }

    fn warnings(&self) -> Vec<FieldWarning> {
        match self {
            ApiError::Validation(e) => e.warnings.clone(),
            _ => Vec::new(),
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.error_label(),
            message: self.to_string(),
            status_code: status.as_u16(),
            warnings: self.warnings(),
        })
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingFields | AuthError::WeakPassword => ApiError::BadRequest(err.to_string()),
            AuthError::AlreadyExists => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::UserNotFound => ApiError::NotFound(err.to_string()),
            AuthError::TokenError(e) => ApiError::Internal(e.to_string()),
            AuthError::Hashing(e) => ApiError::Internal(e),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "invalid".to_string());
                format!("{}: {}", field, detail)
            })
            .collect();
        fields.sort();

        ApiError::BadRequest(fields.join("; "))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let status = StatusCode::BAD_REQUEST;
    let response = HttpResponse::build(status).json(ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: status.as_u16(),
        warnings: Vec::new(),
    });
    error::InternalError::from_response(err, response).into()
}

/// Handle path parameter errors
pub fn handle_path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    let status = StatusCode::BAD_REQUEST;
    let response = HttpResponse::build(status).json(ErrorResponse {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: status.as_u16(),
        warnings: Vec::new(),
    });
    error::InternalError::from_response(err, response).into()
}
