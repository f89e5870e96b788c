use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::dto::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("{0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                self.to_string(),
                Some(json!(errors.fields())),
            ),
            AppError::InvalidBody { status, message } => (*status, message.clone(), None),
            AppError::StorageUnavailable(msg) => {
                tracing::warn!(reason = %msg, "Save rejected, storage unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone(), None)
            }
            AppError::Storage(e) => {
                tracing::error!(error = %e, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Kunne ikke lagre loggen. Prøv igjen senere.".into(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                    None,
                )
            }
        };

        let mut error = json!({
            "message": message,
            "code": status.as_u16(),
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        if let JsonRejection::JsonDataError(_) = &rejection {
            let fields = message
                .split_once("target type: ")
                .and_then(|(_, detail)| FieldErrors::from_deserialize_error(detail));
            if let Some(fields) = fields {
                return AppError::Validation(fields);
            }
        }
        AppError::InvalidBody {
            status: rejection.status(),
            message,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
