use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::parcel::ParcelStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidRole(String),

    #[error("you cannot send a parcel to yourself")]
    SelfAddressed,

    #[error("{0}")]
    InvalidState(String),

    #[error("cannot change status from {from:?} to {to:?}")]
    IllegalTransition {
        from: ParcelStatus,
        to: ParcelStatus,
    },

    #[error("{0}")]
    NoOp(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code; clients match on this, not the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::InvalidRole(_) => "INVALID_ROLE",
            AppError::SelfAddressed => "SELF_ADDRESSED",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::IllegalTransition { .. } => "ILLEGAL_TRANSITION",
            AppError::NoOp(_) => "NO_OP",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidRole(_) | AppError::SelfAddressed | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidState(_) | AppError::IllegalTransition { .. } | AppError::NoOp(_) => {
                StatusCode::CONFLICT
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "code": self.code(),
            "message": self.to_string(),
        }));

        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use crate::models::parcel::ParcelStatus;

    #[test]
    fn illegal_transition_message_names_both_states() {
        let err = AppError::IllegalTransition {
            from: ParcelStatus::Requested,
            to: ParcelStatus::Delivered,
        };
        assert_eq!(
            err.to_string(),
            "cannot change status from Requested to Delivered"
        );
        assert_eq!(err.code(), "ILLEGAL_TRANSITION");
    }
}
