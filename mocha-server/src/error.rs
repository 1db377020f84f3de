use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use mocha_core::MochaError;
use mocha_devices::DeviceError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// 400, the request itself is unusable.
    BadRequest(String),
    /// 502, the model backend failed or timed out.
    ModelUnavailable(String),
    /// 500, the model kept requesting tools past the step bound.
    ToolLoopExceeded(String),
    /// 500, anything else.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::ModelUnavailable(msg) => (StatusCode::BAD_GATEWAY, "model_unavailable", msg),
            ApiError::ToolLoopExceeded(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "tool_loop_exceeded",
                msg,
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<MochaError> for ApiError {
    fn from(err: MochaError) -> Self {
        if err.is_transport() {
            ApiError::ModelUnavailable(err.to_string())
        } else {
            ApiError::ToolLoopExceeded(err.to_string())
        }
    }
}

impl From<DeviceError> for ApiError {
    fn from(err: DeviceError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
