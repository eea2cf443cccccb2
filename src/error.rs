// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Error taxonomy for every API operation. Each variant carries a stable
/// kind string and maps to exactly one transport status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or invalid credential.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not entitled to the action.
    #[error("{0}")]
    Forbidden(String),

    /// The addressed entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A referenced foreign id (e.g. a media id on tweet creation) does
    /// not exist. Distinct from NotFound: the request itself is bad.
    #[error("{0} does not exist")]
    ReferenceNotFound(String),

    /// Storage or transport fault.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Invalid API key".to_string())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn reference_not_found(what: impl Into<String>) -> Self {
        Self::ReferenceNotFound(what.into())
    }

    /// Stable kind identifier carried in the error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "Unauthorized",
            Self::Forbidden(_) => "Forbidden",
            Self::NotFound(_) => "NotFound",
            Self::ReferenceNotFound(_) => "ReferenceNotFound",
            Self::Internal(_) => "InternalError",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ReferenceNotFound(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            other => Self::Internal(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal(_)) {
            error!("internal error: {:#}", self);
        }
        let body = Json(json!({
            "result": false,
            "error_type": self.kind(),
            "error_message": self.to_string(),
        }));
        (self.status_code(), body).into_response()
    }
}
