// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "api-key";

/// Opaque credential lifted from the `api-key` request header. A missing or
/// empty header short-circuits the request before any handler logic runs;
/// resolving the credential to an identity is the handler's first step.
pub struct ApiKey(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ApiKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(ApiError::unauthorized)?;
        Ok(ApiKey(value.to_string()))
    }
}
