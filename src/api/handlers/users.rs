// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::api::{ApiKey, AppState};
use crate::error::ApiError;
use crate::metrics;
use crate::social;

/// Profile of the authenticated user.
pub async fn get_current_user(
    State(state): State<AppState>,
    ApiKey(key): ApiKey,
) -> Result<Json<Value>, ApiError> {
    let user = state.identity.resolve(&key).await?;

    let mut conn = state.db.get_connection().await?;
    let profile = social::get_user_profile(&mut conn, user.id).await?;

    Ok(Json(json!({
        "result": true,
        "user": profile,
    })))
}

/// Profile of an arbitrary user by id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    ApiKey(key): ApiKey,
) -> Result<Json<Value>, ApiError> {
    state.identity.resolve(&key).await?;

    let mut conn = state.db.get_connection().await?;
    let profile = social::get_user_profile(&mut conn, user_id).await?;

    Ok(Json(json!({
        "result": true,
        "user": profile,
    })))
}

pub async fn follow_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    ApiKey(key): ApiKey,
) -> Result<Json<Value>, ApiError> {
    let actor = state.identity.resolve(&key).await?;

    let mut conn = state.db.get_connection().await?;
    social::follow_user(&mut conn, &actor, user_id).await?;

    metrics::FOLLOWS_ADDED.inc();
    Ok(Json(json!({ "result": true })))
}

pub async fn unfollow_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    ApiKey(key): ApiKey,
) -> Result<Json<Value>, ApiError> {
    let actor = state.identity.resolve(&key).await?;

    let mut conn = state.db.get_connection().await?;
    social::unfollow_user(&mut conn, &actor, user_id).await?;

    metrics::FOLLOWS_REMOVED.inc();
    Ok(Json(json!({ "result": true })))
}
