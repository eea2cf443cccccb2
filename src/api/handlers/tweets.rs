// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::api::{ApiKey, AppState};
use crate::error::ApiError;
use crate::metrics;
use crate::models::EnrichedTweet;
use crate::{feed, store};

#[derive(Debug, Deserialize)]
pub struct CreateTweetRequest {
    pub tweet_data: String,
    #[serde(default)]
    pub tweet_media_ids: Vec<i32>,
}

/// Full enriched timeline, most-liked tweets first.
pub async fn list_tweets(
    State(state): State<AppState>,
    ApiKey(key): ApiKey,
) -> Result<Json<Value>, ApiError> {
    let viewer = state.identity.resolve(&key).await?;
    debug!("listing timeline for user {}", viewer.id);

    let mut conn = state.db.get_connection().await?;
    let tweets = feed::list_all_tweets(&mut conn).await?;

    Ok(Json(json!({
        "result": true,
        "tweets": tweets,
    })))
}

/// Create a tweet with optional media attachments and return it hydrated.
pub async fn create_tweet(
    State(state): State<AppState>,
    ApiKey(key): ApiKey,
    Json(body): Json<CreateTweetRequest>,
) -> Result<Json<EnrichedTweet>, ApiError> {
    let author = state.identity.resolve(&key).await?;

    let mut conn = state.db.get_connection().await?;
    let tweet =
        feed::create_and_return_tweet(&mut conn, author.id, &body.tweet_data, &body.tweet_media_ids)
            .await?;

    metrics::TWEETS_CREATED.inc();
    info!("user {} created tweet {}", author.id, tweet.id);
    Ok(Json(tweet))
}

/// Delete an own tweet with its cascade, then clean up detached blobs.
pub async fn delete_tweet(
    State(state): State<AppState>,
    Path(tweet_id): Path<i32>,
    ApiKey(key): ApiKey,
) -> Result<Json<Value>, ApiError> {
    let user = state.identity.resolve(&key).await?;

    let mut conn = state.db.get_connection().await?;
    let detached_paths = store::tweets::delete_tweet(&mut conn, tweet_id, user.id).await?;
    drop(conn);

    // The row deletes above are authoritative; a blob that cannot be
    // removed is only worth a warning.
    for path in detached_paths {
        if let Err(e) = state.blobs.remove(&path).await {
            warn!("failed to remove media file {path}: {e}");
        }
    }

    metrics::TWEETS_DELETED.inc();
    info!("user {} deleted tweet {}", user.id, tweet_id);
    Ok(Json(json!({ "result": true })))
}

pub async fn like_tweet(
    State(state): State<AppState>,
    Path(tweet_id): Path<i32>,
    ApiKey(key): ApiKey,
) -> Result<Json<Value>, ApiError> {
    let user = state.identity.resolve(&key).await?;

    let mut conn = state.db.get_connection().await?;
    store::likes::add_like(&mut conn, tweet_id, user.id).await?;

    metrics::LIKES_ADDED.inc();
    Ok(Json(json!({ "result": true })))
}

pub async fn unlike_tweet(
    State(state): State<AppState>,
    Path(tweet_id): Path<i32>,
    ApiKey(key): ApiKey,
) -> Result<Json<Value>, ApiError> {
    let user = state.identity.resolve(&key).await?;

    let mut conn = state.db.get_connection().await?;
    store::likes::remove_like(&mut conn, tweet_id, user.id).await?;

    metrics::LIKES_REMOVED.inc();
    Ok(Json(json!({ "result": true })))
}
