// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use std::collections::HashMap;
use tracing::debug;

use crate::error::ApiError;
use crate::models::{LikeDetail, NewTweetLike};
use crate::schema::{tweet_likes, users};
use crate::store::tweets::tweet_exists;

/// Record a like for a tweet. Liking a tweet twice is a no-op, never a
/// duplicate row: the (tweet_id, user_id) unique key plus ON CONFLICT DO
/// NOTHING makes concurrent duplicate likes converge on one edge.
pub async fn add_like(
    conn: &mut AsyncPgConnection,
    tweet_id: i32,
    user_id: i32,
) -> Result<(), ApiError> {
    if !tweet_exists(conn, tweet_id).await? {
        return Err(ApiError::reference_not_found(format!("Tweet ID {tweet_id}")));
    }

    let inserted = diesel::insert_into(tweet_likes::table)
        .values(&NewTweetLike {
            tweet_id,
            user_id,
            created_at: Utc::now().naive_utc(),
        })
        .on_conflict((tweet_likes::tweet_id, tweet_likes::user_id))
        .do_nothing()
        .execute(conn)
        .await?;

    if inserted == 0 {
        debug!("user {} already liked tweet {}", user_id, tweet_id);
    }
    Ok(())
}

/// Remove a like. Removing a like that does not exist is a no-op.
pub async fn remove_like(
    conn: &mut AsyncPgConnection,
    tweet_id: i32,
    user_id: i32,
) -> Result<(), ApiError> {
    if !tweet_exists(conn, tweet_id).await? {
        return Err(ApiError::reference_not_found(format!("Tweet ID {tweet_id}")));
    }

    diesel::delete(
        tweet_likes::table
            .filter(tweet_likes::tweet_id.eq(tweet_id))
            .filter(tweet_likes::user_id.eq(user_id)),
    )
    .execute(conn)
    .await?;
    Ok(())
}

/// List a tweet's likes with resolved display names, in like order. A
/// liking user that has since been removed is skipped.
pub async fn list_likes(
    conn: &mut AsyncPgConnection,
    tweet_id: i32,
) -> Result<Vec<LikeDetail>, ApiError> {
    let rows: Vec<(i32, String)> = tweet_likes::table
        .inner_join(users::table)
        .filter(tweet_likes::tweet_id.eq(tweet_id))
        .order(tweet_likes::id.asc())
        .select((tweet_likes::user_id, users::name))
        .load(conn)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(user_id, name)| LikeDetail { user_id, name })
        .collect())
}

/// Batch variant used by feed assembly: like lists for many tweets in one
/// query, grouped by tweet id.
pub async fn load_likes_for(
    conn: &mut AsyncPgConnection,
    tweet_ids: &[i32],
) -> Result<HashMap<i32, Vec<LikeDetail>>, ApiError> {
    if tweet_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, i32, String)> = tweet_likes::table
        .inner_join(users::table)
        .filter(tweet_likes::tweet_id.eq_any(tweet_ids))
        .order(tweet_likes::id.asc())
        .select((tweet_likes::tweet_id, tweet_likes::user_id, users::name))
        .load(conn)
        .await?;
    let mut grouped: HashMap<i32, Vec<LikeDetail>> = HashMap::new();
    for (tweet_id, user_id, name) in rows {
        grouped
            .entry(tweet_id)
            .or_default()
            .push(LikeDetail { user_id, name });
    }
    Ok(grouped)
}
