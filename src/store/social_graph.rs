// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::error::ApiError;
use crate::models::{NewFollowEdge, UserRef};
use crate::schema::user_follows;
use crate::store::users::{load_user_refs, user_exists};

/// Create a follow edge. Both endpoints must exist. Re-following an already
/// followed user is a no-op: the (follower, following) unique key plus ON
/// CONFLICT DO NOTHING makes concurrent duplicate follows converge.
pub async fn follow(
    conn: &mut AsyncPgConnection,
    follower_id: i32,
    following_id: i32,
) -> Result<(), ApiError> {
    if !user_exists(conn, follower_id).await? {
        return Err(ApiError::reference_not_found(format!("User ID {follower_id}")));
    }
    if !user_exists(conn, following_id).await? {
        return Err(ApiError::reference_not_found(format!("User ID {following_id}")));
    }

    let inserted = diesel::insert_into(user_follows::table)
        .values(&NewFollowEdge {
            follower_id,
            following_id,
            created_at: Utc::now().naive_utc(),
        })
        .on_conflict((user_follows::follower_id, user_follows::following_id))
        .do_nothing()
        .execute(conn)
        .await?;

    if inserted == 0 {
        debug!("user {} already follows user {}", follower_id, following_id);
    }
    Ok(())
}

/// Remove a follow edge. Unfollowing a non-edge is a no-op.
pub async fn unfollow(
    conn: &mut AsyncPgConnection,
    follower_id: i32,
    following_id: i32,
) -> Result<(), ApiError> {
    diesel::delete(
        user_follows::table
            .filter(user_follows::follower_id.eq(follower_id))
            .filter(user_follows::following_id.eq(following_id)),
    )
    .execute(conn)
    .await?;
    Ok(())
}

/// Users who follow `user_id`, in edge insertion order.
pub async fn list_followers(
    conn: &mut AsyncPgConnection,
    user_id: i32,
) -> Result<Vec<UserRef>, ApiError> {
    let ids: Vec<i32> = user_follows::table
        .filter(user_follows::following_id.eq(user_id))
        .order(user_follows::id.asc())
        .select(user_follows::follower_id)
        .load(conn)
        .await?;
    load_user_refs(conn, &ids).await
}

/// Users whom `user_id` follows, in edge insertion order.
pub async fn list_following(
    conn: &mut AsyncPgConnection,
    user_id: i32,
) -> Result<Vec<UserRef>, ApiError> {
    let ids: Vec<i32> = user_follows::table
        .filter(user_follows::follower_id.eq(user_id))
        .order(user_follows::id.asc())
        .select(user_follows::following_id)
        .load(conn)
        .await?;
    load_user_refs(conn, &ids).await
}
