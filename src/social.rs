// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

//! Social action coordination: policy checks on top of the social graph
//! store, and user profile aggregation.

use diesel_async::AsyncPgConnection;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::UserProfile;
use crate::store;

/// Follow another user on behalf of the actor.
///
/// The target is resolved through the user store first: an unknown target
/// is `NotFound` here at the policy layer, before the graph store's own
/// `ReferenceNotFound` mechanism check can trigger. Following yourself is
/// rejected.
pub async fn follow_user(
    conn: &mut AsyncPgConnection,
    actor: &AuthenticatedUser,
    target_id: i32,
) -> Result<(), ApiError> {
    let target = store::users::get_user(conn, target_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    if target.id == actor.id {
        return Err(ApiError::forbidden("You cannot follow yourself"));
    }
    store::social_graph::follow(conn, actor.id, target.id).await?;
    info!("user {} followed user {}", actor.id, target.id);
    Ok(())
}

/// Unfollow a user on behalf of the actor. Unknown targets are `NotFound`;
/// unfollowing someone the actor never followed is a no-op.
pub async fn unfollow_user(
    conn: &mut AsyncPgConnection,
    actor: &AuthenticatedUser,
    target_id: i32,
) -> Result<(), ApiError> {
    let target = store::users::get_user(conn, target_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    store::social_graph::unfollow(conn, actor.id, target.id).await?;
    info!("user {} unfollowed user {}", actor.id, target.id);
    Ok(())
}

/// Assemble a user's profile with both sides of their follow relationships.
pub async fn get_user_profile(
    conn: &mut AsyncPgConnection,
    user_id: i32,
) -> Result<UserProfile, ApiError> {
    let user = store::users::get_user(conn, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    let followers = store::social_graph::list_followers(conn, user.id).await?;
    let following = store::social_graph::list_following(conn, user.id).await?;
    Ok(UserProfile {
        id: user.id,
        name: user.name,
        followers,
        following,
    })
}
