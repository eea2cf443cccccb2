// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::tweet_likes;

/// Model for a (user, tweet) like edge. At most one row per pair, enforced
/// by the storage-level unique key.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tweet_likes)]
pub struct TweetLike {
    pub id: i32,
    pub tweet_id: i32,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
}

/// DTO for inserting a like edge.
#[derive(Debug, Insertable)]
#[diesel(table_name = tweet_likes)]
pub struct NewTweetLike {
    pub tweet_id: i32,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
}

/// A like resolved to the liking user's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeDetail {
    pub user_id: i32,
    pub name: String,
}
