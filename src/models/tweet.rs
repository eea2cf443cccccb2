// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::like::LikeDetail;
use crate::models::user::UserRef;
use crate::schema::{tweet_media, tweets};

/// Model for a tweet row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tweets)]
pub struct Tweet {
    pub id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: NaiveDateTime,
}

/// DTO for inserting a tweet.
#[derive(Debug, Insertable)]
#[diesel(table_name = tweets)]
pub struct NewTweet {
    pub author_id: i32,
    pub content: String,
    pub created_at: NaiveDateTime,
}

/// Attachment link between a tweet and a media row. Link id order is
/// attachment order.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tweet_media)]
pub struct TweetMediaLink {
    pub id: i32,
    pub tweet_id: i32,
    pub media_id: i32,
}

/// DTO for inserting an attachment link.
#[derive(Debug, Insertable)]
#[diesel(table_name = tweet_media)]
pub struct NewTweetMediaLink {
    pub tweet_id: i32,
    pub media_id: i32,
}

/// The externally visible tweet representation: the tweet combined with its
/// resolved author, media storage paths and full like list.
#[derive(Debug, Serialize, Deserialize)]
pub struct EnrichedTweet {
    pub id: i32,
    pub content: String,
    pub attachments: Vec<String>,
    pub author: UserRef,
    pub likes: Vec<LikeDetail>,
}
