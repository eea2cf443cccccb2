// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

//! Feed assembly: reconstructs the externally visible tweet representation
//! from the tweet, media, like and user tables, and applies the timeline
//! sort policy.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use std::cmp::Reverse;

use crate::error::ApiError;
use crate::models::{EnrichedTweet, Tweet, User};
use crate::schema::{tweets, users};
use crate::store;

/// Load the global timeline: every tweet enriched with its author, media
/// paths and like list, most-liked first.
///
/// Tweets and their per-tweet collections are batch-loaded in three queries
/// rather than one round trip per tweet.
pub async fn list_all_tweets(conn: &mut AsyncPgConnection) -> Result<Vec<EnrichedTweet>, ApiError> {
    let rows: Vec<(Tweet, User)> = tweets::table
        .inner_join(users::table)
        .order((tweets::created_at.asc(), tweets::id.asc()))
        .load(conn)
        .await?;

    let tweet_ids: Vec<i32> = rows.iter().map(|(tweet, _)| tweet.id).collect();
    let mut attachments = store::tweets::load_attachments_for(conn, &tweet_ids).await?;
    let mut likes = store::likes::load_likes_for(conn, &tweet_ids).await?;

    let mut feed: Vec<EnrichedTweet> = rows
        .into_iter()
        .map(|(tweet, author)| EnrichedTweet {
            id: tweet.id,
            content: tweet.content,
            attachments: attachments.remove(&tweet.id).unwrap_or_default(),
            author: author.into(),
            likes: likes.remove(&tweet.id).unwrap_or_default(),
        })
        .collect();

    sort_by_like_count(&mut feed);
    Ok(feed)
}

/// Timeline sort policy: descending by like count. The sort is stable, so
/// ties keep the creation order the tweets were loaded in and repeated
/// calls with no mutations produce identical output.
pub fn sort_by_like_count(feed: &mut [EnrichedTweet]) {
    feed.sort_by_key(|tweet| Reverse(tweet.likes.len()));
}

/// Enrich a single tweet. `NotFound` if the tweet does not exist.
pub async fn get_enriched_tweet(
    conn: &mut AsyncPgConnection,
    tweet_id: i32,
) -> Result<EnrichedTweet, ApiError> {
    let (tweet, author) = store::tweets::get_tweet_with_author(conn, tweet_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tweet not found"))?;
    let attachments = store::tweets::get_attached_media_paths(conn, tweet.id).await?;
    let likes = store::likes::list_likes(conn, tweet.id).await?;
    Ok(EnrichedTweet {
        id: tweet.id,
        content: tweet.content,
        attachments,
        author: author.into(),
        likes,
    })
}

/// Create a tweet and hand back the fully hydrated representation, so the
/// caller sees exactly what a subsequent timeline read would show.
pub async fn create_and_return_tweet(
    conn: &mut AsyncPgConnection,
    author_id: i32,
    content: &str,
    media_ids: &[i32],
) -> Result<EnrichedTweet, ApiError> {
    let tweet_id = store::tweets::create_tweet(conn, author_id, content, media_ids).await?;
    get_enriched_tweet(conn, tweet_id).await
}
