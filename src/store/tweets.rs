// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use std::collections::HashMap;
use tracing::debug;

use crate::error::ApiError;
use crate::models::{NewTweet, NewTweetMediaLink, Tweet, User};
use crate::schema::{media, tweet_likes, tweet_media, tweets, users};

/// Create a tweet and its attachment links in one transaction.
///
/// Every referenced media id is validated before anything is written, so a
/// bad reference rolls the whole call back: no tweet row, no partial links.
pub async fn create_tweet(
    conn: &mut AsyncPgConnection,
    author_id: i32,
    content: &str,
    media_ids: &[i32],
) -> Result<i32, ApiError> {
    conn.transaction::<i32, ApiError, _>(|conn| {
        async move {
            if !media_ids.is_empty() {
                let existing: Vec<i32> = media::table
                    .filter(media::id.eq_any(media_ids))
                    .select(media::id)
                    .load(conn)
                    .await?;
                if let Some(missing) = media_ids.iter().find(|id| !existing.contains(id)) {
                    return Err(ApiError::reference_not_found(format!("Media ID {missing}")));
                }
            }

            let tweet_id: i32 = diesel::insert_into(tweets::table)
                .values(&NewTweet {
                    author_id,
                    content: content.to_string(),
                    created_at: Utc::now().naive_utc(),
                })
                .returning(tweets::id)
                .get_result(conn)
                .await?;

            if !media_ids.is_empty() {
                let links: Vec<NewTweetMediaLink> = media_ids
                    .iter()
                    .map(|media_id| NewTweetMediaLink {
                        tweet_id,
                        media_id: *media_id,
                    })
                    .collect();
                diesel::insert_into(tweet_media::table)
                    .values(&links)
                    .execute(conn)
                    .await?;
            }

            debug!("created tweet {} with {} attachments", tweet_id, media_ids.len());
            Ok(tweet_id)
        }
        .scope_boxed()
    })
    .await
}

pub async fn get_tweet(
    conn: &mut AsyncPgConnection,
    tweet_id: i32,
) -> Result<Option<Tweet>, ApiError> {
    let tweet = tweets::table
        .find(tweet_id)
        .first::<Tweet>(conn)
        .await
        .optional()?;
    Ok(tweet)
}

pub async fn get_tweet_with_author(
    conn: &mut AsyncPgConnection,
    tweet_id: i32,
) -> Result<Option<(Tweet, User)>, ApiError> {
    let row = tweets::table
        .inner_join(users::table)
        .filter(tweets::id.eq(tweet_id))
        .first::<(Tweet, User)>(conn)
        .await
        .optional()?;
    Ok(row)
}

pub async fn tweet_exists(conn: &mut AsyncPgConnection, tweet_id: i32) -> Result<bool, ApiError> {
    let count: i64 = tweets::table
        .filter(tweets::id.eq(tweet_id))
        .count()
        .get_result(conn)
        .await?;
    Ok(count > 0)
}

/// Delete a tweet with its full cascade in one transaction: likes,
/// attachment links, media rows that nothing else references, then the
/// tweet row itself.
///
/// Only the author may delete. Returns the storage paths of the media rows
/// that were dropped so the caller can clean up backing blobs after commit;
/// blob cleanup is best-effort and never part of the transaction.
pub async fn delete_tweet(
    conn: &mut AsyncPgConnection,
    tweet_id: i32,
    requester_id: i32,
) -> Result<Vec<String>, ApiError> {
    conn.transaction::<Vec<String>, ApiError, _>(|conn| {
        async move {
            let tweet = tweets::table
                .find(tweet_id)
                .first::<Tweet>(conn)
                .await
                .optional()?;
            let Some(tweet) = tweet else {
                return Err(ApiError::not_found("Tweet not found"));
            };
            if tweet.author_id != requester_id {
                return Err(ApiError::forbidden("You can only delete your own tweets"));
            }

            diesel::delete(tweet_likes::table.filter(tweet_likes::tweet_id.eq(tweet_id)))
                .execute(conn)
                .await?;

            let media_ids: Vec<i32> = tweet_media::table
                .filter(tweet_media::tweet_id.eq(tweet_id))
                .order(tweet_media::id.asc())
                .select(tweet_media::media_id)
                .load(conn)
                .await?;

            diesel::delete(tweet_media::table.filter(tweet_media::tweet_id.eq(tweet_id)))
                .execute(conn)
                .await?;

            // Drop media rows that no other tweet still links; rows that are
            // still referenced stay behind, and their links stay valid.
            let mut detached_paths = Vec::new();
            for media_id in media_ids {
                let still_linked: i64 = tweet_media::table
                    .filter(tweet_media::media_id.eq(media_id))
                    .count()
                    .get_result(conn)
                    .await?;
                if still_linked > 0 {
                    continue;
                }
                let path: Option<String> = diesel::delete(media::table.find(media_id))
                    .returning(media::file_path)
                    .get_result(conn)
                    .await
                    .optional()?;
                if let Some(path) = path {
                    detached_paths.push(path);
                }
            }

            diesel::delete(tweets::table.find(tweet_id))
                .execute(conn)
                .await?;

            debug!(
                "deleted tweet {} ({} media rows detached)",
                tweet_id,
                detached_paths.len()
            );
            Ok(detached_paths)
        }
        .scope_boxed()
    })
    .await
}

/// Resolve a tweet's attachment links to media storage paths, in attachment
/// order. Links whose media row is gone are skipped, not an error.
pub async fn get_attached_media_paths(
    conn: &mut AsyncPgConnection,
    tweet_id: i32,
) -> Result<Vec<String>, ApiError> {
    let paths = tweet_media::table
        .inner_join(media::table)
        .filter(tweet_media::tweet_id.eq(tweet_id))
        .order(tweet_media::id.asc())
        .select(media::file_path)
        .load::<String>(conn)
        .await?;
    Ok(paths)
}

/// Batch variant used by feed assembly: attachment paths for many tweets in
/// one query, grouped by tweet id.
pub async fn load_attachments_for(
    conn: &mut AsyncPgConnection,
    tweet_ids: &[i32],
) -> Result<HashMap<i32, Vec<String>>, ApiError> {
    if tweet_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, String)> = tweet_media::table
        .inner_join(media::table)
        .filter(tweet_media::tweet_id.eq_any(tweet_ids))
        .order(tweet_media::id.asc())
        .select((tweet_media::tweet_id, media::file_path))
        .load(conn)
        .await?;
    let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();
    for (tweet_id, path) in rows {
        grouped.entry(tweet_id).or_default().push(path);
    }
    Ok(grouped)
}
