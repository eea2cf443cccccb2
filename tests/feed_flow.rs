// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

//! Feed and tweet lifecycle properties against a real database.
//! Run with: DATABASE_URL=... cargo test -- --ignored

mod common;

use common::{seed_media, seed_user, test_db, unique_token};
use microblog_api::{feed, store};

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database; set DATABASE_URL"]
async fn created_tweet_keeps_attachment_order_and_content() {
    let db = test_db().await;
    let mut conn = db.get_connection().await.unwrap();
    let author = seed_user(&mut conn, "alice").await;
    let first = seed_media(&mut conn, author).await;
    let second = seed_media(&mut conn, author).await;

    // attach in reverse id order on purpose
    let tweet = feed::create_and_return_tweet(&mut conn, author, "hello", &[second, first])
        .await
        .unwrap();

    let second_path = store::media::get_media(&mut conn, second)
        .await
        .unwrap()
        .unwrap()
        .file_path;
    let first_path = store::media::get_media(&mut conn, first)
        .await
        .unwrap()
        .unwrap()
        .file_path;
    assert_eq!(tweet.attachments, vec![second_path, first_path]);
    assert_eq!(tweet.author.id, author);
    assert_eq!(tweet.likes, vec![]);

    let fetched = feed::get_enriched_tweet(&mut conn, tweet.id).await.unwrap();
    assert_eq!(fetched.content, "hello");
    assert_eq!(fetched.attachments, tweet.attachments);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database; set DATABASE_URL"]
async fn unknown_media_reference_fails_without_leaving_a_tweet() {
    let db = test_db().await;
    let mut conn = db.get_connection().await.unwrap();
    let author = seed_user(&mut conn, "alice").await;
    let valid = seed_media(&mut conn, author).await;
    let content = unique_token("doomed");

    // media id 0 can never exist (serial ids start at 1)
    let err = store::tweets::create_tweet(&mut conn, author, &content, &[valid, 0])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "ReferenceNotFound");
    assert!(err.to_string().contains("Media ID 0"));

    // the whole transaction rolled back: no tweet row, no partial links
    use diesel::prelude::*;
    use diesel_async::RunQueryDsl;
    use microblog_api::schema::tweets;
    let leftovers: i64 = tweets::table
        .filter(tweets::content.eq(&content))
        .count()
        .get_result(&mut conn)
        .await
        .unwrap();
    assert_eq!(leftovers, 0);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database; set DATABASE_URL"]
async fn delete_cascades_likes_and_links() {
    let db = test_db().await;
    let mut conn = db.get_connection().await.unwrap();
    let author = seed_user(&mut conn, "alice").await;
    let fan = seed_user(&mut conn, "bob").await;
    let blob = seed_media(&mut conn, author).await;

    let tweet_id = store::tweets::create_tweet(&mut conn, author, "short lived", &[blob])
        .await
        .unwrap();
    store::likes::add_like(&mut conn, tweet_id, fan).await.unwrap();

    let detached = store::tweets::delete_tweet(&mut conn, tweet_id, author)
        .await
        .unwrap();
    assert_eq!(detached.len(), 1);

    assert!(store::tweets::get_tweet(&mut conn, tweet_id)
        .await
        .unwrap()
        .is_none());
    assert!(store::likes::list_likes(&mut conn, tweet_id)
        .await
        .unwrap()
        .is_empty());
    assert!(store::tweets::get_attached_media_paths(&mut conn, tweet_id)
        .await
        .unwrap()
        .is_empty());

    // deleting again is a clean NotFound, not a crash
    let err = store::tweets::delete_tweet(&mut conn, tweet_id, author)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "NotFound");
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database; set DATABASE_URL"]
async fn shared_media_survives_deleting_one_of_its_tweets() {
    let db = test_db().await;
    let mut conn = db.get_connection().await.unwrap();
    let author = seed_user(&mut conn, "alice").await;
    let blob = seed_media(&mut conn, author).await;

    let keeper = store::tweets::create_tweet(&mut conn, author, "keeper", &[blob])
        .await
        .unwrap();
    let doomed = store::tweets::create_tweet(&mut conn, author, "doomed", &[blob])
        .await
        .unwrap();

    let detached = store::tweets::delete_tweet(&mut conn, doomed, author)
        .await
        .unwrap();
    assert!(detached.is_empty(), "still-linked media must not be detached");

    let paths = store::tweets::get_attached_media_paths(&mut conn, keeper)
        .await
        .unwrap();
    assert_eq!(paths.len(), 1);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database; set DATABASE_URL"]
async fn non_author_cannot_delete() {
    let db = test_db().await;
    let mut conn = db.get_connection().await.unwrap();
    let author = seed_user(&mut conn, "alice").await;
    let intruder = seed_user(&mut conn, "mallory").await;

    let tweet_id = store::tweets::create_tweet(&mut conn, author, "mine", &[])
        .await
        .unwrap();

    let err = store::tweets::delete_tweet(&mut conn, tweet_id, intruder)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "Forbidden");
    assert!(store::tweets::get_tweet(&mut conn, tweet_id)
        .await
        .unwrap()
        .is_some());
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database; set DATABASE_URL"]
async fn double_like_yields_one_row_and_double_unlike_is_safe() {
    let db = test_db().await;
    let mut conn = db.get_connection().await.unwrap();
    let author = seed_user(&mut conn, "alice").await;
    let fan = seed_user(&mut conn, "bob").await;

    let tweet_id = store::tweets::create_tweet(&mut conn, author, "likeable", &[])
        .await
        .unwrap();

    store::likes::add_like(&mut conn, tweet_id, fan).await.unwrap();
    store::likes::add_like(&mut conn, tweet_id, fan).await.unwrap();
    let likes = store::likes::list_likes(&mut conn, tweet_id).await.unwrap();
    assert_eq!(likes.len(), 1);
    assert_eq!(likes[0].user_id, fan);

    store::likes::remove_like(&mut conn, tweet_id, fan).await.unwrap();
    store::likes::remove_like(&mut conn, tweet_id, fan).await.unwrap();
    assert!(store::likes::list_likes(&mut conn, tweet_id)
        .await
        .unwrap()
        .is_empty());
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database; set DATABASE_URL"]
async fn liking_a_missing_tweet_is_a_reference_error() {
    let db = test_db().await;
    let mut conn = db.get_connection().await.unwrap();
    let fan = seed_user(&mut conn, "bob").await;

    let err = store::likes::add_like(&mut conn, 0, fan).await.unwrap_err();
    assert_eq!(err.kind(), "ReferenceNotFound");
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database; set DATABASE_URL"]
async fn timeline_orders_by_like_count_descending() {
    let db = test_db().await;
    let mut conn = db.get_connection().await.unwrap();
    let author = seed_user(&mut conn, "alice").await;
    let fans = [
        seed_user(&mut conn, "f1").await,
        seed_user(&mut conn, "f2").await,
        seed_user(&mut conn, "f3").await,
    ];

    let three_likes = store::tweets::create_tweet(&mut conn, author, "popular", &[])
        .await
        .unwrap();
    let one_like = store::tweets::create_tweet(&mut conn, author, "quiet", &[])
        .await
        .unwrap();
    let two_likes = store::tweets::create_tweet(&mut conn, author, "middle", &[])
        .await
        .unwrap();

    for fan in &fans {
        store::likes::add_like(&mut conn, three_likes, *fan).await.unwrap();
    }
    store::likes::add_like(&mut conn, one_like, fans[0]).await.unwrap();
    store::likes::add_like(&mut conn, two_likes, fans[0]).await.unwrap();
    store::likes::add_like(&mut conn, two_likes, fans[1]).await.unwrap();

    // the database may hold rows from other tests; assert relative order
    let timeline = feed::list_all_tweets(&mut conn).await.unwrap();
    let position = |id: i32| timeline.iter().position(|t| t.id == id).unwrap();
    assert!(position(three_likes) < position(two_likes));
    assert!(position(two_likes) < position(one_like));
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database; set DATABASE_URL"]
async fn racing_like_and_unlike_converges() {
    let db = test_db().await;
    let mut conn = db.get_connection().await.unwrap();
    let author = seed_user(&mut conn, "alice").await;
    let fan = seed_user(&mut conn, "bob").await;
    let tweet_id = store::tweets::create_tweet(&mut conn, author, "contended", &[])
        .await
        .unwrap();
    drop(conn);

    let liker = async {
        let mut conn = db.get_connection().await.unwrap();
        for _ in 0..25 {
            store::likes::add_like(&mut conn, tweet_id, fan).await.unwrap();
        }
    };
    let unliker = async {
        let mut conn = db.get_connection().await.unwrap();
        for _ in 0..25 {
            store::likes::remove_like(&mut conn, tweet_id, fan).await.unwrap();
        }
    };
    tokio::join!(liker, unliker);

    // whatever the interleaving, the pair never holds more than one edge
    let mut conn = db.get_connection().await.unwrap();
    let likes = store::likes::list_likes(&mut conn, tweet_id).await.unwrap();
    assert!(likes.len() <= 1, "duplicate like rows survived the race");

    // and the state is still steerable afterwards
    store::likes::add_like(&mut conn, tweet_id, fan).await.unwrap();
    let likes = store::likes::list_likes(&mut conn, tweet_id).await.unwrap();
    assert_eq!(likes.len(), 1);
}
