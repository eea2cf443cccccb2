// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

diesel::table! {
    users (id) {
        id -> Integer,
        name -> Varchar,
        api_key -> Varchar,
    }
}

diesel::table! {
    tweets (id) {
        id -> Integer,
        author_id -> Integer,
        content -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    media (id) {
        id -> Integer,
        owner_id -> Integer,
        file_path -> Varchar,
    }
}

diesel::table! {
    tweet_media (id) {
        id -> Integer,
        tweet_id -> Integer,
        media_id -> Integer,
    }
}

diesel::table! {
    tweet_likes (id) {
        id -> Integer,
        tweet_id -> Integer,
        user_id -> Integer,
        created_at -> Timestamp,
    }
}

diesel::table! {
    user_follows (id) {
        id -> Integer,
        follower_id -> Integer,
        following_id -> Integer,
        created_at -> Timestamp,
    }
}

diesel::joinable!(tweets -> users (author_id));
diesel::joinable!(media -> users (owner_id));
diesel::joinable!(tweet_media -> tweets (tweet_id));
diesel::joinable!(tweet_media -> media (media_id));
diesel::joinable!(tweet_likes -> tweets (tweet_id));
diesel::joinable!(tweet_likes -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    tweets,
    media,
    tweet_media,
    tweet_likes,
    user_follows,
);
