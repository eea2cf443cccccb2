// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for the database-backed integration suites. These tests
//! need a running PostgreSQL reachable through DATABASE_URL and are gated
//! behind #[ignore] so a plain `cargo test` stays self-contained.

#![allow(dead_code)]

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use microblog_api::config::DatabaseConfig;
use microblog_api::db::Database;
use microblog_api::schema::{media, users};

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// A token that is unique across test runs and across threads.
pub fn unique_token(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{nanos}-{n}")
}

/// Connect to the test database and bring the schema up to date.
pub async fn test_db() -> Database {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a test PostgreSQL database");
    Database::connect(&DatabaseConfig {
        url,
        max_connections: 5,
    })
    .await
    .expect("failed to connect to the test database")
}

/// Insert a user with a fresh credential and return its id.
pub async fn seed_user(conn: &mut AsyncPgConnection, name: &str) -> i32 {
    diesel::insert_into(users::table)
        .values((
            users::name.eq(name),
            users::api_key.eq(unique_token("key")),
        ))
        .returning(users::id)
        .get_result(conn)
        .await
        .expect("failed to seed user")
}

/// Insert a user and also return its credential, for HTTP-level tests.
pub async fn seed_user_with_key(conn: &mut AsyncPgConnection, name: &str) -> (i32, String) {
    let key = unique_token("key");
    let id = diesel::insert_into(users::table)
        .values((users::name.eq(name), users::api_key.eq(&key)))
        .returning(users::id)
        .get_result(conn)
        .await
        .expect("failed to seed user");
    (id, key)
}

/// Insert a media metadata row owned by `owner_id` and return its id.
pub async fn seed_media(conn: &mut AsyncPgConnection, owner_id: i32) -> i32 {
    let path = format!("media/{owner_id}/{}", unique_token("blob"));
    diesel::insert_into(media::table)
        .values((media::owner_id.eq(owner_id), media::file_path.eq(path)))
        .returning(media::id)
        .get_result(conn)
        .await
        .expect("failed to seed media")
}
