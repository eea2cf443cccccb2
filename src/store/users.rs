// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use std::collections::HashMap;

use crate::error::ApiError;
use crate::models::{User, UserRef};
use crate::schema::users;

/// Fetch a user row by id.
pub async fn get_user(conn: &mut AsyncPgConnection, user_id: i32) -> Result<Option<User>, ApiError> {
    let user = users::table
        .find(user_id)
        .first::<User>(conn)
        .await
        .optional()?;
    Ok(user)
}

pub async fn user_exists(conn: &mut AsyncPgConnection, user_id: i32) -> Result<bool, ApiError> {
    let count: i64 = users::table
        .filter(users::id.eq(user_id))
        .count()
        .get_result(conn)
        .await?;
    Ok(count > 0)
}

/// Resolve a list of user ids to display references, preserving the input
/// order. Ids that no longer resolve are skipped.
pub async fn load_user_refs(
    conn: &mut AsyncPgConnection,
    ids: &[i32],
) -> Result<Vec<UserRef>, ApiError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<(i32, String)> = users::table
        .filter(users::id.eq_any(ids))
        .select((users::id, users::name))
        .load(conn)
        .await?;
    let by_id: HashMap<i32, String> = rows.into_iter().collect();
    Ok(ids
        .iter()
        .filter_map(|id| {
            by_id.get(id).map(|name| UserRef {
                id: *id,
                name: name.clone(),
            })
        })
        .collect())
}
