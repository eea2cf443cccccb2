// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::user_follows;

/// Model for a directed follow relationship. Following is not mutual; each
/// direction is its own edge, unique per (follower, following) pair.
#[derive(Debug, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = user_follows)]
pub struct FollowEdge {
    pub id: i32,
    pub follower_id: i32,
    pub following_id: i32,
    pub created_at: NaiveDateTime,
}

/// DTO for inserting a follow edge.
#[derive(Debug, Insertable)]
#[diesel(table_name = user_follows)]
pub struct NewFollowEdge {
    pub follower_id: i32,
    pub following_id: i32,
    pub created_at: NaiveDateTime,
}
