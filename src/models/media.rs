// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::media;

/// Metadata row for an uploaded blob. The backing bytes live in the media
/// store; this row only points at them.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = media)]
pub struct Media {
    pub id: i32,
    pub owner_id: i32,
    pub file_path: String,
}

/// DTO for registering an uploaded blob.
#[derive(Debug, Insertable)]
#[diesel(table_name = media)]
pub struct NewMedia {
    pub owner_id: i32,
    pub file_path: String,
}
