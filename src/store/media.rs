// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::error::ApiError;
use crate::models::{Media, NewMedia};
use crate::schema::media;

/// Register an uploaded blob's metadata and return the new media id.
pub async fn save_media(
    conn: &mut AsyncPgConnection,
    owner_id: i32,
    file_path: &str,
) -> Result<i32, ApiError> {
    let media_id = diesel::insert_into(media::table)
        .values(&NewMedia {
            owner_id,
            file_path: file_path.to_string(),
        })
        .returning(media::id)
        .get_result(conn)
        .await?;
    Ok(media_id)
}

pub async fn get_media(
    conn: &mut AsyncPgConnection,
    media_id: i32,
) -> Result<Option<Media>, ApiError> {
    let row = media::table
        .find(media_id)
        .first::<Media>(conn)
        .await
        .optional()?;
    Ok(row)
}
