// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

//! Identity resolution: mapping an opaque credential to a user identity.
//! The resolver sits behind a trait so the HTTP layer never touches
//! credential storage directly.

use anyhow::anyhow;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::users;

/// The identity a credential resolved to.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub name: String,
}

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Map an opaque credential to a user identity, or `Unauthorized`.
    async fn resolve(&self, credential: &str) -> Result<AuthenticatedUser, ApiError>;
}

/// Production resolver: an indexed unique-column lookup of the api_key
/// column. The credential is only ever passed as a bind parameter.
pub struct ApiKeyResolver {
    pool: DbPool,
}

impl ApiKeyResolver {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityResolver for ApiKeyResolver {
    async fn resolve(&self, credential: &str) -> Result<AuthenticatedUser, ApiError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ApiError::Internal(anyhow!("failed to get database connection: {e}")))?;

        let row: Option<(i32, String)> = users::table
            .filter(users::api_key.eq(credential))
            .select((users::id, users::name))
            .first(&mut conn)
            .await
            .optional()?;

        match row {
            Some((id, name)) => Ok(AuthenticatedUser { id, name }),
            None => {
                debug!("credential did not resolve to a user");
                Err(ApiError::unauthorized())
            }
        }
    }
}
